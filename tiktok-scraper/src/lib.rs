//! 短视频平台抓取库
//!
//! 获取公开页面, 提取平台注入的内嵌状态, 映射为视频/用户/音乐实体,
//! 并通过详情API解析无水印下载地址。

pub mod models;
pub mod services;
pub mod utils;

pub use models::{
    DownloadOptions, DownloadReport, FetchStrategy, Music, ScrapeError, ScrapeResult,
    ScraperConfig, User, Video,
};
pub use services::{ConfigService, TikTokScraper};
