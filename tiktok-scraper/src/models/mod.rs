//! 数据模型模块
//!
//! 包含所有核心数据结构:
//! - errors: 错误类型定义 (抓取流程、配置)
//! - page_state: 页面内嵌状态及其类型化访问层
//! - video / user / music / scrape_result: 映射后的领域实体
//! - scraper_config: 抓取配置 (User-Agent、超时、连接池、Cookie、获取策略)
//! - scrape_stage: 单次调用的阶段状态机
//! - download: 批量下载参数与结果

pub mod download;
pub mod errors;
pub mod music;
pub mod page_state;
pub mod scrape_result;
pub mod scrape_stage;
pub mod scraper_config;
pub mod user;
pub mod video;

// 重导出常用类型,简化外部引用
pub use download::{DownloadOptions, DownloadReport, SkippedItem};
pub use errors::{ConfigError, ScrapeError};
pub use music::Music;
pub use page_state::{ItemListKind, Node, PageState};
pub use scrape_result::{Author, ScrapeResult};
pub use scrape_stage::{ScrapeRun, ScrapeStage};
pub use scraper_config::{FetchStrategy, ScraperConfig};
pub use user::User;
pub use video::Video;
