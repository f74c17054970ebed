//! 服务层模块
//!
//! 包含所有抓取流程服务:
//! - `page_fetcher`: 页面获取契约与HTTP实现
//! - `browser_service`: 无头浏览器渲染 (browser 特性)
//! - `state_extractor`: 从页面文本中定位并解析内嵌状态
//! - `entity_mapper`: 状态 → 视频/用户/音乐实体
//! - `watermark_resolver`: 详情API → 无水印地址
//! - `media_store`: 批量下载的落盘边界
//! - `scraper`: 对外门面, 编排以上服务
//! - `config_service`: 从 .env 与环境变量加载配置
//!
//! # 服务架构
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                TikTokScraper                 │
//! └──┬──────────┬──────────────┬──────────────┬──┘
//!    │          │              │              │
//!    ▼          ▼              ▼              ▼
//! PageFetcher  StateExtractor  EntityMapper  WatermarkResolver
//!  ├ HttpFetcher                               │
//!  └ BrowserRenderer                           ▼
//!                                          detail API
//! ```
//!
//! # 使用示例
//!
//! ```no_run
//! use tiktok_scraper::services::{ConfigService, TikTokScraper};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigService::load()?;
//! let scraper = TikTokScraper::new(config)?;
//!
//! let video = scraper
//!     .video("https://www.tiktok.com/@alice/video/712345", true)
//!     .await?;
//! println!("{} {:?}", video.id, video.download_url);
//! # Ok(())
//! # }
//! ```

// 渲染模式 (仅在启用 browser feature 时编译)
#[cfg(feature = "browser")]
pub mod browser_service;

pub mod config_service;
pub mod entity_mapper;
pub mod media_store;
pub mod page_fetcher;
pub mod scraper;
pub mod state_extractor;
pub mod watermark_resolver;

// 重导出常用类型,简化外部引用
#[cfg(feature = "browser")]
pub use browser_service::BrowserRenderer;

pub use config_service::ConfigService;
pub use entity_mapper::EntityMapper;
pub use media_store::{FsMediaStore, MediaStore};
pub use page_fetcher::{DefaultPageFetcher, FetchMode, HttpFetcher, MediaDownloader, PageFetcher};
pub use scraper::TikTokScraper;
pub use state_extractor::{StateExtractor, StateFormat};
pub use watermark_resolver::{AssetKind, AssetVariant, WatermarkResolver};
