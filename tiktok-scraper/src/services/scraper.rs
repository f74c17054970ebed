//! 抓取门面
//!
//! 对外暴露的全部操作都在这里编排:
//! 参数校验 → 获取页面 → 提取内嵌状态 → 映射实体 → (可选) 解析无水印地址
//!
//! 获取策略为 `Auto` 时, 轻量抓取拿不到内嵌状态会回退渲染模式一次。
//! 批量操作按页面顺序串行执行, 单个条目的解析/下载失败只记录警告并跳过。

use rand::Rng;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::entity_mapper::EntityMapper;
use super::media_store::{FsMediaStore, MediaStore};
use super::page_fetcher::{DefaultPageFetcher, FetchMode, MediaDownloader, PageFetcher};
use super::state_extractor::StateExtractor;
use super::watermark_resolver::{AssetVariant, WatermarkResolver};
use crate::models::{
    ConfigError, DownloadOptions, DownloadReport, FetchStrategy, ItemListKind, Music, PageState,
    ScrapeError, ScrapeResult, ScrapeRun, ScrapeStage, ScraperConfig, SkippedItem, User, Video,
};
use crate::{log_event, log_skip};

/// 短视频平台抓取器
pub struct TikTokScraper {
    config: ScraperConfig,
    fetcher: Arc<dyn PageFetcher>,
    downloader: Arc<dyn MediaDownloader>,
    store: Arc<dyn MediaStore>,
    extractor: StateExtractor,
    resolver: WatermarkResolver,
}

impl TikTokScraper {
    /// 使用默认后端创建抓取器
    ///
    /// # 错误
    /// - `ConfigError::InvalidValue`: UA或Cookie不是合法的header值
    /// - `ConfigError::BrowserNotFound`: 配置的浏览器路径不存在
    pub fn new(config: ScraperConfig) -> Result<Self, ConfigError> {
        let fetcher = Arc::new(DefaultPageFetcher::new(&config)?);
        let downloader = Arc::new(fetcher.http().clone());
        Ok(Self::with_backends(config, fetcher, downloader))
    }

    /// 注入页面获取器与媒体下载器 (测试替身或自定义传输)
    pub fn with_backends(
        config: ScraperConfig,
        fetcher: Arc<dyn PageFetcher>,
        downloader: Arc<dyn MediaDownloader>,
    ) -> Self {
        tracing::debug!(
            config = %config.summary_for_logging(),
            "抓取器初始化"
        );

        Self {
            resolver: WatermarkResolver::new(fetcher.clone(), config.clone()),
            config,
            fetcher,
            downloader,
            store: Arc::new(FsMediaStore),
            extractor: StateExtractor::default(),
        }
    }

    /// 替换落盘实现
    pub fn with_store(mut self, store: Arc<dyn MediaStore>) -> Self {
        self.store = store;
        self
    }

    /// 替换内嵌状态格式表
    pub fn with_extractor(mut self, extractor: StateExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// 追加无水印资源路径
    pub fn with_asset_variant(mut self, variant: AssetVariant) -> Self {
        self.resolver = self.resolver.with_variant(variant);
        self
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// 单个视频
    ///
    /// `no_watermark` 为 true 时播放地址与下载地址都替换为无水印地址
    pub async fn video(&self, url: &str, no_watermark: bool) -> Result<Video, ScrapeError> {
        let url = require(url, "视频链接")?;

        let video = self
            .run_page("video", url, |state| {
                let id = state.primary_item_id(ItemListKind::Video)?;
                EntityMapper::to_video(state, &id)
            })
            .await?;

        let video = if no_watermark {
            let resolved = self.resolver.resolve(&video.id).await?;
            video.with_no_watermark_url(resolved)
        } else {
            video
        };

        log_event!(
            "VideoScraped",
            video_id = video.id.as_str(),
            no_watermark = no_watermark
        );
        Ok(video)
    }

    /// 用户资料
    pub async fn user(&self, username: &str) -> Result<User, ScrapeError> {
        let username = normalize_username(username)?;
        let url = self.config.user_url(username);

        let user = self
            .run_page("user", &url, |state| EntityMapper::to_user(state, username))
            .await?;

        log_event!(
            "UserScraped",
            username = username,
            videos = user.videos
        );
        Ok(user)
    }

    /// 用户主页上的视频 (页面顺序)
    pub async fn user_videos(
        &self,
        username: &str,
        no_watermark: bool,
    ) -> Result<Vec<Video>, ScrapeError> {
        let username = normalize_username(username)?;
        let url = self.config.user_url(username);

        let videos = self
            .run_page("user_videos", &url, |state| {
                EntityMapper::to_videos(state, ItemListKind::UserPost)
            })
            .await?;
        let listed = videos.len();

        let videos = if no_watermark {
            self.attach_no_watermark(videos).await
        } else {
            videos
        };

        log_event!(
            "UserVideosScraped",
            username = username,
            listed = listed,
            returned = videos.len()
        );
        Ok(videos)
    }

    /// 视频使用的音乐
    pub async fn music(&self, url: &str) -> Result<Music, ScrapeError> {
        let url = require(url, "视频链接")?;

        let music = self
            .run_page("music", url, |state| {
                let id = state.primary_item_id(ItemListKind::Video)?;
                EntityMapper::to_music(state, &id)
            })
            .await?;

        log_event!("MusicScraped", music_id = music.id.as_str());
        Ok(music)
    }

    /// 话题页上的视频 (页面顺序)
    pub async fn hashtag(&self, tag: &str) -> Result<Vec<Video>, ScrapeError> {
        let tag = require(tag, "话题")?.trim_start_matches('#');
        let tag = require(tag, "话题")?;
        let url = self.config.tag_url(tag);

        let videos = self
            .run_page("hashtag", &url, |state| {
                EntityMapper::to_videos(state, ItemListKind::Challenge)
            })
            .await?;

        log_event!("HashtagScraped", tag = tag, videos = videos.len());
        Ok(videos)
    }

    /// 一次调用得到作者、视频、音乐与互动数据
    pub async fn scrape(&self, url: &str) -> Result<ScrapeResult, ScrapeError> {
        let url = require(url, "视频链接")?;
        let base_url = self.config.base_url.as_str();

        let result = self
            .run_page("scrape", url, |state| {
                let id = state.primary_item_id(ItemListKind::Video)?;
                EntityMapper::to_scrape_result(state, &id, base_url)
            })
            .await?;

        log_event!(
            "VideoAggregated",
            video_id = result.video.id.as_str(),
            author = result.author.unique_id.as_str()
        );
        Ok(result)
    }

    /// 无水印地址
    ///
    /// 输入为 `http(s)` 链接时先走单视频抽取拿到ID, 否则直接视为视频ID
    pub async fn no_watermark(&self, link_or_id: &str) -> Result<String, ScrapeError> {
        let input = require(link_or_id, "视频链接或ID")?;

        let video_id = if is_http_url(input) {
            self.run_page("no_watermark", input, |state| {
                let id = state.primary_item_id(ItemListKind::Video)?;
                EntityMapper::to_video(state, &id).map(|v| v.id)
            })
            .await?
        } else {
            input.to_string()
        };

        self.resolver.resolve(&video_id).await
    }

    /// 批量下载用户的视频
    ///
    /// 目标目录不存在时创建; 单个视频没有可用地址或传输失败时跳过并记入报告
    ///
    /// # 错误
    /// - 列表获取/映射阶段的错误原样返回
    /// - `ScrapeError::DownloadFailed`: 目标目录无法创建
    pub async fn download_user_videos(
        &self,
        username: &str,
        options: DownloadOptions,
    ) -> Result<DownloadReport, ScrapeError> {
        let username = normalize_username(username)?;
        let videos = self.user_videos(username, false).await?;

        let dir = options
            .dir
            .clone()
            .unwrap_or_else(|| default_download_dir(username));
        self.store.create_dir(&dir).await?;

        let mut report = DownloadReport {
            dir: dir.clone(),
            ..Default::default()
        };

        for (index, video) in videos.iter().enumerate() {
            if index > 0 {
                self.politeness_delay().await;
            }

            match self.download_one(video, &dir, options.watermark).await {
                Ok(path) => {
                    tracing::debug!(
                        video_id = %video.id,
                        path = %path.display(),
                        "视频已保存"
                    );
                    report.saved.push(path);
                }
                Err(e) => {
                    log_skip!(
                        "VideoDownloadSkipped",
                        video_id = video.id.as_str(),
                        error = tracing::field::display(&e)
                    );
                    report.skipped.push(SkippedItem {
                        video_id: video.id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        log_event!(
            "UserVideosDownloaded",
            username = username,
            dir = tracing::field::display(dir.display()),
            saved = report.saved.len(),
            skipped = report.skipped.len()
        );
        Ok(report)
    }

    async fn download_one(
        &self,
        video: &Video,
        dir: &Path,
        watermark: bool,
    ) -> Result<PathBuf, ScrapeError> {
        let source = if watermark {
            video.download_url.clone().ok_or_else(|| {
                ScrapeError::FieldMissing(format!("ItemModule.{}.video.downloadAddr", video.id))
            })?
        } else {
            self.resolver.resolve(&video.id).await?
        };

        let file_name = video.file_name();
        let path = dir.join(&file_name);
        if path.parent() != Some(dir) {
            return Err(ScrapeError::DownloadFailed {
                path: path.display().to_string(),
                reason: "文件名越出目标目录".to_string(),
            });
        }

        // 先写入 .part, 传输完整后再改名, 失败时不留下残缺文件
        let partial = dir.join(format!("{}.part", file_name));
        let transfer = async {
            let mut sink = self.store.open_write(&partial).await?;
            let bytes = self.downloader.download(&source, sink.as_mut()).await?;
            drop(sink);
            self.store.commit(&partial, &path).await?;
            Ok::<u64, ScrapeError>(bytes)
        };

        match transfer.await {
            Ok(bytes) => {
                tracing::debug!(video_id = %video.id, bytes = bytes, "下载完成");
                Ok(path)
            }
            Err(e) => {
                if let Err(cleanup) = self.store.discard(&partial).await {
                    tracing::warn!(
                        path = %partial.display(),
                        error = %cleanup,
                        "清理未完成的下载文件失败"
                    );
                }
                Err(e)
            }
        }
    }

    /// 逐个替换为无水印地址, 解析失败的条目被丢弃
    async fn attach_no_watermark(&self, videos: Vec<Video>) -> Vec<Video> {
        let mut resolved = Vec::with_capacity(videos.len());

        for (index, video) in videos.into_iter().enumerate() {
            if index > 0 {
                self.politeness_delay().await;
            }

            match self.resolver.resolve(&video.id).await {
                Ok(url) => resolved.push(video.with_no_watermark_url(url)),
                Err(e) => {
                    log_skip!(
                        "NoWatermarkSkipped",
                        video_id = video.id.as_str(),
                        error = tracing::field::display(&e)
                    );
                }
            }
        }

        resolved
    }

    /// 批量请求之间的随机延迟
    async fn politeness_delay(&self) {
        if let Some((min, max)) = self.config.batch_delay_ms {
            let delay_ms = rand::thread_rng().gen_range(min.min(max)..=min.max(max));
            if delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }

    /// 获取、提取并映射一个页面, 全程追踪阶段
    async fn run_page<T, F>(
        &self,
        operation: &'static str,
        url: &str,
        map: F,
    ) -> Result<T, ScrapeError>
    where
        F: FnOnce(&PageState) -> Result<T, ScrapeError>,
    {
        let mut run = ScrapeRun::new(operation);

        let result = match self.load_state(&mut run, url).await {
            Ok(state) => {
                advance(&mut run, ScrapeStage::Mapping);
                map(&state)
            }
            Err(e) => Err(e),
        };

        match &result {
            Ok(_) => advance(&mut run, ScrapeStage::Done),
            Err(e) => {
                tracing::warn!(
                    operation = operation,
                    url = %url,
                    stage = run.stage().as_str(),
                    error = %e,
                    "抓取失败"
                );
                run.fail(e.to_string());
            }
        }
        result
    }

    async fn load_state(&self, run: &mut ScrapeRun, url: &str) -> Result<PageState, ScrapeError> {
        let strategy = self.config.fetch_strategy;
        let first_mode = match strategy {
            FetchStrategy::RenderedOnly => FetchMode::Rendered,
            FetchStrategy::Auto | FetchStrategy::LightweightOnly => FetchMode::Lightweight,
        };

        advance(run, ScrapeStage::Fetching);
        let content = self.fetcher.fetch(url, first_mode).await?;
        advance(run, ScrapeStage::Extracting);

        match self.extractor.extract(&content) {
            Err(e) if e.is_extraction_failure() && strategy == FetchStrategy::Auto => {
                tracing::info!(
                    url = %url,
                    error = %e,
                    "轻量抓取未得到内嵌状态, 回退渲染模式"
                );
                advance(run, ScrapeStage::Fetching);
                let content = self.fetcher.fetch(url, FetchMode::Rendered).await?;
                advance(run, ScrapeStage::Extracting);
                self.extractor.extract(&content)
            }
            other => other,
        }
    }
}

fn advance(run: &mut ScrapeRun, next: ScrapeStage) {
    if let Err(e) = run.transition_to(next) {
        tracing::warn!(error = %e, "阶段转换被拒绝");
    }
}

/// 必填参数: 去除首尾空白后不能为空
fn require<'a>(value: &'a str, what: &str) -> Result<&'a str, ScrapeError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ScrapeError::InvalidInput(format!("{}不能为空", what)));
    }
    Ok(value)
}

/// 用户名允许带 `@` 前缀
fn normalize_username(username: &str) -> Result<&str, ScrapeError> {
    let username = require(username, "用户名")?.trim_start_matches('@');
    require(username, "用户名")
}

fn is_http_url(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn default_download_dir(username: &str) -> PathBuf {
    dirs::download_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(username)
}
