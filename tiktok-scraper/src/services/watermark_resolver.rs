//! 无水印地址解析
//!
//! 用内部视频ID调用详情API, 按顺序尝试已知的资源路径,
//! 第一个命中的路径决定最终地址。新的响应结构只需追加一个 `AssetVariant`。

use serde_json::Value;
use std::sync::Arc;

use super::page_fetcher::{FetchMode, PageFetcher};
use crate::models::{PageState, ScrapeError, ScraperConfig};

/// 资源路径命中后的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// 取到的是资源ID, 填入播放地址模板
    Template,
    /// 取到的就是可直接播放的地址
    Direct,
}

/// 详情响应中的一个资源路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetVariant {
    /// 以 `.` 分隔的路径, 数字段索引数组
    pub path: String,
    pub kind: AssetKind,
}

impl AssetVariant {
    pub fn template(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: AssetKind::Template,
        }
    }

    pub fn direct(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: AssetKind::Direct,
        }
    }

    /// 在详情响应中尝试本路径
    fn apply(&self, detail: &PageState, play_template: &str) -> Option<String> {
        let found = detail.root().opt_str(&self.path)?;
        match self.kind {
            AssetKind::Template => Some(play_template.replace("{}", &found)),
            AssetKind::Direct => Some(found),
        }
    }
}

/// 默认资源路径表
pub fn default_variants() -> Vec<AssetVariant> {
    vec![
        AssetVariant::template("aweme_detail.video.download_addr.uri"),
        AssetVariant::direct("aweme_detail.video.play_addr.url_list.0"),
    ]
}

/// 无水印地址解析器
pub struct WatermarkResolver {
    fetcher: Arc<dyn PageFetcher>,
    config: ScraperConfig,
    variants: Vec<AssetVariant>,
}

impl WatermarkResolver {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: ScraperConfig) -> Self {
        Self {
            fetcher,
            config,
            variants: default_variants(),
        }
    }

    /// 追加资源路径 (优先级低于已有路径)
    pub fn with_variant(mut self, variant: AssetVariant) -> Self {
        self.variants.push(variant);
        self
    }

    pub fn variants(&self) -> &[AssetVariant] {
        &self.variants
    }

    /// 解析无水印地址
    ///
    /// # 错误
    /// - `ScrapeError::InvalidInput`: 视频ID为空
    /// - `ScrapeError::FetchFailed`: 详情API请求失败
    /// - `ScrapeError::ResolutionFailed`: 响应不是JSON, 或没有任何已知资源路径
    pub async fn resolve(&self, video_id: &str) -> Result<String, ScrapeError> {
        let video_id = video_id.trim();
        if video_id.is_empty() {
            return Err(ScrapeError::InvalidInput("视频ID不能为空".to_string()));
        }

        let url = self.config.detail_url(video_id);
        let body = self.fetcher.fetch(&url, FetchMode::Lightweight).await?;

        let detail: Value =
            serde_json::from_str(&body).map_err(|e| ScrapeError::ResolutionFailed {
                video_id: video_id.to_string(),
                reason: format!("详情响应不是合法JSON: {}", e),
            })?;
        let detail = PageState::new(detail);

        for variant in &self.variants {
            if let Some(resolved) = variant.apply(&detail, &self.config.play_template) {
                tracing::debug!(
                    video_id = %video_id,
                    variant = %variant.path,
                    "无水印地址解析成功"
                );
                return Ok(resolved);
            }
        }

        Err(ScrapeError::ResolutionFailed {
            video_id: video_id.to_string(),
            reason: "详情响应中没有已知的资源路径".to_string(),
        })
    }
}
