//! 页面获取
//!
//! 抓取核心只依赖 `PageFetcher` 契约, 不依赖具体传输方式:
//! - 轻量模式: 单次HTTP GET, 浏览器UA, keep-alive连接池, 不执行脚本
//! - 渲染模式: 无头浏览器加载页面后读取文档 (见 `browser_service`)
//!
//! 本层不做任何自动重试, 重试策略属于调用方。

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CACHE_CONTROL, CONNECTION, COOKIE, USER_AGENT};
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::models::{ConfigError, ScrapeError, ScraperConfig};

#[cfg(feature = "browser")]
use super::browser_service::BrowserRenderer;

/// 页面获取模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchMode {
    /// 纯HTTP请求, 不执行脚本
    Lightweight,
    /// 浏览器渲染, 执行页面脚本后读取
    Rendered,
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lightweight => write!(f, "lightweight"),
            Self::Rendered => write!(f, "rendered"),
        }
    }
}

/// 页面获取契约
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 获取URL对应的原始文本内容
    ///
    /// # 错误
    /// - `ScrapeError::FetchFailed`: 网络错误、非2xx响应、导航超时
    async fn fetch(&self, url: &str, mode: FetchMode) -> Result<String, ScrapeError>;
}

/// 媒体下载契约 (批量下载使用)
#[async_trait]
pub trait MediaDownloader: Send + Sync {
    /// 把媒体内容流式写入 `sink`, 返回写入的字节数
    async fn download(
        &self,
        url: &str,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<u64, ScrapeError>;
}

/// 轻量HTTP获取器
///
/// 连接池、UA、Cookie 在构造时一次性确定
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// 根据配置创建客户端
    ///
    /// # 错误
    /// - `ConfigError::InvalidValue`: UA或Cookie包含非法header字符
    /// - `ConfigError::ClientBuildFailed`: TLS后端初始化失败
    pub fn new(config: &ScraperConfig) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value("user_agent", &config.user_agent)?);
        headers.insert(ACCEPT, header_value("accept", &config.accept)?);
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        if let Some(cookie) = &config.cookie {
            let mut value = header_value("cookie", cookie)?;
            value.set_sensitive(true);
            headers.insert(COOKIE, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .pool_max_idle_per_host(config.max_idle_connections)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .build()?;

        tracing::debug!(
            config = %config.summary_for_logging(),
            "HTTP fetcher initialized"
        );

        Ok(Self { client })
    }

    /// GET 并返回文本, 非2xx视为失败
    pub async fn get_text(&self, url: &str) -> Result<String, ScrapeError> {
        tracing::debug!(url = %url, "Lightweight fetch");

        let response = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(
            url = %url,
            status = status.as_u16(),
            bytes = body.len() as u64,
            "Lightweight fetch completed"
        );
        Ok(body)
    }
}

#[async_trait]
impl MediaDownloader for HttpFetcher {
    async fn download(
        &self,
        url: &str,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<u64, ScrapeError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?;

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            sink.write_all(&chunk)
                .await
                .map_err(|e| ScrapeError::DownloadFailed {
                    path: url.to_string(),
                    reason: e.to_string(),
                })?;
            written += chunk.len() as u64;
        }
        sink.flush().await.map_err(|e| ScrapeError::DownloadFailed {
            path: url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(written)
    }
}

/// 默认获取器: 轻量模式走 `HttpFetcher`, 渲染模式走无头浏览器
pub struct DefaultPageFetcher {
    http: HttpFetcher,
    #[cfg(feature = "browser")]
    renderer: BrowserRenderer,
}

impl DefaultPageFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            http: HttpFetcher::new(config)?,
            #[cfg(feature = "browser")]
            renderer: BrowserRenderer::new(config)?,
        })
    }

    /// 共享底层HTTP客户端 (下载媒体时复用连接池)
    pub fn http(&self) -> &HttpFetcher {
        &self.http
    }
}

#[async_trait]
impl PageFetcher for DefaultPageFetcher {
    async fn fetch(&self, url: &str, mode: FetchMode) -> Result<String, ScrapeError> {
        match mode {
            FetchMode::Lightweight => self.http.get_text(url).await,
            #[cfg(feature = "browser")]
            FetchMode::Rendered => self.renderer.render(url).await,
            #[cfg(not(feature = "browser"))]
            FetchMode::Rendered => Err(ScrapeError::fetch_failed(
                url,
                "渲染模式不可用: 编译时未启用 browser 特性",
            )),
        }
    }
}

/// 解析 `a=1; b=2` 形式的Cookie字符串
///
/// 没有 `=` 的片段会被忽略
pub fn parse_cookie_pairs(cookie: &str) -> Vec<(String, String)> {
    cookie
        .split(';')
        .filter_map(|part| {
            let (name, value) = part.trim().split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

fn header_value(key: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: if key == "cookie" {
            "<redacted>".to_string()
        } else {
            value.to_string()
        },
    })
}
