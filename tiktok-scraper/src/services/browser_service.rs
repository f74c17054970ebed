//! 浏览器渲染 - Chromium 生命周期管理
//!
//! 职责:
//! - 每次渲染启动一个隔离的无痕浏览器实例
//! - 导航到目标页面, 等待加载完成后读取文档HTML
//! - 无论成功、失败还是超时, 都关闭浏览器并回收事件处理任务
//!
//! 不保留全局浏览器实例, 调用之间没有共享状态。

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::page_fetcher::parse_cookie_pairs;
use crate::models::{ConfigError, ScrapeError, ScraperConfig};

/// 无头浏览器渲染器
#[derive(Debug, Clone)]
pub struct BrowserRenderer {
    executable: Option<PathBuf>,
    user_agent: String,
    cookie: Option<String>,
    timeout: Duration,
}

impl BrowserRenderer {
    /// 创建渲染器 (不启动浏览器)
    ///
    /// # 错误
    /// - `ConfigError::BrowserNotFound`: 配置的可执行文件既不是现有路径, 也不在 PATH 中
    pub fn new(config: &ScraperConfig) -> Result<Self, ConfigError> {
        let executable = match &config.chrome_executable {
            Some(name) => Some(resolve_executable(name)?),
            None => None,
        };

        Ok(Self {
            executable,
            user_agent: config.user_agent.clone(),
            cookie: config.cookie.clone(),
            timeout: config.timeout(),
        })
    }

    /// 渲染页面并返回文档HTML
    ///
    /// 浏览器在所有退出路径上都会被关闭
    pub async fn render(&self, url: &str) -> Result<String, ScrapeError> {
        let mut builder = BrowserConfig::builder()
            .incognito()
            .request_timeout(self.timeout)
            .args(vec![
                "--no-sandbox",
                "--disable-setuid-sandbox",
                "--disable-dev-shm-usage",
            ]);
        if let Some(executable) = &self.executable {
            builder = builder.chrome_executable(executable);
        }
        let browser_config = builder
            .build()
            .map_err(|e| ScrapeError::fetch_failed(url, format!("浏览器配置失败: {}", e)))?;

        info!(url = %url, "启动 Chromium 实例进行渲染");

        let (mut browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScrapeError::fetch_failed(url, format!("浏览器启动失败: {}", e)))?;

        // 后台任务处理浏览器事件, 连接断开后退出
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let outcome = match tokio::time::timeout(self.timeout, self.load_document(&browser, url))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(ScrapeError::fetch_failed(
                url,
                format!("页面导航超时 ({}s)", self.timeout.as_secs()),
            )),
        };

        if let Err(e) = browser.close().await {
            warn!(url = %url, error = %e, "关闭浏览器失败");
        }
        if let Err(e) = browser.wait().await {
            debug!(url = %url, error = %e, "等待浏览器进程退出失败");
        }
        handler_task.abort();

        debug!(url = %url, success = outcome.is_ok(), "浏览器实例已关闭");
        outcome
    }

    async fn load_document(&self, browser: &Browser, url: &str) -> Result<String, ScrapeError> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScrapeError::fetch_failed(url, format!("创建页面失败: {}", e)))?;

        page.set_user_agent(self.user_agent.as_str())
            .await
            .map_err(|e| ScrapeError::fetch_failed(url, format!("设置 UserAgent 失败: {}", e)))?;

        if let Some(cookie) = &self.cookie {
            let params = cookie_params(cookie, url)?;
            if !params.is_empty() {
                page.set_cookies(params)
                    .await
                    .map_err(|e| ScrapeError::fetch_failed(url, format!("设置 Cookie 失败: {}", e)))?;
            }
        }

        page.goto(url)
            .await
            .map_err(|e| ScrapeError::fetch_failed(url, format!("页面导航失败: {}", e)))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| ScrapeError::fetch_failed(url, format!("等待页面加载失败: {}", e)))?;

        let html = page
            .content()
            .await
            .map_err(|e| ScrapeError::fetch_failed(url, format!("读取页面内容失败: {}", e)))?;

        if let Err(e) = page.close().await {
            debug!(url = %url, error = %e, "关闭页面失败");
        }

        debug!(url = %url, bytes = html.len() as u64, "页面渲染完成");
        Ok(html)
    }
}

fn cookie_params(cookie: &str, url: &str) -> Result<Vec<CookieParam>, ScrapeError> {
    parse_cookie_pairs(cookie)
        .into_iter()
        .map(|(name, value)| {
            CookieParam::builder()
                .name(name)
                .value(value)
                .url(url)
                .build()
                .map_err(|e| ScrapeError::fetch_failed(url, format!("Cookie 无效: {}", e)))
        })
        .collect()
}

/// 解析浏览器可执行文件: 现有路径直接使用, 否则在 PATH 中查找
fn resolve_executable(name: &str) -> Result<PathBuf, ConfigError> {
    let path = Path::new(name);
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    which::which(name).map_err(|_| ConfigError::BrowserNotFound(name.to_string()))
}
