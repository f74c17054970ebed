use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::errors::ConfigError;

/// 默认浏览器 User-Agent
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/103.0.5060.134 Safari/537.36";

/// 视频详情API (按内部视频ID查询)
pub const DEFAULT_DETAIL_ENDPOINT: &str = "https://api2.musical.ly/aweme/v1/aweme/detail/";

/// 无水印播放地址模板, `{}` 处填入资源ID
pub const DEFAULT_PLAY_TEMPLATE: &str = "https://api-h2.tiktokv.com/aweme/v1/play/?video_id={}";

/// 平台站点根地址
pub const DEFAULT_BASE_URL: &str = "https://www.tiktok.com";

/// 页面获取策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStrategy {
    /// 先轻量抓取, 拿不到内嵌状态时回退渲染一次
    #[default]
    Auto,
    /// 只用HTTP请求 (未安装浏览器时)
    LightweightOnly,
    /// 只用浏览器渲染
    RenderedOnly,
}

impl fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::LightweightOnly => write!(f, "lightweight"),
            Self::RenderedOnly => write!(f, "rendered"),
        }
    }
}

impl FromStr for FetchStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "lightweight" | "http" => Ok(Self::LightweightOnly),
            "rendered" | "browser" => Ok(Self::RenderedOnly),
            other => Err(ConfigError::InvalidValue {
                key: "fetch_strategy".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// 抓取配置
///
/// 在构造抓取器时一次性传入, 不存在进程级可变配置。
/// 测试可以为每次调用替换一个假的 PageFetcher。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// 站点根地址, 用于拼接用户主页与话题页
    pub base_url: String,

    pub user_agent: String,

    /// Accept 请求头
    pub accept: String,

    /// 单次获取的超时 (两种模式共用)
    pub timeout_seconds: u64,

    /// 每个主机保持的空闲(keep-alive)连接上限
    ///
    /// 只限制连接池中复用的空闲连接, 不限制并发连接数;
    /// 调用本身是串行的, 同一时刻至多一个在途请求
    pub max_idle_connections: usize,

    /// 会话Cookie (私密主页需要登录态)
    pub cookie: Option<String>,

    pub fetch_strategy: FetchStrategy,

    /// 浏览器可执行文件路径, None 时由 chromiumoxide 自动探测
    pub chrome_executable: Option<String>,

    pub detail_endpoint: String,

    pub play_template: String,

    /// 批量操作中两次请求之间的随机延迟范围(毫秒), None 表示不延迟
    pub batch_delay_ms: Option<(u64, u64)>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: "application/json, text/plain, */*".to_string(),
            timeout_seconds: 30,
            max_idle_connections: 20,
            cookie: None,
            fetch_strategy: FetchStrategy::Auto,
            chrome_executable: None,
            detail_endpoint: DEFAULT_DETAIL_ENDPOINT.to_string(),
            play_template: DEFAULT_PLAY_TEMPLATE.to_string(),
            batch_delay_ms: None,
        }
    }
}

impl ScraperConfig {
    /// 设置会话Cookie (构建器模式)
    pub fn with_cookie(mut self, cookie: Option<String>) -> Self {
        self.cookie = cookie.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_max_idle_connections(mut self, max: usize) -> Self {
        self.max_idle_connections = max;
        self
    }

    pub fn with_fetch_strategy(mut self, strategy: FetchStrategy) -> Self {
        self.fetch_strategy = strategy;
        self
    }

    pub fn with_chrome_executable(mut self, path: Option<String>) -> Self {
        self.chrome_executable = path;
        self
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_batch_delay(mut self, range: Option<(u64, u64)>) -> Self {
        self.batch_delay_ms = range.map(|(a, b)| (a.min(b), a.max(b)));
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// 用户主页地址
    pub fn user_url(&self, username: &str) -> String {
        format!("{}/@{}", self.base_url, username)
    }

    /// 话题页地址
    pub fn tag_url(&self, tag: &str) -> String {
        format!("{}/tag/{}", self.base_url, tag)
    }

    /// 视频详情API地址
    pub fn detail_url(&self, video_id: &str) -> String {
        format!("{}?aweme_id={}", self.detail_endpoint, video_id)
    }

    /// 配置摘要 (用于日志, 不包含Cookie值)
    pub fn summary_for_logging(&self) -> String {
        format!(
            "strategy={}, timeout={}s, max_idle_connections={}, cookie={}, chrome={}",
            self.fetch_strategy,
            self.timeout_seconds,
            self.max_idle_connections,
            if self.cookie.is_some() { "set" } else { "none" },
            self.chrome_executable.as_deref().unwrap_or("auto"),
        )
    }
}
