use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 抓取流程相关错误
///
/// 覆盖一次抓取调用的每个阶段: 参数校验、页面获取、状态提取、实体映射、
/// 无水印解析以及批量下载落盘。每个变体都可以被调用方单独匹配。
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "error", content = "details")]
pub enum ScrapeError {
    /// 输入参数无效
    ///
    /// 必填参数为空,在发起任何网络请求之前直接失败
    #[error("参数无效: {0}")]
    InvalidInput(String),

    /// 页面获取失败
    ///
    /// 可能原因:
    /// - 网络连接中断或DNS解析失败
    /// - 服务器返回非2xx状态码
    /// - 浏览器导航超时
    #[error("页面获取失败 ({url}): {reason}")]
    FetchFailed { url: String, reason: String },

    /// 未找到内嵌状态
    ///
    /// 页面内容不匹配任何已知的状态包装格式
    #[error("页面中未找到内嵌状态")]
    StateNotFound,

    /// 内嵌状态格式错误
    ///
    /// 定位到了状态片段,但不是合法JSON (通常是被截断)。
    /// `span` 保留原始片段便于诊断。
    #[error("内嵌状态解析失败: {reason}")]
    MalformedState { span: String, reason: String },

    /// 必需字段缺失
    ///
    /// 以字段路径命名, 例如 `ItemModule.712345.video.height`
    #[error("缺少必需字段: {0}")]
    FieldMissing(String),

    /// 无水印地址解析失败
    ///
    /// 详情API的响应中不存在任何已知的资源路径
    #[error("无水印地址解析失败 (视频 {video_id}): {reason}")]
    ResolutionFailed { video_id: String, reason: String },

    /// 媒体文件写入失败
    #[error("下载失败 ({path}): {reason}")]
    DownloadFailed { path: String, reason: String },
}

impl ScrapeError {
    /// 构造页面获取失败错误
    pub fn fetch_failed(url: impl Into<String>, reason: impl ToString) -> Self {
        ScrapeError::FetchFailed {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// 是否属于状态提取阶段的失败
    ///
    /// 编排层据此决定是否回退到渲染模式
    pub fn is_extraction_failure(&self) -> bool {
        matches!(
            self,
            ScrapeError::StateNotFound | ScrapeError::MalformedState { .. }
        )
    }
}

/// 实现从reqwest::Error到ScrapeError的转换
impl From<reqwest::Error> for ScrapeError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_default();

        let reason = if err.is_timeout() {
            "请求超时".to_string()
        } else if err.is_connect() {
            "无法连接到服务器".to_string()
        } else if let Some(status) = err.status() {
            format!("HTTP状态码 {}", status.as_u16())
        } else {
            err.to_string()
        };

        ScrapeError::FetchFailed { url, reason }
    }
}

/// 抓取配置相关错误
#[derive(Debug, Error, Serialize, Deserialize)]
#[serde(tag = "error", content = "details")]
pub enum ConfigError {
    /// 配置值无法解析
    #[error("配置项 {key} 无效: {value}")]
    InvalidValue { key: String, value: String },

    /// 浏览器可执行文件未找到
    #[error("未找到浏览器可执行文件: {0}")]
    BrowserNotFound(String),

    /// HTTP客户端构建失败
    #[error("HTTP客户端初始化失败: {0}")]
    ClientBuildFailed(String),
}

impl From<reqwest::Error> for ConfigError {
    fn from(err: reqwest::Error) -> Self {
        ConfigError::ClientBuildFailed(err.to_string())
    }
}
