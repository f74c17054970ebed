//! 批量下载参数与结果

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 批量下载选项
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadOptions {
    /// 目标目录, None 时使用 `<下载目录>/<用户名>`
    pub dir: Option<PathBuf>,

    /// true: 直接下载带水印文件; false: 先解析无水印地址
    pub watermark: bool,
}

/// 被跳过的条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedItem {
    pub video_id: String,
    pub reason: String,
}

/// 批量下载结果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadReport {
    pub dir: PathBuf,

    /// 成功写入的文件 (页面顺序)
    pub saved: Vec<PathBuf>,

    pub skipped: Vec<SkippedItem>,
}

impl DownloadReport {
    pub fn total(&self) -> usize {
        self.saved.len() + self.skipped.len()
    }
}
