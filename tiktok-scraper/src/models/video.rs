//! 视频模型

use serde::{Deserialize, Serialize};

/// 视频
///
/// 映射完成后不再修改; `id` 是唯一身份键
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    /// 视频ID
    pub id: String,

    /// 视频描述 (可能为空字符串)
    pub description: String,

    /// 创建日期 (本地时区日历日期)
    pub created_at: String,

    pub height: u64,
    pub width: u64,

    /// 时长(秒)
    pub duration: u64,

    /// 清晰度标签 (例: "720p")
    pub resolution: String,

    pub share_count: u64,
    pub likes_count: u64,
    pub comment_count: u64,
    pub play_count: u64,

    /// 封面
    pub cover: Option<String>,

    /// 动态封面
    pub dynamic_cover: Option<String>,

    /// 播放地址
    pub play_url: Option<String>,

    /// 下载地址 (默认带水印)
    pub download_url: Option<String>,

    /// 容器格式 (例: "mp4")
    pub format: Option<String>,

    /// 作者
    pub author: Option<String>,
}

impl Video {
    /// 用无水印地址替换播放与下载地址
    ///
    /// 实体本身不可变,返回新值
    pub fn with_no_watermark_url(self, url: String) -> Self {
        Self {
            play_url: Some(url.clone()),
            download_url: Some(url),
            ..self
        }
    }

    /// 批量下载时的文件名: `<id>_<resolution>.<format>`
    ///
    /// 各部分来自页面数据, `[A-Za-z0-9_.-]` 以外的字符替换为 `_`,
    /// 结果不含路径分隔符。未知格式按 mp4 处理
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}.{}",
            file_name_part(&self.id),
            file_name_part(&self.resolution),
            file_name_part(self.format.as_deref().unwrap_or("mp4"))
        )
    }
}

/// 文件名片段: 只保留安全字符, 纯点号片段整体替换
fn file_name_part(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "_".repeat(cleaned.len().max(1))
    } else {
        cleaned
    }
}
