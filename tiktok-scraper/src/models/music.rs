//! 音乐模型

use serde::{Deserialize, Serialize};

/// 视频使用的音乐
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Music {
    /// 音乐ID (超出 53 位整数范围, 按字符串保存)
    pub id: String,
    pub title: String,
    pub play_url: String,
    pub cover_large: String,
    pub cover_thumb: String,
    pub author: String,

    /// 时长(秒)
    pub duration: u64,

    /// 是否为原声
    pub original: Option<bool>,

    /// 所属专辑
    pub album: Option<String>,
}
