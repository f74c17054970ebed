//! 单次调用聚合结果

use serde::{Deserialize, Serialize};

use super::{Music, Video};

/// 视频作者 (用户资料的子集)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub unique_id: String,
    pub avatar: String,
    pub signature: Option<String>,
    pub created_at: Option<String>,
    pub verified: Option<bool>,
}

/// 聚合抓取结果
///
/// 一次页面抓取同时得到作者、视频、音乐和互动数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeResult {
    pub author: Author,
    pub video: Video,
    pub audio: Music,
    pub share_count: u64,
    pub likes_count: u64,
    pub comment_count: u64,
    pub play_count: u64,
    pub created_at: String,

    /// 视频页规范链接
    pub link: String,

    pub thumbnail: String,
}
