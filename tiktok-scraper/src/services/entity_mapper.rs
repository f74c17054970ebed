//! 实体映射
//!
//! 把通用的页面状态投影为强类型实体。字段路径契约:
//!
//! | 实体 | 来源 |
//! |---|---|
//! | Video | `ItemModule[id]` 的 `video.*`、`stats.*`、`desc`、`createTime` |
//! | User | `UserModule.users[name]` + `UserModule.stats[name]` |
//! | Music | `ItemModule[id].music` |
//!
//! 所有函数都是纯函数: 同一份状态映射两次得到相等的实体。

use crate::models::{
    Author, ItemListKind, Music, Node, PageState, ScrapeError, ScrapeResult, User, Video,
};
use crate::utils::time_utils::format_local_date;

/// 实体映射器
pub struct EntityMapper;

impl EntityMapper {
    /// 映射 `ItemModule[item_id]` 为视频
    ///
    /// # 错误
    /// - `ScrapeError::FieldMissing`: 必需字段缺失或无法转换, 以完整路径命名
    pub fn to_video(state: &PageState, item_id: &str) -> Result<Video, ScrapeError> {
        let item = state.item(item_id)?;

        let id = item
            .str("video.id")
            .or_else(|e| item.str("id").map_err(|_| e))?;
        if id.trim().is_empty() {
            return Err(ScrapeError::FieldMissing(format!("{}.video.id", item.path())));
        }

        Ok(Video {
            id,
            description: item.str("desc")?,
            created_at: date_at(&item, "createTime")?,
            height: item.u64("video.height")?,
            width: item.u64("video.width")?,
            duration: item.u64("video.duration")?,
            resolution: item.str("video.ratio")?,
            share_count: item.u64("stats.shareCount")?,
            likes_count: item.u64("stats.diggCount")?,
            comment_count: item.u64("stats.commentCount")?,
            play_count: item.u64("stats.playCount")?,
            cover: item.opt_str("video.cover"),
            dynamic_cover: item.opt_str("video.dynamicCover"),
            play_url: item.opt_str("video.playAddr"),
            download_url: item.opt_str("video.downloadAddr"),
            format: item.opt_str("video.format"),
            author: item
                .opt_str("author")
                .or_else(|| item.opt_str("author.uniqueId"))
                .or_else(|| item.opt_str("nickname")),
        })
    }

    /// 映射 `UserModule` 中的用户资料
    ///
    /// 私密主页在未登录时不会出现在 `UserModule.users` 中, 表现为 `FieldMissing`
    pub fn to_user(state: &PageState, username: &str) -> Result<User, ScrapeError> {
        let user = state.user(username)?;
        let stats = state.user_stats(username)?;

        let id = non_empty(&user, "id")?;
        let unique_id = non_empty(&user, "uniqueId")?;

        Ok(User {
            id,
            unique_id,
            nickname: user.str("nickname")?,
            avatar: user.trimmed("avatarLarger")?,
            signature: user.trimmed("signature")?,
            created_at: date_at(&user, "createTime")?,
            verified: user.bool("verified")?,
            secret_uid: user.str("secUid")?,
            bio_link: user.opt_str("bioLink.link"),
            private_account: user.bool("privateAccount")?,
            under_age_18: user.opt_bool("isUnderAge18").unwrap_or(false),
            followers: stats.u64("followerCount")?,
            following: stats.u64("followingCount")?,
            hearts: stats
                .u64("heart")
                .or_else(|e| stats.u64("heartCount").map_err(|_| e))?,
            videos: stats.u64("videoCount")?,
        })
    }

    /// 映射 `ItemModule[item_id].music`
    pub fn to_music(state: &PageState, item_id: &str) -> Result<Music, ScrapeError> {
        let music = state.item(item_id)?.key("music")?;

        Ok(Music {
            id: non_empty(&music, "id")?,
            title: music.str("title")?,
            play_url: music.trimmed("playUrl")?,
            cover_large: music.trimmed("coverLarge")?,
            cover_thumb: music.trimmed("coverThumb")?,
            author: music.str("authorName")?,
            duration: music.u64("duration")?,
            original: music.opt_bool("original"),
            album: music.opt_str("album"),
        })
    }

    /// 聚合映射: 作者 + 视频 + 音乐 + 互动数据
    ///
    /// 作者资料取自 `UserModule.users[ItemModule[id].author]`
    pub fn to_scrape_result(
        state: &PageState,
        item_id: &str,
        base_url: &str,
    ) -> Result<ScrapeResult, ScrapeError> {
        let video = Self::to_video(state, item_id)?;
        let audio = Self::to_music(state, item_id)?;

        let item = state.item(item_id)?;
        let unique_id = item
            .str("author")
            .or_else(|e| item.str("author.uniqueId").map_err(|_| e))?;
        let user = state.user(&unique_id)?;

        let author = Author {
            id: non_empty(&user, "id")?,
            unique_id: unique_id.clone(),
            avatar: user.trimmed("avatarLarger")?,
            signature: user.opt_str("signature"),
            created_at: user.u64("createTime").ok().and_then(format_local_date),
            verified: user.opt_bool("verified"),
        };

        let thumbnail = video
            .cover
            .clone()
            .ok_or_else(|| ScrapeError::FieldMissing(format!("{}.video.cover", item.path())))?;

        Ok(ScrapeResult {
            link: format!(
                "{}/@{}/video/{}",
                base_url.trim_end_matches('/'),
                unique_id,
                video.id
            ),
            share_count: video.share_count,
            likes_count: video.likes_count,
            comment_count: video.comment_count,
            play_count: video.play_count,
            created_at: video.created_at.clone(),
            thumbnail,
            author,
            audio,
            video,
        })
    }

    /// 按条目列表顺序映射全部视频
    ///
    /// 任何一个条目映射失败则整体失败
    pub fn to_videos(state: &PageState, kind: ItemListKind) -> Result<Vec<Video>, ScrapeError> {
        state
            .item_ids(kind)?
            .iter()
            .map(|id| Self::to_video(state, id))
            .collect()
    }
}

/// 秒级时间戳字段转本地日期
fn date_at(node: &Node<'_>, rel_path: &str) -> Result<String, ScrapeError> {
    let secs = node.u64(rel_path)?;
    format_local_date(secs)
        .ok_or_else(|| ScrapeError::FieldMissing(format!("{}.{}", node.path(), rel_path)))
}

/// 必需且非空的标识字段
fn non_empty(node: &Node<'_>, rel_path: &str) -> Result<String, ScrapeError> {
    let value = node.str(rel_path)?;
    if value.trim().is_empty() {
        return Err(ScrapeError::FieldMissing(format!(
            "{}.{}",
            node.path(),
            rel_path
        )));
    }
    Ok(value)
}
