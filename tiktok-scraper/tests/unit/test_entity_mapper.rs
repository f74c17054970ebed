use serde_json::{json, Value};
use tiktok_scraper::models::{ItemListKind, PageState, ScrapeError};
use tiktok_scraper::services::EntityMapper;
use tiktok_scraper::utils::time_utils::format_local_date;

fn fixture() -> Value {
    json!({
        "ItemList": { "video": { "list": ["712345"] } },
        "ItemModule": {
            "712345": {
                "id": "712345",
                "desc": "",
                "createTime": 1_650_000_000u64,
                "author": "alice",
                "video": {
                    "id": "712345",
                    "height": 1920,
                    "width": 1080,
                    "duration": "15",
                    "ratio": "720p",
                    "cover": "https://p16.example/cover.jpeg",
                    "dynamicCover": "  ",
                    "playAddr": "https://v16.example/play.mp4",
                    "downloadAddr": "https://v16.example/download.mp4",
                    "format": "mp4"
                },
                "stats": {
                    "shareCount": "12",
                    "diggCount": 345,
                    "commentCount": 6.0,
                    "playCount": 7890
                },
                "music": {
                    "id": 6800000000000000001u64,
                    "title": "original sound",
                    "playUrl": "https://sf16.example/music.mp3",
                    "coverLarge": "https://p16.example/large.jpeg",
                    "coverThumb": "https://p16.example/thumb.jpeg",
                    "authorName": "alice",
                    "duration": 15,
                    "album": ""
                }
            }
        },
        "UserModule": {
            "users": {
                "alice": {
                    "id": "6000000000000000001",
                    "uniqueId": "alice",
                    "nickname": "Alice",
                    "avatarLarger": "https://p16.example/avatar.jpeg",
                    "signature": "\n hello \n",
                    "createTime": "1600000000",
                    "verified": false,
                    "secUid": "MS4wLjABAAAA-alice",
                    "privateAccount": "true",
                    "isUnderAge18": true
                }
            },
            "stats": {
                "alice": {
                    "followerCount": 1,
                    "followingCount": 2,
                    "heartCount": 3,
                    "videoCount": 4
                }
            }
        }
    })
}

fn state() -> PageState {
    PageState::new(fixture())
}

// ============================================================================
// to_video 测试
// ============================================================================

#[test]
fn test_to_video_首个条目() {
    let s = state();
    let id = s.primary_item_id(ItemListKind::Video).unwrap();
    let video = EntityMapper::to_video(&s, &id).unwrap();

    assert_eq!(video.id, "712345");
    assert_eq!(video.height, 1920);
    assert_eq!(video.duration, 15);
    assert_eq!(video.description, "");
    assert_eq!(video.share_count, 12);
    assert_eq!(video.comment_count, 6);
    assert_eq!(video.created_at, format_local_date(1_650_000_000).unwrap());
    assert_eq!(video.dynamic_cover, None);
    assert_eq!(video.format.as_deref(), Some("mp4"));
    assert_eq!(video.author.as_deref(), Some("alice"));
}

#[test]
fn test_to_video_映射两次结果相等() {
    let s = state();
    assert_eq!(
        EntityMapper::to_video(&s, "712345").unwrap(),
        EntityMapper::to_video(&s, "712345").unwrap()
    );
    assert_eq!(
        EntityMapper::to_user(&s, "alice").unwrap(),
        EntityMapper::to_user(&s, "alice").unwrap()
    );
}

#[test]
fn test_to_video_作者回退到昵称() {
    let mut raw = fixture();
    let item = raw["ItemModule"]["712345"].as_object_mut().unwrap();
    item.remove("author");
    item.insert("nickname".to_string(), json!("Alice"));

    let video = EntityMapper::to_video(&PageState::new(raw), "712345").unwrap();
    assert_eq!(video.author.as_deref(), Some("Alice"));
}

#[test]
fn test_to_video_条目不存在() {
    assert_eq!(
        EntityMapper::to_video(&state(), "999").unwrap_err(),
        ScrapeError::FieldMissing("ItemModule.999".to_string())
    );
}

#[test]
fn test_to_video_数值无法转换() {
    let mut raw = fixture();
    raw["ItemModule"]["712345"]["video"]["width"] = json!("wide");

    assert_eq!(
        EntityMapper::to_video(&PageState::new(raw), "712345").unwrap_err(),
        ScrapeError::FieldMissing("ItemModule.712345.video.width".to_string())
    );
}

#[test]
fn test_to_videos_保持列表顺序() {
    let mut raw = fixture();
    let second = raw["ItemModule"]["712345"].clone();
    raw["ItemModule"]["700001"] = second;
    raw["ItemModule"]["700001"]["video"]["id"] = json!("700001");
    raw["ItemList"]["challenge"] = json!({ "list": ["700001", "712345"] });

    let videos = EntityMapper::to_videos(&PageState::new(raw), ItemListKind::Challenge).unwrap();
    let ids: Vec<&str> = videos.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["700001", "712345"]);
}

// ============================================================================
// to_user 测试
// ============================================================================

#[test]
fn test_to_user_字段转换() {
    let user = EntityMapper::to_user(&state(), "alice").unwrap();

    assert_eq!(user.signature, "hello");
    assert_eq!(user.created_at, format_local_date(1_600_000_000).unwrap());
    assert!(user.private_account);
    assert!(user.under_age_18);
    assert_eq!(user.bio_link, None);
    assert_eq!(user.hearts, 3);
    assert_eq!(user.videos, 4);
}

#[test]
fn test_to_user_用户不存在() {
    let mut raw = fixture();
    raw["UserModule"]["users"] = json!({});

    assert_eq!(
        EntityMapper::to_user(&PageState::new(raw), "alice").unwrap_err(),
        ScrapeError::FieldMissing("UserModule.users.alice".to_string())
    );
}

#[test]
fn test_to_user_缺少统计() {
    let mut raw = fixture();
    raw["UserModule"]
        .as_object_mut()
        .unwrap()
        .remove("stats");

    assert_eq!(
        EntityMapper::to_user(&PageState::new(raw), "alice").unwrap_err(),
        ScrapeError::FieldMissing("UserModule.stats".to_string())
    );
}

// ============================================================================
// to_music / to_scrape_result 测试
// ============================================================================

#[test]
fn test_to_music_可选字段() {
    let music = EntityMapper::to_music(&state(), "712345").unwrap();

    assert_eq!(music.id, "6800000000000000001");
    assert_eq!(music.original, None);
    assert_eq!(music.album, None);
}

#[test]
fn test_to_scrape_result_链接与缩略图() {
    let result =
        EntityMapper::to_scrape_result(&state(), "712345", "https://www.tiktok.com/").unwrap();

    assert_eq!(result.link, "https://www.tiktok.com/@alice/video/712345");
    assert_eq!(result.thumbnail, "https://p16.example/cover.jpeg");
    assert_eq!(result.author.id, "6000000000000000001");
    assert_eq!(result.author.verified, Some(false));
    assert_eq!(result.comment_count, 6);
    assert_eq!(result.audio.author, "alice");
}

#[test]
fn test_to_scrape_result_作者资料缺失() {
    let mut raw = fixture();
    raw["ItemModule"]["712345"]["author"] = json!("bob");

    assert_eq!(
        EntityMapper::to_scrape_result(&PageState::new(raw), "712345", "https://www.tiktok.com")
            .unwrap_err(),
        ScrapeError::FieldMissing("UserModule.users.bob".to_string())
    );
}
