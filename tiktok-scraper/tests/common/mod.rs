//! 测试公共模块
//!
//! 提供Mock获取器/下载器与页面夹具, 契约测试不访问网络。

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tiktok_scraper::models::{ScrapeError, ScraperConfig};
use tiktok_scraper::services::{FetchMode, MediaDownloader, PageFetcher};
use tiktok_scraper::TikTokScraper;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

pub const VIDEO_URL: &str = "https://www.tiktok.com/@alice/video/712345";
pub const USER_URL: &str = "https://www.tiktok.com/@alice";
pub const TAG_URL: &str = "https://www.tiktok.com/tag/rust";
pub const CREATE_TIME: u64 = 1_650_000_000;

/// Mock页面获取器
///
/// 按 (URL, 模式) 返回预置响应, 并记录每一次调用。
/// 未预置的请求返回 `FetchFailed`。
pub struct MockPageFetcher {
    responses: Mutex<HashMap<(String, FetchMode), Result<String, ScrapeError>>>,
    calls: Mutex<Vec<(String, FetchMode)>>,
}

impl MockPageFetcher {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// 预置成功响应
    pub async fn respond(&self, url: &str, mode: FetchMode, body: impl Into<String>) {
        self.responses
            .lock()
            .await
            .insert((url.to_string(), mode), Ok(body.into()));
    }

    /// 预置失败响应
    pub async fn fail(&self, url: &str, mode: FetchMode, err: ScrapeError) {
        self.responses
            .lock()
            .await
            .insert((url.to_string(), mode), Err(err));
    }

    pub async fn calls(&self) -> Vec<(String, FetchMode)> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait]
impl PageFetcher for MockPageFetcher {
    async fn fetch(&self, url: &str, mode: FetchMode) -> Result<String, ScrapeError> {
        self.calls.lock().await.push((url.to_string(), mode));
        self.responses
            .lock()
            .await
            .get(&(url.to_string(), mode))
            .cloned()
            .unwrap_or_else(|| Err(ScrapeError::fetch_failed(url, "没有预置响应")))
    }
}

/// Mock媒体下载器
///
/// 已注册的URL写出预置字节, 其余URL返回 `FetchFailed`
pub struct MockMediaDownloader {
    media: Mutex<HashMap<String, Vec<u8>>>,
    requested: Mutex<Vec<String>>,
}

impl MockMediaDownloader {
    pub fn new() -> Self {
        Self {
            media: Mutex::new(HashMap::new()),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub async fn serve(&self, url: &str, bytes: &[u8]) {
        self.media.lock().await.insert(url.to_string(), bytes.to_vec());
    }

    pub async fn requested(&self) -> Vec<String> {
        self.requested.lock().await.clone()
    }
}

#[async_trait]
impl MediaDownloader for MockMediaDownloader {
    async fn download(
        &self,
        url: &str,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<u64, ScrapeError> {
        self.requested.lock().await.push(url.to_string());
        let bytes = self
            .media
            .lock()
            .await
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::fetch_failed(url, "HTTP状态码 404"))?;

        sink.write_all(&bytes)
            .await
            .map_err(|e| ScrapeError::DownloadFailed {
                path: url.to_string(),
                reason: e.to_string(),
            })?;
        sink.flush().await.map_err(|e| ScrapeError::DownloadFailed {
            path: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(bytes.len() as u64)
    }
}

/// 用Mock后端构建抓取器
pub fn scraper_with(
    config: ScraperConfig,
    fetcher: &Arc<MockPageFetcher>,
    downloader: &Arc<MockMediaDownloader>,
) -> TikTokScraper {
    TikTokScraper::with_backends(config, fetcher.clone(), downloader.clone())
}

/// 默认配置 + 全新的Mock
pub fn default_scraper() -> (TikTokScraper, Arc<MockPageFetcher>, Arc<MockMediaDownloader>) {
    let fetcher = Arc::new(MockPageFetcher::new());
    let downloader = Arc::new(MockMediaDownloader::new());
    let scraper = scraper_with(ScraperConfig::default(), &fetcher, &downloader);
    (scraper, fetcher, downloader)
}

// ============================================================================
// 页面夹具
// ============================================================================

/// 单个条目 (`ItemModule[id]`)
pub fn item(id: &str, height: u64) -> Value {
    json!({
        "id": id,
        "desc": format!("video {}", id),
        "createTime": CREATE_TIME.to_string(),
        "author": "alice",
        "nickname": "Alice",
        "video": {
            "id": id,
            "height": height,
            "width": "1080",
            "duration": 15,
            "ratio": "720p",
            "cover": format!("https://p16.example/{}/cover.jpeg", id),
            "dynamicCover": format!("https://p16.example/{}/dynamic.webp", id),
            "playAddr": format!("https://v16.example/{}/play.mp4", id),
            "downloadAddr": download_addr(id),
            "format": "mp4"
        },
        "stats": {
            "shareCount": 12,
            "diggCount": 345,
            "commentCount": "6",
            "playCount": 7890
        },
        "music": {
            "id": "6800000000000000001",
            "title": "original sound - alice",
            "playUrl": " https://sf16.example/music.mp3 ",
            "coverLarge": "https://p16.example/music_large.jpeg",
            "coverThumb": "https://p16.example/music_thumb.jpeg",
            "authorName": "alice",
            "duration": 15,
            "original": true
        }
    })
}

pub fn download_addr(id: &str) -> String {
    format!("https://v16.example/{}/download.mp4", id)
}

/// 用户 alice
pub fn alice() -> (Value, Value) {
    (
        json!({
            "id": "6000000000000000001",
            "uniqueId": "alice",
            "nickname": "Alice",
            "avatarLarger": " https://p16.example/avatar.jpeg ",
            "signature": "  rust & video  ",
            "createTime": 1_600_000_000u64,
            "verified": true,
            "secUid": "MS4wLjABAAAA-alice",
            "bioLink": { "link": "https://alice.example" },
            "privateAccount": false
        }),
        json!({
            "followerCount": 1000,
            "followingCount": 10,
            "heart": "50000",
            "videoCount": 3
        }),
    )
}

/// 包含给定条目的完整页面状态
///
/// 三种条目列表都指向同一组ID, 用户模块包含 alice
pub fn page_state(ids: &[&str]) -> Value {
    let items: serde_json::Map<String, Value> = ids
        .iter()
        .map(|id| (id.to_string(), item(id, 1920)))
        .collect();
    let (user, stats) = alice();

    json!({
        "ItemList": {
            "video": { "list": ids },
            "user-post": { "list": ids },
            "challenge": { "list": ids }
        },
        "ItemModule": items,
        "UserModule": {
            "users": { "alice": user },
            "stats": { "alice": stats }
        }
    })
}

/// 专用script标签包装
pub fn sigi_html(state: &Value) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><title>TikTok</title></head><body><script id="SIGI_STATE" type="application/json">{}</script></body></html>"#,
        state
    )
}

/// 全局变量赋值包装
pub fn window_html(state: &Value) -> String {
    format!(
        r#"<html><body><script>window['SIGI_STATE']={};window['SIGI_RETRY']={{"retry":1}}</script></body></html>"#,
        state
    )
}

/// 没有内嵌状态的页面 (例如验证码拦截页)
pub fn blocked_html() -> String {
    "<html><body><div id=\"captcha\">verify</div></body></html>".to_string()
}

pub fn detail_url(id: &str) -> String {
    ScraperConfig::default().detail_url(id)
}

/// 详情API响应, 带资源ID
pub fn detail_with_uri(uri: &str) -> String {
    json!({
        "status_code": 0,
        "aweme_detail": { "video": { "download_addr": { "uri": uri } } }
    })
    .to_string()
}

/// 详情API响应, 没有任何已知资源路径
pub fn detail_without_asset() -> String {
    json!({ "status_code": 0, "aweme_detail": { "video": {} } }).to_string()
}

pub fn play_url(uri: &str) -> String {
    format!("https://api-h2.tiktokv.com/aweme/v1/play/?video_id={}", uri)
}
