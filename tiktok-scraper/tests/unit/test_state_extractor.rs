use tiktok_scraper::models::{ItemListKind, ScrapeError};
use tiktok_scraper::services::{StateExtractor, StateFormat};

const STATE: &str = r#"{"ItemList":{"video":{"list":["712345"]}},"ItemModule":{"712345":{"video":{"height":1920}}}}"#;

// ============================================================================
// 已知格式
// ============================================================================

#[test]
fn test_extract_script_tag() {
    let html = format!(
        r#"<html><head></head><body><script id="SIGI_STATE" type="application/json">{}</script></body></html>"#,
        STATE
    );
    let state = StateExtractor::default().extract(&html).unwrap();

    let id = state.primary_item_id(ItemListKind::Video).unwrap();
    assert_eq!(id, "712345");
    assert_eq!(state.item(&id).unwrap().u64("video.height").unwrap(), 1920);
}

#[test]
fn test_extract_全局变量赋值() {
    let html = format!(
        "<script>window['SIGI_STATE']={};window['SIGI_RETRY']={{\"retry\":1}}</script>",
        STATE
    );
    let state = StateExtractor::default().extract(&html).unwrap();
    assert_eq!(state.primary_item_id(ItemListKind::Video).unwrap(), "712345");
}

#[test]
fn test_extract_纯json文档() {
    let state = StateExtractor::default().extract(&format!("\n  {}  \n", STATE)).unwrap();
    assert!(state.item("712345").is_ok());
}

#[test]
fn test_extract_单引号属性() {
    let html = format!("<script type='application/json' id='SIGI_STATE'>{}</script>", STATE);
    assert!(StateExtractor::default().extract(&html).is_ok());
}

// ============================================================================
// 错误场景
// ============================================================================

#[test]
fn test_extract_没有标记() {
    let html = "<html><body><h1>Access denied</h1><script>var a = 1;</script></body></html>";
    assert_eq!(
        StateExtractor::default().extract(html).unwrap_err(),
        ScrapeError::StateNotFound
    );
}

#[test]
fn test_extract_空内容() {
    assert_eq!(
        StateExtractor::default().extract("").unwrap_err(),
        ScrapeError::StateNotFound
    );
}

#[test]
fn test_extract_截断的json() {
    let truncated = &STATE[..STATE.len() / 2];
    let html = format!(
        r#"<script id="SIGI_STATE" type="application/json">{}</script>"#,
        truncated
    );

    match StateExtractor::default().extract(&html) {
        Err(ScrapeError::MalformedState { span, reason }) => {
            assert_eq!(span, truncated);
            assert!(!reason.is_empty());
        }
        other => panic!("expected MalformedState, got {:?}", other),
    }
}

#[test]
fn test_extract_非对象状态() {
    let html = r#"<script id="SIGI_STATE">[1, 2, 3]</script>"#;
    assert!(matches!(
        StateExtractor::default().extract(html),
        Err(ScrapeError::MalformedState { .. })
    ));
}

#[test]
fn test_extract_超长片段预览被截断() {
    let long = format!("{{\"desc\":\"{}", "长".repeat(4000));
    let html = format!(r#"<script id="SIGI_STATE">{}</script>"#, long);

    match StateExtractor::default().extract(&html) {
        Err(ScrapeError::MalformedState { span, .. }) => {
            assert!(span.len() <= 2048);
            assert!(long.starts_with(&span));
        }
        other => panic!("expected MalformedState, got {:?}", other),
    }
}

// ============================================================================
// 扩展格式
// ============================================================================

#[test]
fn test_extract_追加新格式() {
    let html = format!(
        r#"<script id="__UNIVERSAL_DATA_FOR_REHYDRATION__" type="application/json">{}</script>"#,
        STATE
    );

    assert_eq!(
        StateExtractor::default().extract(&html).unwrap_err(),
        ScrapeError::StateNotFound
    );

    let extractor = StateExtractor::default()
        .with_format(StateFormat::script_tag("__UNIVERSAL_DATA_FOR_REHYDRATION__"));
    assert_eq!(extractor.formats().len(), 4);
    assert!(extractor.extract(&html).is_ok());
}

#[test]
fn test_extract_空格式表() {
    assert_eq!(
        StateExtractor::empty().extract(STATE).unwrap_err(),
        ScrapeError::StateNotFound
    );
}
