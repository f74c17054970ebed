use chrono::{FixedOffset, Utc};
use tiktok_scraper::utils::time_utils::{format_date_in, format_local_date, DATE_FORMAT};

// ============================================================================
// format_date_in 测试
// ============================================================================

#[test]
fn test_format_date_in_utc() {
    assert_eq!(
        format_date_in(1_650_000_000, &Utc),
        Some("2022-04-15".to_string())
    );
}

#[test]
fn test_format_date_in_纪元起点() {
    assert_eq!(format_date_in(0, &Utc), Some("1970-01-01".to_string()));
}

#[test]
fn test_format_date_in_东八区跨日() {
    // 2022-04-15 16:30:00 UTC = 2022-04-16 00:30:00 +08:00
    let ts = 1_650_040_200;
    let beijing = FixedOffset::east_opt(8 * 3600).unwrap();

    assert_eq!(format_date_in(ts, &Utc), Some("2022-04-15".to_string()));
    assert_eq!(format_date_in(ts, &beijing), Some("2022-04-16".to_string()));
}

#[test]
fn test_format_date_in_西五区跨日() {
    // 2022-04-15 02:00:00 UTC = 2022-04-14 21:00:00 -05:00
    let ts = 1_649_988_000;
    let new_york = FixedOffset::west_opt(5 * 3600).unwrap();

    assert_eq!(format_date_in(ts, &new_york), Some("2022-04-14".to_string()));
}

#[test]
fn test_format_date_in_超出范围() {
    assert_eq!(format_date_in(u64::MAX, &Utc), None);
}

// ============================================================================
// format_local_date 测试
// ============================================================================

#[test]
fn test_format_local_date_格式() {
    let date = format_local_date(1_650_000_000).unwrap();

    assert_eq!(date.len(), 10);
    assert!(chrono::NaiveDate::parse_from_str(&date, DATE_FORMAT).is_ok());
}

#[test]
fn test_format_local_date_确定性() {
    assert_eq!(
        format_local_date(1_650_000_000),
        format_local_date(1_650_000_000)
    );
}
