use chrono::{Local, TimeZone};

/// 日历日期格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 将秒级时间戳转换为指定时区的日历日期
///
/// 例: 1650000000 (UTC) → "2022-04-15"
/// 时间戳超出范围时返回 None
pub fn format_date_in<Tz>(epoch_seconds: u64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let secs = i64::try_from(epoch_seconds).ok()?;
    tz.timestamp_opt(secs, 0)
        .single()
        .map(|dt| dt.format(DATE_FORMAT).to_string())
}

/// 将秒级时间戳转换为本地时区的日历日期
pub fn format_local_date(epoch_seconds: u64) -> Option<String> {
    format_date_in(epoch_seconds, &Local)
}
