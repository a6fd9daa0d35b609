//! 时间工具函数
//!
//! 记录中的时间字段有两种形态：Unix millis (`created_at`) 和用户录入的
//! 字符串 (`appointment_date`)。这里统一转换为 `DateTime<Utc>`，
//! 无法解析时返回 `None`，由调用方决定忽略。

use chrono::{DateTime, NaiveDate, Utc};

/// Unix millis → UTC 时间，超出范围返回 `None`
pub fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// 解析用户录入的日期/时间
///
/// 支持：
/// - RFC 3339 (`2024-03-05T10:00:00Z`, `2024-03-05T10:00:00+08:00`)
/// - 无时区的 `YYYY-MM-DDTHH:MM[:SS]` (按 UTC 处理)
/// - 纯日期 `YYYY-MM-DD` (当日 00:00 UTC)
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if s.contains('T') {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        return ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
            .iter()
            .find_map(|fmt| chrono::NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|naive| naive.and_utc());
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// 当前 UTC 日期
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
