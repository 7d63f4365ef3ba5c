//! 时间工具函数 — 业务时区转换
//!
//! 所有日期→时间戳转换统一在 handler/聚合层完成，
//! 仓库层只接收 `i64` Unix millis。

use chrono::{NaiveDate, TimeZone};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 日期 + 时分秒 → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn date_hms_to_millis(date: NaiveDate, hour: u32, min: u32, sec: u32, tz: Tz) -> i64 {
    let naive = date
        .and_hms_opt(hour, min, sec)
        .unwrap_or_else(|| date.and_hms_opt(0, 0, 0).expect("midnight always exists"));
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期开始 (00:00:00.000) → Unix millis (业务时区)
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_hms_to_millis(date, 0, 0, 0, tz)
}

/// 日期结束 (23:59:59.999) → Unix millis (业务时区)
///
/// 返回当日最后一毫秒，调用方使用 `<= end` (含) 语义。
pub fn end_of_day_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_hms_to_millis(date, 23, 59, 59, tz) + 999
}

/// 时间戳 → 业务时区日历日期
pub fn local_date(timestamp_ms: i64, tz: Tz) -> Option<NaiveDate> {
    chrono::DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.with_timezone(&tz).date_naive())
}

/// 业务时区的"今天"
pub fn today(tz: Tz, now_ms: i64) -> NaiveDate {
    tz.timestamp_millis_opt(now_ms)
        .latest()
        .map(|dt| dt.date_naive())
        .unwrap_or_else(|| chrono::Utc::now().date_naive())
}
