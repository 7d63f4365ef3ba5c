//! Time Window Resolution
//!
//! Maps the report ranges the UI offers onto inclusive
//! `[start_ms, end_ms]` windows in the business timezone. `All` is
//! represented as the absence of a window — never `[0, +∞)` — so the
//! inclusive boundary arithmetic elsewhere cannot produce off-by-one
//! surprises at the extremes.

use chrono::{Datelike, Duration};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use shared::models::InboundConnection;

use crate::utils::time::{day_start_millis, end_of_day_millis, parse_date, today};
use crate::utils::{AppError, AppResult};

/// Report range selector (wire values match the UI contract).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatsRange {
    ThisWeek,
    LastWeek,
    ThisMonth,
    Custom,
    All,
}

/// Inclusive window in Unix millis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start_ms: i64,
    pub end_ms: i64,
}

/// Resolve a range into a concrete window.
///
/// - `ThisWeek`: Monday 00:00 of the current ISO week through `now`
/// - `LastWeek`: preceding Monday through Sunday 23:59:59.999
/// - `ThisMonth`: the 1st, 00:00, through `now`
/// - `Custom`: caller dates, end inclusive through 23:59:59.999
/// - `All`: `None` (no filtering)
///
/// `now_ms` is passed in rather than read from the clock so the
/// computation stays pure.
pub fn resolve_window(
    range: StatsRange,
    custom_start: Option<&str>,
    custom_end: Option<&str>,
    tz: Tz,
    now_ms: i64,
) -> AppResult<Option<Window>> {
    let today = today(tz, now_ms);

    let window = match range {
        StatsRange::ThisWeek => {
            let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
            Window {
                start_ms: day_start_millis(monday, tz),
                end_ms: now_ms,
            }
        }
        StatsRange::LastWeek => {
            let this_monday =
                today - Duration::days(today.weekday().num_days_from_monday() as i64);
            let last_monday = this_monday - Duration::days(7);
            let last_sunday = this_monday - Duration::days(1);
            Window {
                start_ms: day_start_millis(last_monday, tz),
                end_ms: end_of_day_millis(last_sunday, tz),
            }
        }
        StatsRange::ThisMonth => {
            let first = today.with_day(1).unwrap_or(today);
            Window {
                start_ms: day_start_millis(first, tz),
                end_ms: now_ms,
            }
        }
        StatsRange::Custom => {
            let (start, end) = match (custom_start, custom_end) {
                (Some(s), Some(e)) => (parse_date(s)?, parse_date(e)?),
                _ => {
                    return Err(AppError::validation(
                        "custom range requires startDate and endDate",
                    ));
                }
            };
            if end < start {
                return Err(AppError::validation("endDate is before startDate"));
            }
            Window {
                start_ms: day_start_millis(start, tz),
                end_ms: end_of_day_millis(end, tz),
            }
        }
        StatsRange::All => return Ok(None),
    };

    Ok(Some(window))
}

/// Filter connections to the window, inclusive on both ends.
/// Stable: input order is preserved.
pub fn filter_by_window<'a>(
    connections: &'a [InboundConnection],
    window: Option<&Window>,
) -> Vec<&'a InboundConnection> {
    match window {
        None => connections.iter().collect(),
        Some(w) => connections
            .iter()
            .filter(|c| c.timestamp >= w.start_ms && c.timestamp <= w.end_ms)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Asia::Taipei;

    use crate::utils::time::date_hms_to_millis;

    fn conn(id: &str, timestamp: i64) -> InboundConnection {
        InboundConnection {
            id: id.to_string(),
            external_id: format!("U{id}"),
            display_name: String::new(),
            avatar_url: String::new(),
            is_bound: false,
            timestamp,
            source: String::new(),
            is_blocked: false,
        }
    }

    // Wednesday 2026-08-19 12:00 Taipei
    fn wednesday_noon() -> i64 {
        date_hms_to_millis(parse_date("2026-08-19").unwrap(), 12, 0, 0, Taipei)
    }

    #[test]
    fn this_week_starts_monday_midnight() {
        let now = wednesday_noon();
        let w = resolve_window(StatsRange::ThisWeek, None, None, Taipei, now)
            .unwrap()
            .unwrap();
        let monday = parse_date("2026-08-17").unwrap();
        assert_eq!(w.start_ms, day_start_millis(monday, Taipei));
        assert_eq!(w.end_ms, now);
    }

    #[test]
    fn last_week_is_full_monday_to_sunday() {
        let now = wednesday_noon();
        let w = resolve_window(StatsRange::LastWeek, None, None, Taipei, now)
            .unwrap()
            .unwrap();
        assert_eq!(w.start_ms, day_start_millis(parse_date("2026-08-10").unwrap(), Taipei));
        assert_eq!(w.end_ms, end_of_day_millis(parse_date("2026-08-16").unwrap(), Taipei));
    }

    #[test]
    fn this_month_starts_on_the_first() {
        let now = wednesday_noon();
        let w = resolve_window(StatsRange::ThisMonth, None, None, Taipei, now)
            .unwrap()
            .unwrap();
        assert_eq!(w.start_ms, day_start_millis(parse_date("2026-08-01").unwrap(), Taipei));
    }

    #[test]
    fn custom_end_of_day_instant_is_included() {
        let w = resolve_window(
            StatsRange::Custom,
            Some("2026-08-01"),
            Some("2026-08-02"),
            Taipei,
            wednesday_noon(),
        )
        .unwrap()
        .unwrap();

        // Exactly 23:59:59.999 on the end day must be inside.
        let boundary = end_of_day_millis(parse_date("2026-08-02").unwrap(), Taipei);
        let connections = vec![conn("edge", boundary), conn("after", boundary + 1)];
        let filtered = filter_by_window(&connections, Some(&w));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "edge");
    }

    #[test]
    fn custom_without_dates_is_rejected() {
        let err = resolve_window(StatsRange::Custom, Some("2026-08-01"), None, Taipei, 0);
        assert!(err.is_err());
    }

    #[test]
    fn all_means_no_filtering() {
        let w = resolve_window(StatsRange::All, None, None, Taipei, wednesday_noon()).unwrap();
        assert!(w.is_none());
        // Even a zero/negative timestamp passes through untouched.
        let connections = vec![conn("ancient", 0), conn("future", i64::MAX)];
        assert_eq!(filter_by_window(&connections, None).len(), 2);
    }
}
