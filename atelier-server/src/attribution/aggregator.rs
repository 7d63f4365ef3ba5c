//! Attribution Aggregation
//!
//! Pure derived-data computations over windowed connection snapshots:
//! baseline-reconciled totals, per-source breakdowns and daily growth
//! series for the marketing dashboard.

use std::collections::HashMap;

use chrono_tz::Tz;
use serde::Serialize;
use shared::models::InboundConnection;

use crate::utils::time::local_date;

/// Fallback tag for connections with no attributable source.
pub const FALLBACK_SOURCE: &str = "direct/unclassified";

/// Baseline-reconciled current total.
///
/// `BASELINE + active-since-baseline − blocked-overall`. The blocked
/// count deliberately spans the entire history, not the window. This
/// mixes a point-in-time manual snapshot with a growing delta, so it
/// is an approximation of the platform's friend count, not an exact
/// ledger.
pub fn current_total(
    all_connections: &[InboundConnection],
    baseline_count: i64,
    baseline_timestamp_ms: i64,
) -> i64 {
    let active_since_baseline = all_connections
        .iter()
        .filter(|c| c.timestamp > baseline_timestamp_ms && !c.is_blocked)
        .count() as i64;
    let blocked_now = all_connections.iter().filter(|c| c.is_blocked).count() as i64;
    baseline_count + active_since_baseline - blocked_now
}

/// One row of the per-source breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCount {
    pub source: String,
    pub count: u64,
}

/// Group windowed connections by effective source tag.
///
/// Effective source: the connection's own tag, else the landing-page
/// lookup by externalId, else [`FALLBACK_SOURCE`]. Blocked connections
/// are excluded. Sorted descending by count; ties broken by first-seen
/// order in the input, which keeps the output deterministic.
pub fn source_breakdown(
    windowed: &[&InboundConnection],
    source_lookup: &HashMap<String, String>,
) -> Vec<SourceCount> {
    let mut first_seen: Vec<String> = Vec::new();
    let mut counts: HashMap<String, u64> = HashMap::new();

    for conn in windowed.iter().filter(|c| !c.is_blocked) {
        let tag = if !conn.source.is_empty() {
            conn.source.clone()
        } else if let Some(mapped) = source_lookup.get(&conn.external_id) {
            mapped.clone()
        } else {
            FALLBACK_SOURCE.to_string()
        };

        if !counts.contains_key(&tag) {
            first_seen.push(tag.clone());
        }
        *counts.entry(tag).or_insert(0) += 1;
    }

    let rank: HashMap<&str, usize> = first_seen
        .iter()
        .enumerate()
        .map(|(i, tag)| (tag.as_str(), i))
        .collect();

    let mut breakdown: Vec<SourceCount> = counts
        .into_iter()
        .map(|(source, count)| SourceCount { source, count })
        .collect();
    breakdown.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| rank[a.source.as_str()].cmp(&rank[b.source.as_str()]))
    });
    breakdown
}

/// One point of the daily growth series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    pub date: String,
    pub count: u64,
}

/// Bucket windowed connections by business-timezone calendar day.
///
/// One point per day actually present in the set — days with zero
/// connections are not synthesized, gaps in the series are real gaps.
/// Ascending by date.
pub fn daily_series(windowed: &[&InboundConnection], tz: Tz) -> Vec<DailyPoint> {
    let mut buckets: std::collections::BTreeMap<chrono::NaiveDate, u64> =
        std::collections::BTreeMap::new();

    for conn in windowed {
        match local_date(conn.timestamp, tz) {
            Some(date) => *buckets.entry(date).or_insert(0) += 1,
            None => {
                tracing::warn!(id = %conn.id, timestamp = conn.timestamp, "Skipping record with out-of-range timestamp");
            }
        }
    }

    buckets
        .into_iter()
        .map(|(date, count)| DailyPoint {
            date: date.format("%Y-%m-%d").to_string(),
            count,
        })
        .collect()
}

/// Unblocked windowed count divided by the number of series days.
///
/// The `max(1, …)` guard avoids dividing by zero on an empty window;
/// note that a non-zero numerator over the forced denominator of 1 can
/// read as a misleading "average" — the dashboard labels it
/// accordingly.
pub fn average_daily_growth(windowed: &[&InboundConnection], series_days: usize) -> f64 {
    let unblocked = windowed.iter().filter(|c| !c.is_blocked).count() as f64;
    unblocked / series_days.max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Asia::Taipei;

    const BASELINE_COUNT: i64 = 858;
    const BASELINE_TS: i64 = 1_711_900_799_999;

    fn conn(id: &str, timestamp: i64, source: &str, blocked: bool) -> InboundConnection {
        InboundConnection {
            id: id.to_string(),
            external_id: format!("U{id}"),
            display_name: String::new(),
            avatar_url: String::new(),
            is_bound: false,
            timestamp,
            source: source.to_string(),
            is_blocked: blocked,
        }
    }

    #[test]
    fn empty_history_yields_baseline() {
        assert_eq!(current_total(&[], BASELINE_COUNT, BASELINE_TS), BASELINE_COUNT);
    }

    #[test]
    fn one_active_one_blocked_cancels_out() {
        let history = vec![
            conn("a", BASELINE_TS + 1, "", false),
            conn("b", BASELINE_TS + 2, "", true),
        ];
        // +1 active, −1 blocked → back to baseline.
        assert_eq!(
            current_total(&history, BASELINE_COUNT, BASELINE_TS),
            BASELINE_COUNT
        );
    }

    #[test]
    fn pre_baseline_connections_do_not_add() {
        let history = vec![conn("old", BASELINE_TS - 1, "", false)];
        assert_eq!(
            current_total(&history, BASELINE_COUNT, BASELINE_TS),
            BASELINE_COUNT
        );
    }

    #[test]
    fn breakdown_follows_fallback_chain() {
        let c1 = conn("a", 1, "ig_promo", false); // own tag wins
        let c2 = conn("b", 2, "", false); // falls back to lookup
        let c3 = conn("c", 3, "", false); // unclassified
        let windowed: Vec<&InboundConnection> = vec![&c1, &c2, &c3];

        let mut lookup = HashMap::new();
        lookup.insert("Ub".to_string(), "fb_ad".to_string());

        let breakdown = source_breakdown(&windowed, &lookup);
        let tags: Vec<(&str, u64)> = breakdown
            .iter()
            .map(|s| (s.source.as_str(), s.count))
            .collect();
        assert!(tags.contains(&("ig_promo", 1)));
        assert!(tags.contains(&("fb_ad", 1)));
        assert!(tags.contains(&(FALLBACK_SOURCE, 1)));
    }

    #[test]
    fn breakdown_excludes_blocked_and_sorts_by_count() {
        let c1 = conn("a", 1, "ig_promo", false);
        let c2 = conn("b", 2, "ig_promo", false);
        let c3 = conn("c", 3, "fb_ad", false);
        let c4 = conn("d", 4, "fb_ad", true); // blocked, dropped
        let windowed: Vec<&InboundConnection> = vec![&c1, &c2, &c3, &c4];

        let breakdown = source_breakdown(&windowed, &HashMap::new());
        assert_eq!(breakdown[0].source, "ig_promo");
        assert_eq!(breakdown[0].count, 2);
        assert_eq!(breakdown[1].source, "fb_ad");
        assert_eq!(breakdown[1].count, 1);
    }

    #[test]
    fn breakdown_ties_break_by_first_seen() {
        let c1 = conn("a", 1, "beta", false);
        let c2 = conn("b", 2, "alpha", false);
        let windowed: Vec<&InboundConnection> = vec![&c1, &c2];

        let breakdown = source_breakdown(&windowed, &HashMap::new());
        // Equal counts: "beta" appeared first in the input, so it wins
        // over the alphabetically-earlier "alpha".
        assert_eq!(breakdown[0].source, "beta");
        assert_eq!(breakdown[1].source, "alpha");
    }

    #[test]
    fn daily_series_skips_empty_days() {
        // Aug 1 and Aug 3 Taipei time, nothing on Aug 2.
        let aug1 = 1_753_977_600_000 + 3_600_000; // 2025-08-01 01:00 +08
        let aug3 = aug1 + 2 * 24 * 3_600_000;
        let c1 = conn("a", aug1, "", false);
        let c2 = conn("b", aug1 + 60_000, "", false);
        let c3 = conn("c", aug3, "", false);
        let windowed: Vec<&InboundConnection> = vec![&c1, &c2, &c3];

        let series = daily_series(&windowed, Taipei);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0], DailyPoint { date: "2025-08-01".to_string(), count: 2 });
        assert_eq!(series[1], DailyPoint { date: "2025-08-03".to_string(), count: 1 });
    }

    #[test]
    fn daily_series_skips_out_of_range_timestamps() {
        let good = conn("a", 1_753_977_600_000, "", false);
        // i64::MAX is outside chrono's representable range.
        let bad = conn("b", i64::MAX, "", false);
        let windowed: Vec<&InboundConnection> = vec![&good, &bad];

        let series = daily_series(&windowed, Taipei);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].date, "2025-08-01");
    }

    #[test]
    fn average_growth_guards_empty_series() {
        let windowed: Vec<&InboundConnection> = Vec::new();
        assert_eq!(average_daily_growth(&windowed, 0), 0.0);
    }

    #[test]
    fn average_growth_divides_by_series_days() {
        let c1 = conn("a", 1, "", false);
        let c2 = conn("b", 2, "", false);
        let c3 = conn("c", 3, "", true); // blocked, excluded from numerator
        let windowed: Vec<&InboundConnection> = vec![&c1, &c2, &c3];
        assert_eq!(average_daily_growth(&windowed, 2), 1.0);
    }
}
