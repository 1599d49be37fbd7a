//! Freshness helpers for the results status line
//!
//! Pure functions that can be tested without UI dependencies.

use chrono::{DateTime, Duration, Utc};

/// How long ago the last-known-good results were received
///
/// Returns `None` if no results have been received yet.
pub fn results_age(last_success_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<Duration> {
    last_success_at.map(|at| (now - at).max(Duration::zero()))
}

/// Whether the displayed results have missed at least two poll ticks
///
/// Results that were never received count as stale.
pub fn results_stale(
    last_success_at: Option<DateTime<Utc>>,
    poll_interval_ms: u64,
    now: DateTime<Utc>,
) -> bool {
    let threshold_ms = i64::try_from(poll_interval_ms)
        .unwrap_or(i64::MAX)
        .saturating_mul(2);
    match results_age(last_success_at, now) {
        Some(age) => age.num_milliseconds() >= threshold_ms,
        None => true,
    }
}

/// Status line text describing how fresh the displayed results are
///
/// Ages under a day are spelled out relative to `now`; anything older falls
/// back to a UTC date. Stale results are flagged.
pub fn freshness_label(
    last_success_at: Option<DateTime<Utc>>,
    poll_interval_ms: u64,
    now: DateTime<Utc>,
) -> String {
    let Some(age) = results_age(last_success_at, now) else {
        return "Waiting for first results".to_string();
    };

    let when = if age.num_seconds() < 60 {
        "just now".to_string()
    } else if age.num_minutes() < 60 {
        plural(age.num_minutes(), "minute")
    } else if age.num_hours() < 24 {
        plural(age.num_hours(), "hour")
    } else {
        let at = last_success_at.unwrap_or(now);
        format!("on {}", at.format("%b %d at %H:%M UTC"))
    };

    if results_stale(last_success_at, poll_interval_ms, now) {
        format!("Updated {} (stale)", when)
    } else {
        format!("Updated {}", when)
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_received_is_stale() {
        let now = Utc::now();
        assert!(results_age(None, now).is_none());
        assert!(results_stale(None, 5000, now));
    }

    #[test]
    fn test_recent_results_are_fresh() {
        let now = Utc::now();
        let last = now - Duration::seconds(3);
        assert_eq!(results_age(Some(last), now), Some(Duration::seconds(3)));
        assert!(!results_stale(Some(last), 5000, now));
    }

    #[test]
    fn test_two_missed_ticks_are_stale() {
        let now = Utc::now();
        assert!(results_stale(Some(now - Duration::seconds(10)), 5000, now));
        assert!(!results_stale(Some(now - Duration::milliseconds(9999)), 5000, now));
    }

    #[test]
    fn test_huge_interval_never_overflows() {
        let now = Utc::now();
        let last = now - Duration::days(365);
        assert!(!results_stale(Some(last), u64::MAX, now));
        assert!(!results_stale(Some(last), i64::MAX as u64, now));
        assert!(results_stale(None, u64::MAX, now));
    }

    #[test]
    fn test_freshness_label() {
        let now = Utc::now();
        assert_eq!(freshness_label(None, 5000, now), "Waiting for first results");
        assert_eq!(
            freshness_label(Some(now - Duration::seconds(3)), 5000, now),
            "Updated just now"
        );
        assert_eq!(
            freshness_label(Some(now - Duration::seconds(12)), 5000, now),
            "Updated just now (stale)"
        );
        assert_eq!(
            freshness_label(Some(now - Duration::minutes(1)), 120_000, now),
            "Updated 1 minute ago"
        );
        assert_eq!(
            freshness_label(Some(now - Duration::hours(3)), 5000, now),
            "Updated 3 hours ago (stale)"
        );
    }

    #[test]
    fn test_freshness_label_old_results_show_date() {
        let now = DateTime::parse_from_rfc3339("2024-03-10T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let last = now - Duration::days(2);
        assert_eq!(
            freshness_label(Some(last), 5000, now),
            "Updated on Mar 08 at 12:00 UTC (stale)"
        );
    }

    #[test]
    fn test_clock_skew_clamps_to_zero() {
        let now = Utc::now();
        let future = now + Duration::seconds(30);
        assert_eq!(results_age(Some(future), now), Some(Duration::zero()));
        assert!(!results_stale(Some(future), 5000, now));
    }
}
