//! Day-based study streak arithmetic.
//!
//! Day boundaries are UTC-normalized: a study event belongs to the UTC
//! calendar date of its timestamp. The diff is computed on `NaiveDate`, never
//! on raw timestamps, so DST shifts and sub-day offsets cannot skew it.

use chrono::{DateTime, Utc};

use crate::engine::aggregate::OverallMetrics;

/// Records a study event at `now` against the streak state.
///
/// A gap of exactly one calendar day extends the streak, a larger gap resets
/// it to 1, a same-day repeat changes nothing. A backdated event (negative
/// gap) leaves the streak state untouched entirely.
pub fn touch(metrics: &mut OverallMetrics, now: DateTime<Utc>) {
    let today = now.date_naive();

    match metrics.last_study_date {
        None => {
            metrics.current_streak = 1;
            metrics.last_study_date = Some(today);
        }
        Some(last) => {
            let diff_days = (today - last).num_days();
            if diff_days < 0 {
                // Out-of-order event, e.g. an offline client syncing late.
                return;
            }
            if diff_days == 1 {
                metrics.current_streak += 1;
            } else if diff_days > 1 {
                metrics.current_streak = 1;
            }
            metrics.last_study_date = Some(today);
        }
    }

    metrics.longest_streak = metrics.longest_streak.max(metrics.current_streak);
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;

    use super::*;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn first_event_starts_streak_at_one() {
        let mut metrics = OverallMetrics::default();
        touch(&mut metrics, at(2025, 3, 1));
        assert_eq!(metrics.current_streak, 1);
        assert_eq!(metrics.longest_streak, 1);
        assert_eq!(metrics.last_study_date, Some(at(2025, 3, 1).date_naive()));
    }

    #[test]
    fn consecutive_days_extend_streak() {
        let mut metrics = OverallMetrics::default();
        touch(&mut metrics, at(2025, 3, 1));
        touch(&mut metrics, at(2025, 3, 2));
        assert_eq!(metrics.current_streak, 2);
        assert_eq!(metrics.longest_streak, 2);
    }

    #[test]
    fn gap_resets_streak_to_one() {
        let mut metrics = OverallMetrics::default();
        touch(&mut metrics, at(2025, 3, 1));
        touch(&mut metrics, at(2025, 3, 4));
        assert_eq!(metrics.current_streak, 1);
        assert_eq!(metrics.longest_streak, 1);
    }

    #[test]
    fn same_day_repeat_is_a_no_op() {
        let mut metrics = OverallMetrics::default();
        touch(&mut metrics, at(2025, 3, 1));
        touch(&mut metrics, at(2025, 3, 1));
        assert_eq!(metrics.current_streak, 1);
    }

    #[test]
    fn sub_day_interval_crossing_midnight_counts_as_one_day() {
        let mut metrics = OverallMetrics::default();
        touch(&mut metrics, Utc.with_ymd_and_hms(2025, 3, 1, 23, 50, 0).unwrap());
        touch(&mut metrics, Utc.with_ymd_and_hms(2025, 3, 2, 0, 10, 0).unwrap());
        assert_eq!(metrics.current_streak, 2);
    }

    #[test]
    fn backdated_event_leaves_streak_untouched() {
        let mut metrics = OverallMetrics::default();
        touch(&mut metrics, at(2025, 3, 1));
        touch(&mut metrics, at(2025, 3, 2));
        touch(&mut metrics, at(2025, 2, 20));
        assert_eq!(metrics.current_streak, 2);
        assert_eq!(metrics.last_study_date, Some(at(2025, 3, 2).date_naive()));
    }

    #[test]
    fn longest_streak_survives_resets() {
        let mut metrics = OverallMetrics::default();
        touch(&mut metrics, at(2025, 3, 1));
        touch(&mut metrics, at(2025, 3, 2));
        touch(&mut metrics, at(2025, 3, 3));
        touch(&mut metrics, at(2025, 3, 10));
        assert_eq!(metrics.current_streak, 1);
        assert_eq!(metrics.longest_streak, 3);
    }
}
