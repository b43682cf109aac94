//! Pure projections over the aggregate.
//!
//! Derived metric fields are recomputed from source fields after every
//! mutating operation and again on read, never on a lazy schedule, so they
//! cannot drift from the entries they summarize.

use chrono::{DateTime, Utc};

use crate::engine::aggregate::ProgressAggregate;

/// Integer percentage `numer/denom*100`, rounded, clamped to [0, 100].
/// A zero denominator yields 0, never a division error.
pub(crate) fn percent(numer: u32, denom: u32) -> u32 {
    if denom == 0 {
        return 0;
    }
    let pct = (f64::from(numer) / f64::from(denom) * 100.0).round() as u32;
    pct.min(100)
}

/// Rounded mean of the given scores; 0 when the slice is empty.
pub(crate) fn mean_rounded(scores: &[u32]) -> u32 {
    if scores.is_empty() {
        return 0;
    }
    let sum: u64 = scores.iter().map(|&s| u64::from(s)).sum();
    (sum as f64 / scores.len() as f64).round() as u32
}

pub fn recompute(aggregate: &mut ProgressAggregate, now: DateTime<Utc>) {
    // Lessons without a defined score are excluded, not treated as zero.
    let scores: Vec<u32> = aggregate.lessons.iter().filter_map(|l| l.score).collect();
    aggregate.metrics.average_score = mean_rounded(&scores);

    aggregate.metrics.completion_rate = percent(
        aggregate.metrics.total_lessons_completed,
        aggregate.metrics.total_lessons_started,
    );

    let lesson_minutes: u32 = aggregate.lessons.iter().map(|l| l.time_spent).sum();
    let quiz_minutes: u32 = aggregate.quizzes.iter().map(|q| q.time_spent).sum();
    aggregate.metrics.total_study_time = lesson_minutes + quiz_minutes;

    let account_days = (now.date_naive() - aggregate.created_at.date_naive())
        .num_days()
        .max(1) as u32;
    aggregate.metrics.average_daily_study_time = aggregate.metrics.total_study_time / account_days;
}
