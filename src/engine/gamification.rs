//! XP, level and badge progression.
//!
//! Awards are a pure function of recorded completion events and the resulting
//! aggregate state: replaying the same event sequence always reproduces the
//! same xp, level, badges and achievements.

use crate::engine::aggregate::{LessonStatus, ProgressAggregate};

pub const XP_LESSON_COMPLETED: u64 = 50;
pub const XP_LESSON_MASTERED_BONUS: u64 = 25;
pub const XP_QUIZ_SUBMITTED: u64 = 20;
pub const XP_COURSE_COMPLETED: u64 = 200;

/// Cumulative xp required to hold each level; index 0 is level 1.
const LEVEL_THRESHOLDS: &[u64] = &[
    0, 100, 250, 500, 1_000, 2_000, 3_500, 5_500, 8_000, 11_000,
];

pub fn level_from_xp(xp: u64) -> u32 {
    LEVEL_THRESHOLDS.iter().take_while(|&&t| t <= xp).count() as u32
}

fn award_xp(aggregate: &mut ProgressAggregate, amount: u64) {
    aggregate.xp += amount;
    aggregate.level = level_from_xp(aggregate.xp);
}

/// Appends `id` unless already present.
fn grant(ledger: &mut Vec<String>, id: &str) {
    if !ledger.iter().any(|existing| existing == id) {
        ledger.push(id.to_string());
    }
}

/// Re-derives threshold badges from current aggregate state.
fn refresh_badges(aggregate: &mut ProgressAggregate) {
    let lessons_completed = aggregate.metrics.total_lessons_completed;
    let courses_completed = aggregate.metrics.total_courses_completed;
    let current_streak = aggregate.metrics.current_streak;
    let mastered = aggregate
        .lessons
        .iter()
        .filter(|l| l.status == LessonStatus::Mastered)
        .count();

    if lessons_completed >= 1 {
        grant(&mut aggregate.badges, "first-lesson");
    }
    if lessons_completed >= 10 {
        grant(&mut aggregate.badges, "ten-lessons");
    }
    if courses_completed >= 1 {
        grant(&mut aggregate.badges, "first-course");
    }
    if current_streak >= 7 {
        grant(&mut aggregate.badges, "week-streak");
    }
    if current_streak >= 30 {
        grant(&mut aggregate.badges, "month-streak");
    }
    if mastered >= 5 {
        grant(&mut aggregate.achievements, "five-masteries");
    }
}

/// Applied once per lesson that newly reaches completed/mastered.
pub fn on_lesson_completed(aggregate: &mut ProgressAggregate, mastered: bool, score: Option<u32>) {
    let bonus = if mastered { XP_LESSON_MASTERED_BONUS } else { 0 };
    award_xp(aggregate, XP_LESSON_COMPLETED + bonus);
    if score == Some(100) {
        grant(&mut aggregate.achievements, "perfect-score");
    }
    refresh_badges(aggregate);
}

pub fn on_quiz_submitted(aggregate: &mut ProgressAggregate, score: u32) {
    award_xp(aggregate, XP_QUIZ_SUBMITTED);
    if score == 100 {
        grant(&mut aggregate.achievements, "perfect-score");
    }
    refresh_badges(aggregate);
}

/// Applied once per course that newly reaches 100%.
pub fn on_course_completed(aggregate: &mut ProgressAggregate) {
    award_xp(aggregate, XP_COURSE_COMPLETED);
    refresh_badges(aggregate);
}

/// Re-checks threshold badges without awarding xp, for events that change
/// state (e.g. a streak extension on a repeated completion) but award nothing.
pub fn refresh(aggregate: &mut ProgressAggregate) {
    refresh_badges(aggregate);
}
