//! Course-level rollup of lesson completions.
//!
//! Course-to-lesson membership lives in the catalog and is passed in by the
//! caller; nothing here ever queries catalog structure.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::engine::aggregate::{CourseProgress, CourseStatus, ProgressAggregate};
use crate::engine::error::{ProgressError, ProgressResult, ResourceKind};
use crate::engine::metrics::{mean_rounded, percent};

/// Idempotent: the enrollment counter moves only on the first call per course.
pub fn enroll(
    aggregate: &mut ProgressAggregate,
    course_id: Uuid,
    total_lessons: u32,
    now: DateTime<Utc>,
) {
    if aggregate.course(course_id).is_some() {
        return;
    }
    aggregate
        .courses
        .push(CourseProgress::enrolled(course_id, total_lessons, now));
    aggregate.metrics.total_courses_enrolled += 1;
}

/// Recomputes the rollup from the lesson entries belonging to `lesson_ids`.
///
/// Returns true when the course newly reached 100%; a later recompute at 100%
/// does not re-trigger. The stored `total_lessons` from enrollment stays the
/// denominator; `lesson_ids` only selects which entries count.
pub fn recompute(
    aggregate: &mut ProgressAggregate,
    course_id: Uuid,
    lesson_ids: &[Uuid],
    now: DateTime<Utc>,
) -> ProgressResult<bool> {
    let members: HashSet<Uuid> = lesson_ids.iter().copied().collect();

    let mut lessons_completed = 0u32;
    let mut total_time_spent = 0u32;
    let mut scores = Vec::new();
    for lesson in aggregate.lessons.iter().filter(|l| members.contains(&l.lesson_id)) {
        if lesson.status.is_completed() {
            lessons_completed += 1;
        }
        total_time_spent += lesson.time_spent;
        if let Some(score) = lesson.score {
            scores.push(score);
        }
    }

    let course = aggregate
        .course_mut(course_id)
        .ok_or_else(|| ProgressError::not_found(ResourceKind::Course, course_id))?;

    course.lessons_completed = lessons_completed;
    course.overall_progress = percent(lessons_completed, course.total_lessons);
    course.average_score = mean_rounded(&scores);
    course.total_time_spent = total_time_spent;

    let newly_completed = course.status != CourseStatus::Completed
        && course.total_lessons > 0
        && course.overall_progress >= 100;

    if newly_completed {
        course.status = CourseStatus::Completed;
        course.completed_at = Some(now);
        aggregate.metrics.total_courses_completed += 1;
    } else if course.status == CourseStatus::Enrolled && lessons_completed > 0 {
        course.status = CourseStatus::InProgress;
    }

    Ok(newly_completed)
}
