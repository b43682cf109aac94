//! Per-lesson state machine and counters.
//!
//! Status only moves forward (`not_started → in_progress → completed →
//! mastered`); the sole way back is the explicit [`reset`] operation. The
//! aggregate-level counters are incremented at most once per distinct lesson
//! id, which makes `start` and `complete` safe for caller-side retry.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::engine::aggregate::{CompletionType, LessonProgress, LessonStatus, ProgressAggregate};
use crate::engine::error::{validate_minutes, validate_score, ProgressError, ProgressResult, ResourceKind};

/// Score at or above which a completion counts as mastery.
pub const MASTERY_THRESHOLD: u32 = 80;

#[derive(Debug, Clone, Default)]
pub struct CompleteLesson {
    pub score: Option<i64>,
    pub time_spent: i64,
    pub completion_type: Option<CompletionType>,
}

/// Partial update. The delta fields (`time_spent`, `attempts`, `hints_used`)
/// are added to the stored values, so a blind retry of the same patch
/// double-counts them; callers own idempotency here.
#[derive(Debug, Clone, Default)]
pub struct LessonPatch {
    pub score: Option<i64>,
    pub time_spent: Option<i64>,
    pub attempts: Option<u32>,
    pub hints_used: Option<u32>,
    pub bookmarked: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct LessonCompletion {
    /// False on a repeated completion of an already-completed lesson.
    pub newly_completed: bool,
    pub mastered: bool,
    pub score: Option<u32>,
}

/// Creates the entry on first call; later calls only resume.
pub fn start(aggregate: &mut ProgressAggregate, lesson_id: Uuid, now: DateTime<Utc>) {
    match aggregate.lesson_mut(lesson_id) {
        Some(lesson) => {
            // A completed lesson stays completed; only a fresh or reset entry
            // moves to in_progress.
            if lesson.status == LessonStatus::NotStarted {
                lesson.status = LessonStatus::InProgress;
            }
            lesson.last_accessed_at = now;
        }
        None => {
            aggregate.lessons.push(LessonProgress::started(lesson_id, now));
            aggregate.metrics.total_lessons_started += 1;
        }
    }
}

pub fn complete(
    aggregate: &mut ProgressAggregate,
    lesson_id: Uuid,
    cmd: CompleteLesson,
    now: DateTime<Utc>,
) -> ProgressResult<LessonCompletion> {
    let score = cmd.score.map(validate_score).transpose()?;
    let minutes = validate_minutes(cmd.time_spent)?;

    let lesson = aggregate
        .lesson_mut(lesson_id)
        .ok_or_else(|| ProgressError::not_found(ResourceKind::Lesson, lesson_id))?;

    let was_completed = lesson.status.is_completed();
    let mastered = score.is_some_and(|s| s >= MASTERY_THRESHOLD);
    let reached = if mastered {
        LessonStatus::Mastered
    } else {
        LessonStatus::Completed
    };

    lesson.status = lesson.status.max(reached);
    lesson.completed_at = Some(now);
    lesson.last_accessed_at = now;
    lesson.time_spent += minutes;
    // Best score wins, keeping "mastered requires score >= 80" true across
    // repeated completions with a weaker result.
    lesson.score = match (lesson.score, score) {
        (Some(old), Some(new)) => Some(old.max(new)),
        (old, new) => new.or(old),
    };
    lesson.completion_type = Some(cmd.completion_type.unwrap_or(CompletionType::Manual));
    let stored_score = lesson.score;

    if !was_completed {
        aggregate.metrics.total_lessons_completed += 1;
    }

    Ok(LessonCompletion {
        newly_completed: !was_completed,
        mastered,
        score: stored_score,
    })
}

/// Applies a partial update and refreshes `last_accessed_at`. Aggregate
/// counters are never touched here; only `start`/`complete` move those.
pub fn update(
    aggregate: &mut ProgressAggregate,
    lesson_id: Uuid,
    patch: LessonPatch,
    now: DateTime<Utc>,
) -> ProgressResult<()> {
    let score = patch.score.map(validate_score).transpose()?;
    let minutes = patch.time_spent.map(validate_minutes).transpose()?;

    let lesson = aggregate
        .lesson_mut(lesson_id)
        .ok_or_else(|| ProgressError::not_found(ResourceKind::Lesson, lesson_id))?;

    if let Some(minutes) = minutes {
        lesson.time_spent += minutes;
    }
    if let Some(score) = score {
        lesson.score = Some(score);
    }
    if let Some(attempts) = patch.attempts {
        lesson.attempts += attempts;
    }
    if let Some(hints) = patch.hints_used {
        lesson.hints_used += hints;
    }
    if let Some(bookmarked) = patch.bookmarked {
        lesson.bookmarked = bookmarked;
    }
    if let Some(notes) = patch.notes {
        lesson.notes = Some(notes);
    }
    lesson.last_accessed_at = now;

    Ok(())
}

/// The explicit way back in the state machine. Completion counters are not
/// decremented: totals are monotone over the account lifetime.
pub fn reset(
    aggregate: &mut ProgressAggregate,
    lesson_id: Uuid,
    now: DateTime<Utc>,
) -> ProgressResult<()> {
    let lesson = aggregate
        .lesson_mut(lesson_id)
        .ok_or_else(|| ProgressError::not_found(ResourceKind::Lesson, lesson_id))?;

    lesson.status = LessonStatus::NotStarted;
    lesson.completed_at = None;
    lesson.completion_type = None;
    lesson.score = None;
    lesson.last_accessed_at = now;

    Ok(())
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;

    use super::*;

    fn at(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, d, 10, 0, 0).unwrap()
    }

    fn fresh() -> ProgressAggregate {
        ProgressAggregate::new(Uuid::new_v4(), at(1))
    }

    fn completion(score: Option<i64>, minutes: i64) -> CompleteLesson {
        CompleteLesson {
            score,
            time_spent: minutes,
            completion_type: Some(CompletionType::ScoreBased),
        }
    }

    #[test]
    fn start_counts_each_lesson_once() {
        let mut aggregate = fresh();
        let lesson_id = Uuid::new_v4();
        start(&mut aggregate, lesson_id, at(1));
        start(&mut aggregate, lesson_id, at(2));
        assert_eq!(aggregate.metrics.total_lessons_started, 1);
        assert_eq!(aggregate.lessons.len(), 1);
        assert_eq!(aggregate.lessons[0].last_accessed_at, at(2));
    }

    #[test]
    fn mastery_threshold_is_eighty() {
        let mut aggregate = fresh();
        let just_mastered = Uuid::new_v4();
        let just_completed = Uuid::new_v4();
        start(&mut aggregate, just_mastered, at(1));
        start(&mut aggregate, just_completed, at(1));

        complete(&mut aggregate, just_mastered, completion(Some(80), 5), at(1)).unwrap();
        complete(&mut aggregate, just_completed, completion(Some(79), 5), at(1)).unwrap();

        assert_eq!(aggregate.lesson(just_mastered).unwrap().status, LessonStatus::Mastered);
        assert_eq!(aggregate.lesson(just_completed).unwrap().status, LessonStatus::Completed);
    }

    #[test]
    fn double_completion_increments_counter_once() {
        let mut aggregate = fresh();
        let lesson_id = Uuid::new_v4();
        start(&mut aggregate, lesson_id, at(1));

        let first = complete(&mut aggregate, lesson_id, completion(Some(85), 10), at(1)).unwrap();
        let second = complete(&mut aggregate, lesson_id, completion(Some(85), 10), at(1)).unwrap();

        assert!(first.newly_completed);
        assert!(!second.newly_completed);
        assert_eq!(aggregate.metrics.total_lessons_completed, 1);
        // Time still accumulates on the repeat.
        assert_eq!(aggregate.lesson(lesson_id).unwrap().time_spent, 20);
    }

    #[test]
    fn weaker_recompletion_does_not_downgrade() {
        let mut aggregate = fresh();
        let lesson_id = Uuid::new_v4();
        start(&mut aggregate, lesson_id, at(1));
        complete(&mut aggregate, lesson_id, completion(Some(95), 5), at(1)).unwrap();
        complete(&mut aggregate, lesson_id, completion(Some(40), 5), at(2)).unwrap();

        let lesson = aggregate.lesson(lesson_id).unwrap();
        assert_eq!(lesson.status, LessonStatus::Mastered);
        assert_eq!(lesson.score, Some(95));
    }

    #[test]
    fn restarting_a_completed_lesson_keeps_its_status() {
        let mut aggregate = fresh();
        let lesson_id = Uuid::new_v4();
        start(&mut aggregate, lesson_id, at(1));
        complete(&mut aggregate, lesson_id, completion(Some(90), 5), at(1)).unwrap();
        start(&mut aggregate, lesson_id, at(2));
        assert_eq!(aggregate.lesson(lesson_id).unwrap().status, LessonStatus::Mastered);
    }

    #[test]
    fn complete_requires_an_existing_entry() {
        let mut aggregate = fresh();
        let missing = Uuid::new_v4();
        let err = complete(&mut aggregate, missing, completion(None, 5), at(1)).unwrap_err();
        assert!(matches!(
            err,
            ProgressError::NotFound { kind: ResourceKind::Lesson, .. }
        ));
    }

    #[test]
    fn invalid_score_rejected_before_any_mutation() {
        let mut aggregate = fresh();
        let lesson_id = Uuid::new_v4();
        start(&mut aggregate, lesson_id, at(1));

        let err = complete(&mut aggregate, lesson_id, completion(Some(150), 5), at(1)).unwrap_err();
        assert!(matches!(err, ProgressError::InvalidScore(150)));

        let lesson = aggregate.lesson(lesson_id).unwrap();
        assert_eq!(lesson.status, LessonStatus::InProgress);
        assert_eq!(lesson.time_spent, 0);
        assert_eq!(aggregate.metrics.total_lessons_completed, 0);
    }

    #[test]
    fn update_never_moves_counters_or_status() {
        let mut aggregate = fresh();
        let lesson_id = Uuid::new_v4();
        start(&mut aggregate, lesson_id, at(1));

        let patch = LessonPatch {
            time_spent: Some(15),
            attempts: Some(1),
            hints_used: Some(2),
            bookmarked: Some(true),
            notes: Some("revisit recursion".into()),
            ..Default::default()
        };
        update(&mut aggregate, lesson_id, patch, at(2)).unwrap();

        let lesson = aggregate.lesson(lesson_id).unwrap();
        assert_eq!(lesson.status, LessonStatus::InProgress);
        assert_eq!(lesson.time_spent, 15);
        assert_eq!(lesson.attempts, 1);
        assert_eq!(lesson.hints_used, 2);
        assert!(lesson.bookmarked);
        assert_eq!(lesson.last_accessed_at, at(2));
        assert_eq!(aggregate.metrics.total_lessons_completed, 0);
    }

    #[test]
    fn reset_reopens_the_state_machine_without_touching_totals() {
        let mut aggregate = fresh();
        let lesson_id = Uuid::new_v4();
        start(&mut aggregate, lesson_id, at(1));
        complete(&mut aggregate, lesson_id, completion(Some(85), 10), at(1)).unwrap();

        reset(&mut aggregate, lesson_id, at(3)).unwrap();
        let lesson = aggregate.lesson(lesson_id).unwrap();
        assert_eq!(lesson.status, LessonStatus::NotStarted);
        assert_eq!(lesson.score, None);
        assert_eq!(lesson.completed_at, None);
        assert_eq!(lesson.time_spent, 10);
        assert_eq!(aggregate.metrics.total_lessons_completed, 1);

        start(&mut aggregate, lesson_id, at(4));
        assert_eq!(aggregate.lesson(lesson_id).unwrap().status, LessonStatus::InProgress);
        assert_eq!(aggregate.metrics.total_lessons_started, 1);
    }
}
