//! The progress-tracking and gamification engine.
//!
//! Every operation is a command applied under a per-user boundary: take the
//! user's lock, load the aggregate, validate, mutate, recompute derived
//! fields, persist. Mutations for one user are serialized in-process; the
//! store's optimistic versioning catches writers in other processes.

mod aggregate;
pub use aggregate::{
    CompletionType, CourseProgress, CourseStatus, LearningGoals, LessonProgress, LessonStatus,
    OverallMetrics, ProgressAggregate, QuizProgress,
};

mod error;
pub use error::{ProgressError, ProgressResult, ResourceKind};

mod course;
mod gamification;
mod lesson;
pub use lesson::{CompleteLesson, LessonCompletion, LessonPatch, MASTERY_THRESHOLD};
mod metrics;
mod quiz;
pub use quiz::SubmitQuiz;
mod streak;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::model::{ProgressStore, Versioned};

pub struct ProgressEngine {
    store: Arc<dyn ProgressStore>,
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl ProgressEngine {
    pub fn new(store: Arc<dyn ProgressStore>) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn user_lock(&self, user_id: Uuid) -> Arc<Mutex<()>> {
        self.locks
            .lock()
            .await
            .entry(user_id)
            .or_default()
            .clone()
    }

    async fn load_or_create(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> ProgressResult<Versioned> {
        match self.store.load(user_id).await? {
            Some(versioned) => Ok(versioned),
            None => {
                tracing::debug!(%user_id, "creating progress aggregate on first event");
                Ok(Versioned::unsaved(ProgressAggregate::new(user_id, now)))
            }
        }
    }

    async fn load_required(&self, user_id: Uuid) -> ProgressResult<Versioned> {
        self.store
            .load(user_id)
            .await?
            .ok_or_else(|| ProgressError::not_found(ResourceKind::Progress, user_id))
    }

    /// Idempotent: repeat calls refresh `last_accessed_at` only.
    pub async fn start_lesson(
        &self,
        user_id: Uuid,
        lesson_id: Uuid,
    ) -> ProgressResult<ProgressAggregate> {
        let now = Utc::now();
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;

        let Versioned { mut aggregate, version } = self.load_or_create(user_id, now).await?;
        lesson::start(&mut aggregate, lesson_id, now);
        metrics::recompute(&mut aggregate, now);
        self.store.save(&aggregate, version).await?;
        Ok(aggregate)
    }

    /// Idempotent against double completion: the completion counter and xp
    /// move only the first time a lesson reaches completed/mastered.
    pub async fn complete_lesson(
        &self,
        user_id: Uuid,
        lesson_id: Uuid,
        cmd: CompleteLesson,
    ) -> ProgressResult<ProgressAggregate> {
        let now = Utc::now();
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;

        let Versioned { mut aggregate, version } = self.load_required(user_id).await?;
        let outcome = lesson::complete(&mut aggregate, lesson_id, cmd, now)?;
        streak::touch(&mut aggregate.metrics, now);
        metrics::recompute(&mut aggregate, now);
        if outcome.newly_completed {
            gamification::on_lesson_completed(&mut aggregate, outcome.mastered, outcome.score);
        } else {
            gamification::refresh(&mut aggregate);
        }
        self.store.save(&aggregate, version).await?;
        Ok(aggregate)
    }

    /// Partial update; delta fields are not retry-safe (see [`LessonPatch`]).
    pub async fn update_lesson(
        &self,
        user_id: Uuid,
        lesson_id: Uuid,
        patch: LessonPatch,
    ) -> ProgressResult<ProgressAggregate> {
        let now = Utc::now();
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;

        let Versioned { mut aggregate, version } = self.load_required(user_id).await?;
        lesson::update(&mut aggregate, lesson_id, patch, now)?;
        metrics::recompute(&mut aggregate, now);
        self.store.save(&aggregate, version).await?;
        Ok(aggregate)
    }

    pub async fn reset_lesson(
        &self,
        user_id: Uuid,
        lesson_id: Uuid,
    ) -> ProgressResult<ProgressAggregate> {
        let now = Utc::now();
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;

        let Versioned { mut aggregate, version } = self.load_required(user_id).await?;
        lesson::reset(&mut aggregate, lesson_id, now)?;
        metrics::recompute(&mut aggregate, now);
        self.store.save(&aggregate, version).await?;
        Ok(aggregate)
    }

    pub async fn enroll_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        total_lessons: u32,
    ) -> ProgressResult<ProgressAggregate> {
        let now = Utc::now();
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;

        let Versioned { mut aggregate, version } = self.load_or_create(user_id, now).await?;
        course::enroll(&mut aggregate, course_id, total_lessons, now);
        metrics::recompute(&mut aggregate, now);
        self.store.save(&aggregate, version).await?;
        Ok(aggregate)
    }

    /// Rolls lesson completions up into the course entry. `lesson_ids` is the
    /// course's membership set, resolved by the caller against the catalog.
    pub async fn recompute_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        lesson_ids: &[Uuid],
    ) -> ProgressResult<ProgressAggregate> {
        let now = Utc::now();
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;

        let Versioned { mut aggregate, version } = self.load_required(user_id).await?;
        let newly_completed = course::recompute(&mut aggregate, course_id, lesson_ids, now)?;
        metrics::recompute(&mut aggregate, now);
        if newly_completed {
            tracing::info!(%user_id, %course_id, "course completed");
            gamification::on_course_completed(&mut aggregate);
        }
        self.store.save(&aggregate, version).await?;
        Ok(aggregate)
    }

    pub async fn submit_quiz(
        &self,
        user_id: Uuid,
        quiz_id: Uuid,
        cmd: SubmitQuiz,
    ) -> ProgressResult<ProgressAggregate> {
        let now = Utc::now();
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;

        let Versioned { mut aggregate, version } = self.load_or_create(user_id, now).await?;
        let score = quiz::submit(&mut aggregate, quiz_id, cmd, now)?;
        streak::touch(&mut aggregate.metrics, now);
        metrics::recompute(&mut aggregate, now);
        gamification::on_quiz_submitted(&mut aggregate, score);
        self.store.save(&aggregate, version).await?;
        Ok(aggregate)
    }

    pub async fn set_goals(
        &self,
        user_id: Uuid,
        goals: LearningGoals,
    ) -> ProgressResult<ProgressAggregate> {
        let now = Utc::now();
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;

        let Versioned { mut aggregate, version } = self.load_or_create(user_id, now).await?;
        aggregate.goals = goals;
        self.store.save(&aggregate, version).await?;
        Ok(aggregate)
    }

    /// Read path. Derived fields are recomputed on read as well, so a stale
    /// persisted projection can never be observed.
    pub async fn progress(&self, user_id: Uuid) -> ProgressResult<ProgressAggregate> {
        let Versioned { mut aggregate, .. } = self.load_required(user_id).await?;
        metrics::recompute(&mut aggregate, Utc::now());
        Ok(aggregate)
    }
}
