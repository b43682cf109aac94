use serde::Deserialize;

use crate::engine::{CompleteLesson, CompletionType, LessonPatch};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CompleteLessonRequest {
    /// 0-100; omit for unscored completions.
    pub score: Option<i64>,
    /// Minutes spent in this sitting, added to the lesson total.
    pub time_spent: i64,
    pub completion_type: Option<CompletionType>,
}

impl From<CompleteLessonRequest> for CompleteLesson {
    fn from(req: CompleteLessonRequest) -> Self {
        Self {
            score: req.score,
            time_spent: req.time_spent,
            completion_type: req.completion_type,
        }
    }
}

/// Every field is optional; delta fields double-count on blind retries.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateLessonRequest {
    pub score: Option<i64>,
    pub time_spent: Option<i64>,
    pub attempts: Option<u32>,
    pub hints_used: Option<u32>,
    pub bookmarked: Option<bool>,
    pub notes: Option<String>,
}

impl From<UpdateLessonRequest> for LessonPatch {
    fn from(req: UpdateLessonRequest) -> Self {
        Self {
            score: req.score,
            time_spent: req.time_spent,
            attempts: req.attempts,
            hints_used: req.hints_used,
            bookmarked: req.bookmarked,
            notes: req.notes,
        }
    }
}
