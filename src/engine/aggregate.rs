//! The per-user progress document and its sub-records.
//!
//! One `ProgressAggregate` exists per user, created lazily on the first
//! learning event. Entries are never hard-deleted, only superseded.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum LessonStatus {
    NotStarted,
    InProgress,
    Completed,
    Mastered,
}

impl LessonStatus {
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed | Self::Mastered)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CompletionType {
    TimeBased,
    ScoreBased,
    Manual,
    Automatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
    Enrolled,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LessonProgress {
    /// Weak reference into the lesson catalog, never owned here.
    pub lesson_id: Uuid,
    pub status: LessonStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub last_accessed_at: DateTime<Utc>,
    /// Cumulative minutes, monotonic non-decreasing.
    pub time_spent: u32,
    /// 0-100. Absent until the first scored completion or patch.
    pub score: Option<u32>,
    pub attempts: u32,
    pub hints_used: u32,
    pub bookmarked: bool,
    pub notes: Option<String>,
    pub completion_type: Option<CompletionType>,
}

impl LessonProgress {
    pub fn started(lesson_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            lesson_id,
            status: LessonStatus::InProgress,
            started_at: now,
            completed_at: None,
            last_accessed_at: now,
            time_spent: 0,
            score: None,
            attempts: 0,
            hints_used: 0,
            bookmarked: false,
            notes: None,
            completion_type: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CourseProgress {
    /// Weak reference into the course catalog.
    pub course_id: Uuid,
    pub status: CourseStatus,
    pub enrolled_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub total_lessons: u32,
    pub lessons_completed: u32,
    /// Derived percentage, 0-100.
    pub overall_progress: u32,
    pub average_score: u32,
    pub total_time_spent: u32,
}

impl CourseProgress {
    pub fn enrolled(course_id: Uuid, total_lessons: u32, now: DateTime<Utc>) -> Self {
        Self {
            course_id,
            status: CourseStatus::Enrolled,
            enrolled_at: now,
            completed_at: None,
            total_lessons,
            lessons_completed: 0,
            overall_progress: 0,
            average_score: 0,
            total_time_spent: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct QuizProgress {
    pub quiz_id: Uuid,
    /// Latest submitted score; earlier scores are superseded.
    pub score: u32,
    pub completed_at: DateTime<Utc>,
    pub time_spent: u32,
    pub attempts: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OverallMetrics {
    pub total_lessons_started: u32,
    pub total_lessons_completed: u32,
    pub total_courses_enrolled: u32,
    pub total_courses_completed: u32,
    /// Minutes, derived from lesson and quiz entries on every recompute.
    pub total_study_time: u32,
    pub average_score: u32,
    pub completion_rate: u32,
    pub average_daily_study_time: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// UTC calendar date of the last study event.
    pub last_study_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LearningGoals {
    pub daily_study_minutes: Option<u32>,
    pub weekly_lessons: Option<u32>,
    pub target_course_id: Option<Uuid>,
}

/// Root per-user container for all learning-progress and gamification state.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProgressAggregate {
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub lessons: Vec<LessonProgress>,
    pub courses: Vec<CourseProgress>,
    pub quizzes: Vec<QuizProgress>,
    pub metrics: OverallMetrics,
    pub goals: LearningGoals,
    pub xp: u64,
    pub level: u32,
    pub badges: Vec<String>,
    pub achievements: Vec<String>,
}

impl ProgressAggregate {
    pub fn new(user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            created_at: now,
            lessons: Vec::new(),
            courses: Vec::new(),
            quizzes: Vec::new(),
            metrics: OverallMetrics::default(),
            goals: LearningGoals::default(),
            xp: 0,
            level: 1,
            badges: Vec::new(),
            achievements: Vec::new(),
        }
    }

    pub fn lesson(&self, lesson_id: Uuid) -> Option<&LessonProgress> {
        self.lessons.iter().find(|l| l.lesson_id == lesson_id)
    }

    pub fn lesson_mut(&mut self, lesson_id: Uuid) -> Option<&mut LessonProgress> {
        self.lessons.iter_mut().find(|l| l.lesson_id == lesson_id)
    }

    pub fn course(&self, course_id: Uuid) -> Option<&CourseProgress> {
        self.courses.iter().find(|c| c.course_id == course_id)
    }

    pub fn course_mut(&mut self, course_id: Uuid) -> Option<&mut CourseProgress> {
        self.courses.iter_mut().find(|c| c.course_id == course_id)
    }

    pub fn quiz_mut(&mut self, quiz_id: Uuid) -> Option<&mut QuizProgress> {
        self.quizzes.iter_mut().find(|q| q.quiz_id == quiz_id)
    }
}
