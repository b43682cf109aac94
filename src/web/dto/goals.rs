use serde::Deserialize;
use uuid::Uuid;

use crate::engine::LearningGoals;

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateGoalsRequest {
    pub daily_study_minutes: Option<u32>,
    pub weekly_lessons: Option<u32>,
    pub target_course_id: Option<Uuid>,
}

impl From<UpdateGoalsRequest> for LearningGoals {
    fn from(req: UpdateGoalsRequest) -> Self {
        Self {
            daily_study_minutes: req.daily_study_minutes,
            weekly_lessons: req.weekly_lessons,
            target_course_id: req.target_course_id,
        }
    }
}
