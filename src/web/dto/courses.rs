use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct EnrollCourseRequest {
    /// Lesson count from the catalog at enrollment time.
    pub total_lessons: u32,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RecomputeCourseRequest {
    /// The course's lesson ids, resolved by the caller against the catalog.
    pub lesson_ids: Vec<Uuid>,
}
