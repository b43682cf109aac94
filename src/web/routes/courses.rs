use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router, extract::State, middleware, response::IntoResponse};
use uuid::Uuid;

use crate::engine::ProgressAggregate;
use crate::web::dto::courses::{EnrollCourseRequest, RecomputeCourseRequest};
use crate::web::error::ErrorResponse;
use crate::web::{AppState, RequestContext, WebResult, middlewares};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/{id}/enroll", post(courses_enroll_handler))
        .route("/{id}/recompute", post(courses_recompute_handler))
        .layer(middleware::from_fn(middlewares::extract_context_fn))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/courses/{course_id}/enroll",
    description = "Enroll in a course. Repeat enrollments are no-ops.",
    params(
        ("course_id" = Uuid, Path, description = "ID of the course to enroll in")
    ),
    request_body = EnrollCourseRequest,
    responses(
        (status = 200, description = "Enrolled", body = ProgressAggregate),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 503, description = "Progress store unavailable", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "courses"
)]
pub(crate) async fn courses_enroll_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<EnrollCourseRequest>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let aggregate = state
        .engine()
        .enroll_course(user.user_id(), id, body.total_lessons)
        .await?;
    Ok((StatusCode::OK, Json(aggregate)))
}

#[utoipa::path(
    post,
    path = "/api/v1/courses/{course_id}/recompute",
    description = "Recompute course progress from the given catalog lesson set",
    params(
        ("course_id" = Uuid, Path, description = "ID of the course to recompute")
    ),
    request_body = RecomputeCourseRequest,
    responses(
        (status = 200, description = "Course progress recomputed", body = ProgressAggregate),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 404, description = "Not enrolled in this course", body = ErrorResponse),
        (status = 503, description = "Progress store unavailable", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "courses"
)]
pub(crate) async fn courses_recompute_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<RecomputeCourseRequest>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let aggregate = state
        .engine()
        .recompute_course(user.user_id(), id, &body.lesson_ids)
        .await?;
    Ok((StatusCode::OK, Json(aggregate)))
}
