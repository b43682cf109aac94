use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{post, put};
use axum::{Json, Router, extract::State, middleware, response::IntoResponse};
use uuid::Uuid;

use crate::engine::ProgressAggregate;
use crate::web::dto::lessons::{CompleteLessonRequest, UpdateLessonRequest};
use crate::web::error::ErrorResponse;
use crate::web::{AppState, RequestContext, WebResult, middlewares};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/{id}/start", post(lessons_start_handler))
        .route("/{id}/complete", post(lessons_complete_handler))
        .route("/{id}", put(lessons_update_handler))
        .route("/{id}/reset", post(lessons_reset_handler))
        .layer(middleware::from_fn(middlewares::extract_context_fn))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/lessons/{lesson_id}/start",
    description = "Start (or resume) a lesson. Safe to retry.",
    params(
        ("lesson_id" = Uuid, Path, description = "ID of the lesson to start")
    ),
    responses(
        (status = 200, description = "Lesson started", body = ProgressAggregate),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 503, description = "Progress store unavailable", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "lessons"
)]
pub(crate) async fn lessons_start_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let aggregate = state.engine().start_lesson(user.user_id(), id).await?;
    Ok((StatusCode::OK, Json(aggregate)))
}

#[utoipa::path(
    post,
    path = "/api/v1/lessons/{lesson_id}/complete",
    description = "Complete a lesson. A score of 80 or above counts as mastery. Safe to retry.",
    params(
        ("lesson_id" = Uuid, Path, description = "ID of the lesson to complete")
    ),
    request_body = CompleteLessonRequest,
    responses(
        (status = 200, description = "Lesson completed", body = ProgressAggregate),
        (status = 400, description = "Score or time spent out of range", body = ErrorResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 404, description = "Lesson was never started", body = ErrorResponse),
        (status = 503, description = "Progress store unavailable", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "lessons"
)]
pub(crate) async fn lessons_complete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<CompleteLessonRequest>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let aggregate = state
        .engine()
        .complete_lesson(user.user_id(), id, body.into())
        .await?;
    Ok((StatusCode::OK, Json(aggregate)))
}

#[utoipa::path(
    put,
    path = "/api/v1/lessons/{lesson_id}",
    description = "Apply a partial update to lesson progress. Delta fields are not retry-safe.",
    params(
        ("lesson_id" = Uuid, Path, description = "ID of the lesson to update")
    ),
    request_body = UpdateLessonRequest,
    responses(
        (status = 200, description = "Lesson updated", body = ProgressAggregate),
        (status = 400, description = "Score or time spent out of range", body = ErrorResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 404, description = "Lesson was never started", body = ErrorResponse),
        (status = 503, description = "Progress store unavailable", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "lessons"
)]
pub(crate) async fn lessons_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateLessonRequest>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let aggregate = state
        .engine()
        .update_lesson(user.user_id(), id, body.into())
        .await?;
    Ok((StatusCode::OK, Json(aggregate)))
}

#[utoipa::path(
    post,
    path = "/api/v1/lessons/{lesson_id}/reset",
    description = "Reset a lesson back to not_started. Completion totals are kept.",
    params(
        ("lesson_id" = Uuid, Path, description = "ID of the lesson to reset")
    ),
    responses(
        (status = 200, description = "Lesson reset", body = ProgressAggregate),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 404, description = "Lesson was never started", body = ErrorResponse),
        (status = 503, description = "Progress store unavailable", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "lessons"
)]
pub(crate) async fn lessons_reset_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let aggregate = state.engine().reset_lesson(user.user_id(), id).await?;
    Ok((StatusCode::OK, Json(aggregate)))
}
