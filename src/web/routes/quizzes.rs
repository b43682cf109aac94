use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router, extract::State, middleware, response::IntoResponse};
use uuid::Uuid;

use crate::engine::ProgressAggregate;
use crate::web::dto::quizzes::SubmitQuizRequest;
use crate::web::error::ErrorResponse;
use crate::web::{AppState, RequestContext, WebResult, middlewares};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/{id}/submit", post(quizzes_submit_handler))
        .layer(middleware::from_fn(middlewares::extract_context_fn))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/quizzes/{quiz_id}/submit",
    description = "Submit a quiz attempt. Later submissions supersede the score.",
    params(
        ("quiz_id" = Uuid, Path, description = "ID of the quiz being submitted")
    ),
    request_body = SubmitQuizRequest,
    responses(
        (status = 200, description = "Quiz recorded", body = ProgressAggregate),
        (status = 400, description = "Score or time spent out of range", body = ErrorResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 503, description = "Progress store unavailable", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "quizzes"
)]
pub(crate) async fn quizzes_submit_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SubmitQuizRequest>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let aggregate = state
        .engine()
        .submit_quiz(user.user_id(), id, body.into())
        .await?;
    Ok((StatusCode::OK, Json(aggregate)))
}
