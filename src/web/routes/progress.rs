use axum::{
    Json, Router, extract::State, http::StatusCode, middleware, response::IntoResponse,
    routing::get,
};

use crate::engine::ProgressAggregate;
use crate::web::error::ErrorResponse;
use crate::web::{AppState, RequestContext, WebResult, middlewares};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(progress_get_handler))
        .layer(middleware::from_fn(middlewares::extract_context_fn))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/progress/",
    description = "Get the current user's full progress aggregate",
    responses(
        (status = 200, description = "Progress found", body = ProgressAggregate),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 404, description = "No progress recorded yet", body = ErrorResponse),
        (status = 503, description = "Progress store unavailable", body = ErrorResponse),
    ),
    tag = "progress",
    security(
        ("cookie" = [])
    )
)]
pub(crate) async fn progress_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let aggregate = state.engine().progress(user.user_id()).await?;
    Ok((StatusCode::OK, Json(aggregate)))
}
