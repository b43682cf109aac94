use axum::http::StatusCode;
use axum::routing::put;
use axum::{Json, Router, extract::State, middleware, response::IntoResponse};

use crate::engine::ProgressAggregate;
use crate::web::dto::goals::UpdateGoalsRequest;
use crate::web::error::ErrorResponse;
use crate::web::{AppState, RequestContext, WebResult, middlewares};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", put(goals_update_handler))
        .layer(middleware::from_fn(middlewares::extract_context_fn))
        .with_state(state)
}

#[utoipa::path(
    put,
    path = "/api/v1/goals/",
    description = "Replace the current user's learning goals",
    request_body = UpdateGoalsRequest,
    responses(
        (status = 200, description = "Goals updated", body = ProgressAggregate),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 503, description = "Progress store unavailable", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "goals"
)]
pub(crate) async fn goals_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(body): Json<UpdateGoalsRequest>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let aggregate = state.engine().set_goals(user.user_id(), body.into()).await?;
    Ok((StatusCode::OK, Json(aggregate)))
}
