use axum::{extract::Request, middleware::Next, response::Response};
use tower_cookies::Cookies;

use crate::{
    Config, auth,
    web::{RequestContext, context::AuthenticatedUser, error::WebError},
};

pub static AUTH_TOKEN: &str = "SID";

pub async fn extract_context_fn(
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = match cookies.get(AUTH_TOKEN) {
        Some(token) => token,
        None => {
            req.extensions_mut().insert(RequestContext::new(None));
            return Ok(next.run(req).await);
        }
    };

    let claims = auth::process_token(token.value(), Config::get_or_init(false).await.app().jwt())
        .map_err(|e| WebError::auth_cookie_invalid(AUTH_TOKEN, e))?;

    let user_id = claims
        .claims
        .sub
        .parse::<uuid::Uuid>()
        .map_err(|e| WebError::auth_cookie_invalid(AUTH_TOKEN, e))?;

    req.extensions_mut()
        .insert(RequestContext::new(Some(AuthenticatedUser::new(user_id))));

    Ok(next.run(req).await)
}
