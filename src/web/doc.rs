use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub struct CookieAuthModifier;

impl Modify for CookieAuthModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(schema) = openapi.components.as_mut() {
            schema.add_security_scheme(
                "cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "SID",
                    "JWT token for current user",
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::routes::progress::progress_get_handler,
        crate::web::routes::lessons::lessons_start_handler,
        crate::web::routes::lessons::lessons_complete_handler,
        crate::web::routes::lessons::lessons_update_handler,
        crate::web::routes::lessons::lessons_reset_handler,
        crate::web::routes::courses::courses_enroll_handler,
        crate::web::routes::courses::courses_recompute_handler,
        crate::web::routes::quizzes::quizzes_submit_handler,
        crate::web::routes::goals::goals_update_handler,
    ),
    modifiers(&CookieAuthModifier),
)]
pub struct ApiDoc;
