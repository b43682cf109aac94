use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use crate::{
    engine::ProgressError,
    error::log_error,
    model::StoreError,
};

pub type WebResult<T> = std::result::Result<T, WebError>;

#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error("AuthenticationCookieInvalid, cookie: {cookie}. Reason: {reason}")]
    AuthenticationCookieInvalid { cookie: String, reason: String },

    #[error("AuthenticationRequired")]
    AuthenticationRequired,
}

impl AuthenticationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            Self::AuthenticationCookieInvalid { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::AuthenticationCookieInvalid { .. } => {
                String::from("Authentication error, cookie invalid.")
            }
            Self::AuthenticationRequired => String::from("Authentication required."),
        }
    }
}

#[derive(Debug, Error)]
pub enum WebError {
    #[error("EngineError - {0}")]
    EngineError(#[from] ProgressError),
    #[error("AuthenticationError - {0}")]
    AuthenticationError(#[from] AuthenticationError),
}

impl WebError {
    pub fn auth_cookie_invalid<S: Into<String>, R: std::fmt::Display>(
        cookie: S,
        reason: R,
    ) -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationCookieInvalid {
            cookie: cookie.into(),
            reason: reason.to_string(),
        })
    }

    pub fn auth_required() -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationRequired)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::EngineError(e) => match e {
                ProgressError::NotFound { .. } => StatusCode::NOT_FOUND,
                ProgressError::InvalidScore(_) | ProgressError::InvalidTimeSpent(_) => {
                    StatusCode::BAD_REQUEST
                }
                ProgressError::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
                ProgressError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            Self::AuthenticationError(e) => e.status_code(),
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::EngineError(e) => match e {
                ProgressError::NotFound { .. } => {
                    String::from("Progress error, resource not found.")
                }
                ProgressError::InvalidScore(_) => {
                    String::from("Progress error, score must be between 0 and 100.")
                }
                ProgressError::InvalidTimeSpent(_) => {
                    String::from("Progress error, time spent must not be negative.")
                }
                ProgressError::Store(StoreError::Conflict(_)) => {
                    String::from("Progress error, concurrent update detected. Retry the request.")
                }
                ProgressError::Store(_) => {
                    String::from("Progress store is temporarily unavailable.")
                }
            },
            Self::AuthenticationError(e) => e.client_display(),
        }
    }
}

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message for the client
    pub message: String,
    /// HTTP status code (stringified)
    pub status_code: String,
    /// Optional debug details (only in debug mode)
    pub details: Option<String>,
}

impl IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        log_error(&self);

        let status_code = self.status_code();
        let display = self.client_display();

        let body = ErrorResponse {
            message: display,
            status_code: status_code.as_str().to_string(),
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        };

        (status_code, Json(body)).into_response()
    }
}
