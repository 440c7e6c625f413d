//! API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use eventum_auth::AuthError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No session; the caller is redirected to the login entry point
    #[error("Unauthenticated")]
    Unauthenticated { redirect: String },

    /// Session present but the required roles are not held
    #[error("Forbidden")]
    Forbidden { redirect: String },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] eventum_db::DbError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
}

/// Message for responses whose real cause stays in the server log
const GENERIC_INTERNAL_MESSAGE: &str = "Internal server error";

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // Denials redirect rather than rendering an error payload
            ApiError::Unauthenticated { redirect } | ApiError::Forbidden { redirect } => {
                return Redirect::to(&redirect).into_response();
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERIC_INTERNAL_MESSAGE.to_string(),
                )
            }
            ApiError::Database(e) => match e {
                eventum_db::DbError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
                eventum_db::DbError::Duplicate(msg) => (StatusCode::BAD_REQUEST, msg),
                _ => {
                    error!("Database error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        GENERIC_INTERNAL_MESSAGE.to_string(),
                    )
                }
            },
            ApiError::Auth(e) => match e {
                // Expected, user-facing outcomes; not logged as failures
                AuthError::MissingCredentials => (StatusCode::BAD_REQUEST, e.to_string()),
                AuthError::InvalidCredentials
                | AuthError::SignatureInvalid
                | AuthError::SessionExpired => (StatusCode::UNAUTHORIZED, e.to_string()),
                // Unexpected failures: full detail to the log, generic body out
                AuthError::PasswordHash(_) | AuthError::Store(_) | AuthError::Session(_) => {
                    error!("Auth internal error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        GENERIC_INTERNAL_MESSAGE.to_string(),
                    )
                }
            },
        };

        let body = axum::Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
