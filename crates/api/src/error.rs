//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to
//! Sentry before responding. All route handlers return
//! `Result<T, AppError>`; every failure leaves the API as a JSON
//! `{"error": "..."}` envelope with the matching status code.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::checkout::CheckoutError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Checkout operation failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated (or not authorized for this route).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Status code and client-facing message for this error.
    ///
    /// Internal details never reach the client; login failures collapse
    /// to one message for unknown email and wrong password alike.
    fn parts(&self) -> (StatusCode, String) {
        match self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_owned()),
                RepositoryError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                RepositoryError::Database(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_owned())
                }
            },
            Self::Auth(err) => match err {
                AuthError::MissingCredentials => (
                    StatusCode::BAD_REQUEST,
                    "Email and password are required".to_owned(),
                ),
                AuthError::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    "Invalid email or password".to_owned(),
                ),
                AuthError::InvalidEmail(_) => {
                    (StatusCode::BAD_REQUEST, "Invalid email address".to_owned())
                }
                AuthError::WeakPassword(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                AuthError::UserAlreadyExists => (
                    StatusCode::CONFLICT,
                    "An account with this email already exists".to_owned(),
                ),
                AuthError::InvalidToken | AuthError::TokenExpired | AuthError::UserNotFound => (
                    StatusCode::UNAUTHORIZED,
                    "Invalid or expired token".to_owned(),
                ),
                AuthError::InvalidResetToken => (
                    StatusCode::BAD_REQUEST,
                    "Invalid or expired reset token".to_owned(),
                ),
                AuthError::TokenCreation
                | AuthError::PasswordHash
                | AuthError::Repository(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_owned())
                }
            },
            Self::Checkout(err) => match err {
                CheckoutError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                CheckoutError::TotalMismatch { .. } => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                CheckoutError::Stock(_) => (StatusCode::CONFLICT, err.to_string()),
                CheckoutError::Repository(_) | CheckoutError::Database(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_owned())
                }
            },
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_owned())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.parts();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product not found".to_string());
        assert_eq!(err.to_string(), "Not found: product not found");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_login_taxonomy_messages() {
        let (status, message) = AppError::Auth(AuthError::MissingCredentials).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Email and password are required");

        let (status, message) = AppError::Auth(AuthError::InvalidCredentials).parts();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Invalid email or password");
    }

    #[test]
    fn test_stock_error_maps_to_conflict() {
        let err = AppError::Checkout(CheckoutError::Stock("insufficient stock for Tee".into()));
        let (status, message) = err.parts();

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(message, "STOCK_ERROR: insufficient stock for Tee");
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = AppError::Internal("connection pool exhausted".to_string());
        let (status, message) = err.parts();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Internal server error");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::Validation(
                "items must not be empty".into()
            ))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
