//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format (registration only; login folds this into
    /// `InvalidCredentials` so responses don't leak which part was wrong).
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] driftwear_core::EmailError),

    /// Email or password missing from the request.
    #[error("email and password are required")]
    MissingCredentials,

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User not found.
    #[error("user not found")]
    UserNotFound,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Bearer token failed signature or claim checks.
    #[error("invalid token")]
    InvalidToken,

    /// Bearer token expired.
    #[error("token expired")]
    TokenExpired,

    /// Token could not be signed.
    #[error("token creation failed")]
    TokenCreation,

    /// Password reset token unknown, expired or already used.
    #[error("invalid or expired reset token")]
    InvalidResetToken,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
