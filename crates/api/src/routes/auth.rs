//! Authentication handlers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use crate::error::Result;
use crate::models::User;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Request to register a new account.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Display name; defaults to the part of the email before the `@`.
    #[serde(default)]
    pub name: Option<String>,
}

/// Request to log in.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request to start a password reset.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

/// Request to redeem a password reset token.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

/// Token plus sanitized user, returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Register a new customer account.
///
/// POST /api/auth/register
///
/// # Errors
///
/// Returns 400 for an invalid email or weak password and 409 when the
/// email is already registered.
#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Response> {
    let name = body
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map_or_else(|| default_name(&body.email), str::to_owned);

    let (user, token) = AuthService::new(state.pool(), state.jwt_keys())
        .register(&body.email, &body.password, &name)
        .await?;

    tracing::info!(user_id = %user.id, "Account registered");
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })).into_response())
}

/// Log in with email and password.
///
/// POST /api/auth/login
///
/// # Errors
///
/// Returns 400 when either credential is missing and 401 when they don't
/// match an account. Unknown email and wrong password produce the same
/// response.
#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let (user, token) = AuthService::new(state.pool(), state.jwt_keys())
        .login(&body.email, &body.password)
        .await?;

    Ok(Json(AuthResponse { token, user }))
}

/// Log out.
///
/// POST /api/auth/logout
///
/// Tokens carry a fixed expiry and there is no server-side revocation
/// list, so this is an acknowledgement for clients that discard their
/// token.
// TODO: revisit if token revocation lands; would need a denylist table.
#[instrument]
pub async fn logout() -> Json<serde_json::Value> {
    Json(json!({ "success": true }))
}

/// Start a password reset.
///
/// POST /api/auth/forgot-password
///
/// Always answers 200 with the same message, whether or not the email has
/// an account. When it does, a single-use token valid for one hour is
/// stored; with no mailer wired up, the token is logged for operators to
/// relay.
///
/// # Errors
///
/// Returns an error only if the database operation fails.
#[instrument(skip(state))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<Json<serde_json::Value>> {
    let token = AuthService::new(state.pool(), state.jwt_keys())
        .request_password_reset(&body.email)
        .await?;

    if let Some(token) = token {
        tracing::debug!(reset_token = %token, "Password reset token issued");
    }

    Ok(Json(json!({
        "success": true,
        "message": "If an account exists for that email, a reset link has been sent",
    })))
}

/// Redeem a reset token and set a new password.
///
/// POST /api/auth/reset-password
///
/// # Errors
///
/// Returns 400 when the token is unknown, expired, or already used, or
/// when the new password is too weak.
#[instrument(skip(state, body))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<serde_json::Value>> {
    AuthService::new(state.pool(), state.jwt_keys())
        .reset_password(&body.token, &body.password)
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// Fallback display name derived from the email's local part.
fn default_name(email: &str) -> String {
    email
        .split('@')
        .next()
        .filter(|local| !local.is_empty())
        .unwrap_or("Customer")
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_name_uses_local_part() {
        assert_eq!(default_name("ada@example.com"), "ada");
    }

    #[test]
    fn test_default_name_handles_garbage() {
        assert_eq!(default_name("@example.com"), "Customer");
        assert_eq!(default_name(""), "Customer");
    }
}
