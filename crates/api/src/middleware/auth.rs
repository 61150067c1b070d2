//! Bearer-token authentication extractors.
//!
//! Every protected handler takes one of these extractors as an argument.
//! The token only proves identity; the user row (including the role) is
//! loaded fresh from the database on each request, so a role change or a
//! deleted account takes effect immediately.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::db::UserRepository;
use crate::error::set_sentry_user;
use crate::models::User;
use crate::services::auth::extract_bearer;
use crate::state::AppState;

/// Rejection for the auth extractors.
#[derive(Debug)]
pub enum AuthRejection {
    /// Missing, malformed, or expired token, unknown user, or
    /// insufficient role.
    Unauthorized,
    /// The user lookup itself failed.
    Internal,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            Self::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Extractor that requires a valid bearer token.
///
/// Rejects with 401 when the token is absent or invalid.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub User);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state).await?;
        Ok(Self(user))
    }
}

/// Extractor that requires a valid bearer token for an admin account.
///
/// Non-admin callers get the same 401 as unauthenticated ones, so the
/// response does not reveal whether the credentials were valid.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state).await?;
        if !user.role.is_admin() {
            return Err(AuthRejection::Unauthorized);
        }
        Ok(Self(user))
    }
}

/// Resolve the bearer token in `parts` to a live user row.
async fn authenticate(parts: &Parts, state: &AppState) -> Result<User, AuthRejection> {
    let header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthRejection::Unauthorized)?;
    let token = extract_bearer(header).ok_or(AuthRejection::Unauthorized)?;

    let claims = state.jwt_keys().verify(token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        AuthRejection::Unauthorized
    })?;

    let user = UserRepository::new(state.pool())
        .get_by_id(claims.sub)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load user for valid token");
            AuthRejection::Internal
        })?
        .ok_or(AuthRejection::Unauthorized)?;

    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(user)
}
