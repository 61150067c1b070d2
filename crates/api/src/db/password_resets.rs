//! Password reset token repository.
//!
//! Tokens are stored hashed; the plaintext only ever appears in the
//! forgot-password log line. Redemption is a single conditional UPDATE so
//! a token can't be spent twice.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use driftwear_core::UserId;

use super::RepositoryError;

/// Repository for password reset token operations.
pub struct PasswordResetRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PasswordResetRepository<'a> {
    /// Create a new password reset repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a hashed reset token for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO password_reset_tokens (user_id, token_hash, expires_at) \
             VALUES ($1, $2, $3)",
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Redeem a token by its hash, marking it used.
    ///
    /// Returns the owning user when the token exists, hasn't expired and
    /// hasn't been used before, and `None` in every other case.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn consume(&self, token_hash: &str) -> Result<Option<UserId>, RepositoryError> {
        let user_id = sqlx::query_scalar::<_, UserId>(
            "UPDATE password_reset_tokens SET used_at = now() \
             WHERE token_hash = $1 AND used_at IS NULL AND expires_at > now() \
             RETURNING user_id",
        )
        .bind(token_hash)
        .fetch_optional(self.pool)
        .await?;

        Ok(user_id)
    }
}
