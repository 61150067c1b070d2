//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use driftwear_core::{Email, UserId, UserRole};

/// A user account (customer or admin).
///
/// The password hash never leaves the repository layer; this type is safe to
/// serialize straight into login and profile responses.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address, unique and lowercased.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Account role; `Admin` unlocks the back-office routes.
    pub role: UserRole,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}
