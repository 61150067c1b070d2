//! CLI command implementations.
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed demo catalog data and accounts
//! - `admin` - Admin user management

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Database URL from `API_DATABASE_URL`, falling back to `DATABASE_URL`.
pub(crate) fn database_url() -> Result<SecretString, &'static str> {
    std::env::var("API_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "API_DATABASE_URL")
}
