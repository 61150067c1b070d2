//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Registration, login, JWTs, password resets
//! - `checkout` - The checkout transaction (order + stock decrements)
//! - `inventory` - Read-only availability reports for cart items

pub mod auth;
pub mod checkout;
pub mod inventory;
