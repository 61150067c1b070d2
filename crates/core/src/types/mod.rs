//! Core types for Driftwear.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod money;
pub mod slug;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{Price, PriceError};
pub use slug::slugify;
pub use status::*;

/// Size value standing in for "this product has no size options".
///
/// Cart rows and checkout items use it so the per-user
/// (product, size, color) uniqueness holds without nullable columns;
/// stock logic skips the per-size counter when it sees this value.
pub const ONE_SIZE: &str = "One Size";

/// Color counterpart of [`ONE_SIZE`].
pub const DEFAULT_COLOR: &str = "Default";
