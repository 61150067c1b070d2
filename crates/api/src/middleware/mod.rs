//! HTTP middleware and extractors for the API.
//!
//! # Components
//!
//! - `auth` - Bearer-token extractors (`RequireAuth`, `RequireAdmin`)
//! - `request_id` - Request ID generation and propagation
//!
//! Authentication is applied per route via the extractors rather than a
//! blanket layer, so public catalog routes skip the user lookup entirely.

pub mod auth;
pub mod request_id;

pub use auth::{RequireAdmin, RequireAuth};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
