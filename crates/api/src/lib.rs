//! Driftwear API library.
//!
//! This crate provides the storefront and back-office API as a library,
//! allowing it to be tested and reused by the CLI.
//!
//! # Architecture
//!
//! - Axum handlers in [`routes`], thin over [`services`] and [`db`]
//! - `PostgreSQL` via sqlx; one repository struct per table cluster
//! - Bearer JWT auth with extractors in [`middleware`]
//! - Checkout and inventory logic in [`services`]

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
