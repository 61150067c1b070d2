//! Integration tests for Driftwear.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations
//! cargo run -p driftwear-cli -- migrate
//! cargo run -p driftwear-cli -- seed
//!
//! # Start the API server
//! cargo run -p driftwear-api
//!
//! # Run integration tests (live-server tests are ignored by default)
//! cargo test -p driftwear-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `storefront_catalog` - Public catalog, search and health endpoints
//! - `auth_flow` - Registration, login taxonomy and role enforcement
//! - `checkout_flow` - Cart, checkout transaction and inventory reports
//! - `admin_back_office` - Dashboard, product CRUD and order management
//! - `database_constraints` - Schema-level invariants via direct SQL
//! - `api_contract` - Wire-format guarantees (no server required)
//!
//! Live-server tests read `API_BASE_URL` (default `http://localhost:3000`)
//! and log in as the seeded admin account unless `ADMIN_EMAIL` /
//! `ADMIN_PASSWORD` override it. Database tests read `API_DATABASE_URL`
//! or `DATABASE_URL`.
