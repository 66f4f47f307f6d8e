//! Integration tests for Boutique.
//!
//! # Running Tests
//!
//! ```bash
//! # In-memory store and HTTP tests
//! cargo test -p boutique-integration-tests
//!
//! # Include the PostgreSQL store (needs a disposable database)
//! DATABASE_URL=postgres://localhost/boutique_test \
//!     cargo test -p boutique-integration-tests -- --include-ignored
//! ```
//!
//! # Helpers
//!
//! - [`contract`] - Store contract checks, run against every `CatalogStore`
//! - [`http`] - Drives the full router in-process, carrying the session cookie

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

pub mod contract;
pub mod http;
