//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions, memory or `PostgreSQL` store)

pub mod cart_session;
pub mod request_id;
pub mod session;

pub use cart_session::CartSession;
pub use request_id::request_id_middleware;
pub use session::{create_memory_session_layer, create_postgres_session_layer};
