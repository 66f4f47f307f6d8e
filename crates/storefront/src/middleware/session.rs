//! Session middleware configuration.
//!
//! Sessions exist only to carry the cart token (see [`super::cart_session`]).
//! The memory backend keeps them in process; the postgres backend stores them
//! in `tower_sessions.session`.

use sqlx::PgPool;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "boutique_session";

/// Session expiry time in seconds (24 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer with an in-process store.
#[must_use]
pub fn create_memory_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    configure(MemoryStore::default(), config)
}

/// Create the session layer with `PostgreSQL` store.
///
/// The session table must be created via migration.
#[must_use]
pub fn create_postgres_session_layer(
    pool: &PgPool,
    config: &StorefrontConfig,
) -> SessionManagerLayer<PostgresStore> {
    configure(PostgresStore::new(pool.clone()), config)
}

fn configure<S: SessionStore>(store: S, config: &StorefrontConfig) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.secure_cookies())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
