//! Boutique Storefront library.
//!
//! Catalog and cart storage behind the [`store::CatalogStore`] contract, an
//! in-memory and a `PostgreSQL` implementation, and the JSON API that serves
//! them. The binary in `main.rs` only wires configuration, logging and the
//! listener around [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod media;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod store;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use sqlx::PgPool;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::media::UPLOADS_ROUTE;
use crate::middleware::{
    create_memory_session_layer, create_postgres_session_layer, request_id_middleware,
};
use crate::state::AppState;

/// Where session data lives.
#[derive(Debug, Clone)]
pub enum SessionBackend {
    /// Sessions are lost on restart.
    Memory,
    /// Sessions are stored in `tower_sessions.session`.
    Postgres(PgPool),
}

/// Build the full storefront router: API routes, uploaded media, body size
/// limit, sessions, request ids and request tracing.
///
/// Sentry layers are added by the binary so tests can use this as-is.
pub fn app(state: AppState, sessions: SessionBackend) -> Router {
    let uploads = ServeDir::new(state.config().upload_dir.clone());

    let router = routes::routes()
        .nest_service(UPLOADS_ROUTE, uploads)
        .layer(DefaultBodyLimit::max(state.config().max_body_bytes));

    // Router::layer erases the store type, so both branches have one type
    let router = match sessions {
        SessionBackend::Memory => router.layer(create_memory_session_layer(state.config())),
        SessionBackend::Postgres(pool) => {
            router.layer(create_postgres_session_layer(&pool, state.config()))
        }
    };

    router
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
