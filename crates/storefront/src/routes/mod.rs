//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (pings the store)
//!
//! # Products
//! GET    /api/products                  - Product listing
//! POST   /api/products                  - Create product
//! GET    /api/products/{id}             - Product detail
//! PUT    /api/products/{id}             - Replace product
//! DELETE /api/products/{id}             - Delete product and its cart lines
//! GET    /api/products/category/{id}    - Products in a category
//! GET    /api/products/brand/{id}       - Alias of the above
//!
//! # Categories (also mounted under /api/brands)
//! GET    /api/categories                - Category listing
//! POST   /api/categories                - Create category
//! GET    /api/categories/{id}           - Category detail
//! PUT    /api/categories/{id}           - Replace category
//! DELETE /api/categories/{id}           - Delete category, its products and cart lines
//!
//! # Cart (scoped to the caller's session)
//! GET    /api/cart                      - Cart lines
//! POST   /api/cart                      - Add a line
//! PATCH  /api/cart/{id}                 - Change quantity
//! DELETE /api/cart/{id}                 - Remove a line
//! ```

pub mod cart;
pub mod categories;
pub mod products;

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{FromRequest, Request, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Message returned for bodies that fail to parse.
pub const INVALID_REQUEST_DATA: &str = "Invalid request data";

/// Message returned for bodies over the configured size limit.
pub const PAYLOAD_TOO_LARGE: &str = "Request body too large";

/// JSON body extractor that rejects with a `{message}` body instead of axum's
/// plain-text rejection: 413 when the body is over the limit, 400 otherwise.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(JsonRejection::BytesRejection(rejection))
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE =>
            {
                tracing::warn!(error = %rejection.body_text(), "Request body over limit");
                Err(AppError::PayloadTooLarge(PAYLOAD_TOO_LARGE.to_string()))
            }
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Rejected request body");
                Err(AppError::BadRequest(INVALID_REQUEST_DATA.to_string()))
            }
        }
    }
}

/// Parse a path id. Ids that are not integers name nothing, so callers treat
/// `None` as not-found.
pub(crate) fn parse_id<T: FromStr>(raw: &str) -> Option<T> {
    raw.parse().ok()
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
        .route("/category/{id}", get(products::by_category))
        .route("/brand/{id}", get(products::by_category))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        .route(
            "/{id}",
            get(categories::show)
                .put(categories::update)
                .delete(categories::destroy),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).post(cart::add))
        .route("/{id}", axum::routing::patch(cart::update).delete(cart::remove))
}

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api/products", product_routes())
        .nest("/api/categories", category_routes())
        // Brands are the storefront's old name for categories
        .nest("/api/brands", category_routes())
        .nest("/api/cart", cart_routes())
}

/// Liveness health check endpoint.
///
/// Returns ok if the server is running. Does not check dependencies.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "timestamp": Utc::now().to_rfc3339() }))
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store is not reachable.
pub async fn readiness(State(state): State<AppState>) -> Response {
    match state.store().ping().await {
        Ok(()) => Json(json!({ "status": "ready" })).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{body::Body, extract::DefaultBodyLimit, routing::post};
    use boutique_core::ProductId;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    fn echo_app(limit: usize) -> Router {
        Router::new()
            .route(
                "/echo",
                post(|ApiJson(body): ApiJson<Value>| async move { Json(body) }),
            )
            .layer(DefaultBodyLimit::max(limit))
    }

    async fn post_json(app: Router, body: String) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/echo")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_oversized_body_is_payload_too_large() {
        let body = json!({ "video": "A".repeat(256) }).to_string();
        let (status, json) = post_json(echo_app(64), body).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json, json!({ "message": PAYLOAD_TOO_LARGE }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let (status, json) = post_json(echo_app(1024), "{not json".to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, json!({ "message": INVALID_REQUEST_DATA }));
    }

    #[tokio::test]
    async fn test_body_under_limit_is_accepted() {
        let (status, json) = post_json(echo_app(1024), r#"{"ok":true}"#.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "ok": true }));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id::<ProductId>("7"), Some(ProductId::new(7)));
        assert_eq!(parse_id::<ProductId>("abc"), None);
        assert_eq!(parse_id::<ProductId>(""), None);
    }
}
