//! In-process HTTP client for the storefront router.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use boutique_storefront::config::StorefrontConfig;
use boutique_storefront::state::AppState;
use boutique_storefront::store::{CatalogStore, MemoryStore};
use boutique_storefront::{SessionBackend, app};

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// One visitor talking to one storefront. Keeps the session cookie between
/// requests the way a browser would.
pub struct TestClient {
    router: Router,
    cookie: Option<String>,
    // Keeps the upload directory alive as long as the router.
    uploads: Arc<TempDir>,
}

impl TestClient {
    /// A storefront over an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// A storefront over the given store, with in-memory sessions.
    #[must_use]
    pub fn with_store(store: Arc<dyn CatalogStore>) -> Self {
        let uploads = Arc::new(tempfile::tempdir().unwrap());
        let config = StorefrontConfig::for_memory(uploads.path());
        let router = app(AppState::new(config, store), SessionBackend::Memory);

        Self {
            router,
            cookie: None,
            uploads,
        }
    }

    /// A second visitor on the same storefront, without this one's cookie.
    #[must_use]
    pub fn other_visitor(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: None,
            uploads: Arc::clone(&self.uploads),
        }
    }

    /// Directory uploads are written to.
    #[must_use]
    pub fn upload_dir(&self) -> &std::path::Path {
        self.uploads.path()
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&mut self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn patch(&mut self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&mut self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    /// Send a raw body, for malformed-JSON cases.
    pub async fn send_raw(&mut self, method: Method, uri: &str, body: &str) -> TestResponse {
        let request = self
            .builder(method, uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.dispatch(request).await
    }

    async fn send(&mut self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = self.builder(method, uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.dispatch(request).await
    }

    fn builder(&self, method: Method, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn dispatch(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse { status, body }
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}
