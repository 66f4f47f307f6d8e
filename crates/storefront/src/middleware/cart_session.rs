//! Cart session extractor.
//!
//! Every visitor gets an opaque token (UUID v4) stored in their session. The
//! catalog store only ever sees this token, never the session itself.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::AppError;

/// Session key holding the cart token.
pub const CART_TOKEN_KEY: &str = "cart_token";

/// The caller's cart token, created on first use.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(cart: CartSession) -> impl IntoResponse {
///     store.list_cart_items(cart.token()).await
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSession(pub String);

impl CartSession {
    /// The opaque token identifying this visitor's cart.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for CartSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let existing: Option<String> = session
            .get(CART_TOKEN_KEY)
            .await
            .map_err(|e| AppError::Internal(format!("session read failed: {e}")))?;

        if let Some(token) = existing {
            return Ok(Self(token));
        }

        let token = Uuid::new_v4().to_string();
        session
            .insert(CART_TOKEN_KEY, &token)
            .await
            .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;
        tracing::debug!("Issued new cart token");

        Ok(Self(token))
    }
}
