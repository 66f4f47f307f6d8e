//! Cart route handlers.
//!
//! Every handler is scoped to the caller's cart token. Lines belonging to
//! another visitor are treated as absent.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use boutique_core::{CartItem, CartItemId, NewCartItem, ProductId};

use super::{ApiJson, INVALID_REQUEST_DATA, parse_id};
use crate::error::{AppError, Result};
use crate::middleware::CartSession;
use crate::state::AppState;

const CART_ITEM_NOT_FOUND: &str = "Cart item not found";
const INVALID_QUANTITY: &str = "Invalid quantity";

/// Body of `POST /api/cart`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: i32,
    pub size: String,
}

/// Body of `PATCH /api/cart/{id}`.
///
/// `quantity` may be an integer or a numeric string.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    #[serde(default)]
    pub quantity: Option<Value>,
}

/// List the caller's cart lines.
#[instrument(skip(state, cart))]
pub async fn show(State(state): State<AppState>, cart: CartSession) -> Result<Json<Vec<CartItem>>> {
    Ok(Json(state.store().list_cart_items(cart.token()).await?))
}

/// Add a line to the caller's cart.
///
/// The size must be one of the product's sizes and still in stock. Adding the
/// same product and size twice creates two lines.
#[instrument(skip(state, cart, body))]
pub async fn add(
    State(state): State<AppState>,
    cart: CartSession,
    ApiJson(body): ApiJson<AddToCartRequest>,
) -> Result<Json<CartItem>> {
    if body.quantity < 1 || body.size.trim().is_empty() {
        return Err(AppError::BadRequest(INVALID_REQUEST_DATA.to_string()));
    }
    let purchasable = state
        .store()
        .get_product(body.product_id)
        .await?
        .is_some_and(|product| product.is_available_in(&body.size));
    if !purchasable {
        return Err(AppError::BadRequest(INVALID_REQUEST_DATA.to_string()));
    }

    let item = state
        .store()
        .add_to_cart(NewCartItem {
            product_id: body.product_id,
            quantity: body.quantity,
            session_id: cart.0,
            size: body.size,
        })
        .await?;
    Ok(Json(item))
}

/// Change the quantity of one of the caller's cart lines.
#[instrument(skip(state, cart, body))]
pub async fn update(
    State(state): State<AppState>,
    cart: CartSession,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateQuantityRequest>,
) -> Result<Json<CartItem>> {
    let quantity = body
        .quantity
        .as_ref()
        .and_then(parse_quantity)
        .filter(|q| *q >= 1)
        .ok_or_else(|| AppError::BadRequest(INVALID_QUANTITY.to_string()))?;

    let not_found = || AppError::NotFound(CART_ITEM_NOT_FOUND.to_string());
    let id = parse_id::<CartItemId>(&id).ok_or_else(not_found)?;
    if !owns_item(&state, &cart, id).await? {
        return Err(not_found());
    }

    state
        .store()
        .update_cart_item_quantity(id, quantity)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

/// Remove one of the caller's cart lines. Unknown ids succeed.
#[instrument(skip(state, cart))]
pub async fn remove(
    State(state): State<AppState>,
    cart: CartSession,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let Some(id) = parse_id::<CartItemId>(&id) else {
        return Ok(StatusCode::NO_CONTENT);
    };
    if owns_item(&state, &cart, id).await? {
        state.store().remove_from_cart(id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn owns_item(state: &AppState, cart: &CartSession, id: CartItemId) -> Result<bool> {
    let items = state.store().list_cart_items(cart.token()).await?;
    Ok(items.iter().any(|item| item.id == id))
}

/// Accept `3`, `3.0` or `"3"`; anything else is not a quantity.
fn parse_quantity(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| {
                #[allow(clippy::cast_possible_truncation)] // whole numbers only
                let whole = n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64);
                whole
            })
            .and_then(|q| i32::try_from(q).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(&json!(3)), Some(3));
        assert_eq!(parse_quantity(&json!(3.0)), Some(3));
        assert_eq!(parse_quantity(&json!("4")), Some(4));
        assert_eq!(parse_quantity(&json!(-1)), Some(-1));
        assert_eq!(parse_quantity(&json!(2.5)), None);
        assert_eq!(parse_quantity(&json!("two")), None);
        assert_eq!(parse_quantity(&json!(null)), None);
    }
}
