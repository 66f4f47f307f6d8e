//! Product route handlers.
//!
//! Validation lives here; the store accepts whatever it is given.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use boutique_core::{
    CategoryId, MAX_PRODUCT_IMAGES, MAX_PRODUCT_VIDEOS, NewProduct, Product, ProductId,
};

use super::{ApiJson, parse_id};
use crate::error::{AppError, Result};
use crate::state::AppState;

const PRODUCT_NOT_FOUND: &str = "Product not found";

/// List all products.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.store().list_products().await?))
}

/// Show a single product.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    let product = match parse_id::<ProductId>(&id) {
        Some(id) => state.store().get_product(id).await?,
        None => None,
    };
    product
        .map(Json)
        .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))
}

/// List the products of one category. Unknown categories have no products.
#[instrument(skip(state))]
pub async fn by_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Product>>> {
    let Some(category_id) = parse_id::<CategoryId>(&id) else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(
        state.store().list_products_by_category(category_id).await?,
    ))
}

/// Create a product.
#[instrument(skip(state, input), fields(name = %input.name))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewProduct>,
) -> Result<Json<Product>> {
    let input = prepare(&state, input).await?;
    let product = state.store().create_product(input).await?;
    tracing::info!(id = %product.id, "Product created");
    Ok(Json(product))
}

/// Replace a product.
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<NewProduct>,
) -> Result<Json<Product>> {
    let id = parse_id::<ProductId>(&id)
        .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))?;
    if state.store().get_product(id).await?.is_none() {
        return Err(AppError::NotFound(PRODUCT_NOT_FOUND.to_string()));
    }

    let input = prepare(&state, input).await?;
    state
        .store()
        .update_product(id, input)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))
}

/// Delete a product and the cart lines that reference it.
#[instrument(skip(state))]
pub async fn destroy(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    if let Some(id) = parse_id::<ProductId>(&id) {
        state.store().delete_product(id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Validate a product body and persist any inline media it carries.
async fn prepare(state: &AppState, mut input: NewProduct) -> Result<NewProduct> {
    validate(&input)?;

    if state.store().get_category(input.category_id).await?.is_none() {
        return Err(AppError::BadRequest("Category not found".to_string()));
    }

    input.videos = state.media().persist_videos(input.videos).await?;
    Ok(input)
}

fn validate(input: &NewProduct) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("Product name is required".to_string()));
    }
    if input.images.len() > MAX_PRODUCT_IMAGES {
        return Err(AppError::BadRequest(format!(
            "A product can have at most {MAX_PRODUCT_IMAGES} images"
        )));
    }
    if input.videos.len() > MAX_PRODUCT_VIDEOS {
        return Err(AppError::BadRequest(format!(
            "A product can have at most {MAX_PRODUCT_VIDEOS} videos"
        )));
    }
    if input.size_stock.iter().any(|s| s.size.trim().is_empty()) {
        return Err(AppError::BadRequest("Sizes must not be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use boutique_core::SizeStock;

    use super::*;

    fn input() -> NewProduct {
        NewProduct {
            name: "Shoe".to_string(),
            description: String::new(),
            price: "10".parse().unwrap(),
            image: "x".to_string(),
            images: vec!["x".to_string()],
            videos: vec![],
            category_id: CategoryId::new(1),
            size_stock: vec![SizeStock::new("M", 1)],
        }
    }

    #[test]
    fn test_valid_product_passes() {
        assert!(validate(&input()).is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut product = input();
        product.name = "  ".to_string();
        assert!(matches!(validate(&product), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_media_limits() {
        let mut product = input();
        product.images = vec!["x".to_string(); MAX_PRODUCT_IMAGES];
        product.videos = vec!["v".to_string(); MAX_PRODUCT_VIDEOS];
        assert!(validate(&product).is_ok());

        product.images.push("one too many".to_string());
        assert!(validate(&product).is_err());

        let mut product = input();
        product.videos = vec!["v".to_string(); MAX_PRODUCT_VIDEOS + 1];
        assert!(validate(&product).is_err());
    }

    #[test]
    fn test_blank_size_rejected() {
        let mut product = input();
        product.size_stock.push(SizeStock::new("", 3));
        assert!(validate(&product).is_err());
    }
}
