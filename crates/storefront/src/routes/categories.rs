//! Category route handlers.
//!
//! Mounted under both `/api/categories` and `/api/brands`.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use boutique_core::{Category, CategoryId, NewCategory};

use super::{ApiJson, parse_id};
use crate::error::{AppError, Result};
use crate::state::AppState;

const CATEGORY_NOT_FOUND: &str = "Category not found";

fn not_found() -> AppError {
    AppError::NotFound(CATEGORY_NOT_FOUND.to_string())
}

/// List all categories.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.store().list_categories().await?))
}

/// Show a single category.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Category>> {
    let id = parse_id::<CategoryId>(&id).ok_or_else(not_found)?;
    state
        .store()
        .get_category(id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

/// Create a category.
#[instrument(skip(state, input), fields(name = %input.name))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewCategory>,
) -> Result<Json<Category>> {
    validate(&input)?;
    let category = state.store().create_category(input).await?;
    tracing::info!(id = %category.id, "Category created");
    Ok(Json(category))
}

/// Replace a category.
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<NewCategory>,
) -> Result<Json<Category>> {
    let id = parse_id::<CategoryId>(&id).ok_or_else(not_found)?;
    validate(&input)?;
    state
        .store()
        .update_category(id, input)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

/// Delete a category with its products and their cart lines.
#[instrument(skip(state))]
pub async fn destroy(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    if let Some(id) = parse_id::<CategoryId>(&id) {
        state.store().delete_category(id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

fn validate(input: &NewCategory) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("Category name is required".to_string()));
    }
    Ok(())
}
