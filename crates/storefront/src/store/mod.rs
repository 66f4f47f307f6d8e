//! Catalog and cart storage contract.
//!
//! Route handlers talk to storage exclusively through [`CatalogStore`].
//! Two implementations exist:
//!
//! - [`MemoryStore`] - keyed in-memory collections, seeded with fixture data
//! - [`crate::db::PgCatalogStore`] - `PostgreSQL` tables via sqlx
//!
//! # Contract
//!
//! - Missing entities are `Ok(None)`, never an error. The caller decides
//!   what that means on the wire.
//! - Deletes are idempotent: deleting an unknown id succeeds.
//! - Deleting a product removes every cart item that references it.
//! - Deleting a category deletes its products, and through them their
//!   cart items.
//! - `add_to_cart` always inserts a new line; identical
//!   `(session, product, size)` lines are not merged.
//! - Input is assumed valid. Validation belongs to the route layer.
//! - Lists come back in ascending id order.

pub mod memory;
pub mod seed;

use async_trait::async_trait;
use thiserror::Error;

use boutique_core::{
    CartItem, CartItemId, Category, CategoryId, NewCartItem, NewCategory, NewProduct, Product,
    ProductId,
};

pub use memory::MemoryStore;

/// Errors that can occur during store operations.
///
/// The in-memory store never produces these.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be decoded into a domain entity.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Storage contract for categories, products and cart items.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    // =========================================================================
    // Products
    // =========================================================================

    /// List every product.
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    /// Get a product by id.
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// List the products of a category.
    ///
    /// An unknown category yields an empty list.
    async fn list_products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, StoreError>;

    /// Create a product and assign it an id.
    async fn create_product(&self, input: NewProduct) -> Result<Product, StoreError>;

    /// Replace every mutable field of a product, keeping its id.
    async fn update_product(
        &self,
        id: ProductId,
        input: NewProduct,
    ) -> Result<Option<Product>, StoreError>;

    /// Delete a product and every cart item that references it.
    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError>;

    // =========================================================================
    // Categories
    // =========================================================================

    /// List every category.
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    /// Get a category by id.
    async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, StoreError>;

    /// Create a category and assign it an id.
    async fn create_category(&self, input: NewCategory) -> Result<Category, StoreError>;

    /// Replace every mutable field of a category, keeping its id.
    async fn update_category(
        &self,
        id: CategoryId,
        input: NewCategory,
    ) -> Result<Option<Category>, StoreError>;

    /// Delete a category, its products, and their cart items.
    async fn delete_category(&self, id: CategoryId) -> Result<(), StoreError>;

    // =========================================================================
    // Cart
    // =========================================================================

    /// List the cart items of one session.
    async fn list_cart_items(&self, session_id: &str) -> Result<Vec<CartItem>, StoreError>;

    /// Append a new cart line.
    async fn add_to_cart(&self, input: NewCartItem) -> Result<CartItem, StoreError>;

    /// Set the quantity of a cart line.
    ///
    /// The store does not clamp; callers reject quantities below one.
    async fn update_cart_item_quantity(
        &self,
        id: CartItemId,
        quantity: i32,
    ) -> Result<Option<CartItem>, StoreError>;

    /// Remove a cart line.
    async fn remove_from_cart(&self, id: CartItemId) -> Result<(), StoreError>;

    /// Check that the backing storage is reachable.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
