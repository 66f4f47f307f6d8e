//! Catalog and cart domain types.
//!
//! All entities serialize with camelCase field names, which is the JSON
//! shape the storefront API speaks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CartItemId, CategoryId, Price, ProductId};

/// Maximum number of gallery images a product may carry.
pub const MAX_PRODUCT_IMAGES: usize = 10;

/// Maximum number of videos a product may carry.
pub const MAX_PRODUCT_VIDEOS: usize = 5;

// =============================================================================
// Category
// =============================================================================

/// A product grouping (previously called a brand).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    /// URL or embedded data URI.
    pub image: String,
}

/// Input for creating or fully replacing a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub image: String,
}

impl NewCategory {
    /// Attach an id, producing the stored entity.
    #[must_use]
    pub fn with_id(self, id: CategoryId) -> Category {
        Category {
            id,
            name: self.name,
            description: self.description,
            image: self.image,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// Stock on hand for one size variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizeStock {
    pub size: String,
    pub stock: u32,
}

impl SizeStock {
    /// Create a size entry.
    #[must_use]
    pub fn new(size: impl Into<String>, stock: u32) -> Self {
        Self {
            size: size.into(),
            stock,
        }
    }

    /// Whether this size can be purchased.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    /// Primary display image.
    pub image: String,
    /// Gallery images; the first entry conventionally mirrors `image`.
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub category_id: CategoryId,
    pub size_stock: Vec<SizeStock>,
}

impl Product {
    /// A product is sold out when no size has stock, including when it
    /// has no sizes at all.
    #[must_use]
    pub fn is_sold_out(&self) -> bool {
        !self.size_stock.iter().any(SizeStock::in_stock)
    }

    /// Whether the given size exists and has stock.
    #[must_use]
    pub fn is_available_in(&self, size: &str) -> bool {
        self.size_stock
            .iter()
            .any(|entry| entry.size == size && entry.in_stock())
    }

    /// Sizes that can currently be purchased, in listing order.
    #[must_use]
    pub fn available_sizes(&self) -> Vec<&str> {
        self.size_stock
            .iter()
            .filter(|entry| entry.in_stock())
            .map(|entry| entry.size.as_str())
            .collect()
    }

    /// Total units across all sizes.
    #[must_use]
    pub fn total_stock(&self) -> u64 {
        self.size_stock.iter().map(|entry| u64::from(entry.stock)).sum()
    }
}

/// Input for creating or fully replacing a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
    pub category_id: CategoryId,
    #[serde(default)]
    pub size_stock: Vec<SizeStock>,
}

impl NewProduct {
    /// Attach an id, producing the stored entity.
    #[must_use]
    pub fn with_id(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            image: self.image,
            images: self.images,
            videos: self.videos,
            category_id: self.category_id,
            size_stock: self.size_stock,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A line in a visitor's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub quantity: i32,
    /// Opaque per-visitor token; the only tenancy boundary.
    pub session_id: String,
    pub size: String,
    pub created_at: DateTime<Utc>,
}

/// Input for adding a line to a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub product_id: ProductId,
    pub quantity: i32,
    pub session_id: String,
    pub size: String,
}

impl NewCartItem {
    /// Attach an id and creation time, producing the stored entity.
    #[must_use]
    pub fn with_id(self, id: CartItemId, created_at: DateTime<Utc>) -> CartItem {
        CartItem {
            id,
            product_id: self.product_id,
            quantity: self.quantity,
            session_id: self.session_id,
            size: self.size,
            created_at,
        }
    }
}
