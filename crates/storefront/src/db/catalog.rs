//! `PostgreSQL` implementation of the catalog store.
//!
//! Ids come from `SERIAL` columns. Cascade deletes are done here rather than
//! by foreign keys, inside a transaction so a failure part-way leaves no
//! orphaned products or cart items behind.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, instrument};

use boutique_core::{
    CartItem, CartItemId, Category, CategoryId, NewCartItem, NewCategory, NewProduct, Price,
    Product, ProductId,
};

use super::codec::{decode_lists, encode_lists};
use crate::store::{CatalogStore, StoreError};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    description: String,
    image: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
            description: row.description,
            image: row.image,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: String,
    price: Decimal,
    image: String,
    images: String,
    videos: String,
    category_id: i32,
    size_stock: String,
    media_encoding: i16,
}

impl TryFrom<ProductRow> for Product {
    type Error = StoreError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let lists = decode_lists(row.media_encoding, &row.images, &row.videos, &row.size_stock)?;
        let price = Price::new(row.price).map_err(|e| {
            StoreError::DataCorruption(format!("invalid price for product {}: {e}", row.id))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price,
            image: row.image,
            images: lists.images,
            videos: lists.videos,
            category_id: CategoryId::new(row.category_id),
            size_stock: lists.size_stock,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    id: i32,
    product_id: i32,
    quantity: i32,
    session_id: String,
    size: String,
    created_at: DateTime<Utc>,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        Self {
            id: CartItemId::new(row.id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            session_id: row.session_id,
            size: row.size,
            created_at: row.created_at,
        }
    }
}

fn decode_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, StoreError> {
    rows.into_iter().map(Product::try_from).collect()
}

// =============================================================================
// Store
// =============================================================================

/// `PostgreSQL`-backed [`CatalogStore`].
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    // =========================================================================
    // Products
    // =========================================================================

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price, image, images, videos,
                   category_id, size_stock, media_encoding
            FROM catalog.product
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        decode_products(rows)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price, image, images, videos,
                   category_id, size_stock, media_encoding
            FROM catalog.product
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    async fn list_products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price, image, images, videos,
                   category_id, size_stock, media_encoding
            FROM catalog.product
            WHERE category_id = $1
            ORDER BY id
            ",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        decode_products(rows)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn create_product(&self, input: NewProduct) -> Result<Product, StoreError> {
        let lists = encode_lists(&input.images, &input.videos, &input.size_stock)?;

        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO catalog.product
                (name, description, price, image, images, videos,
                 category_id, size_stock, media_encoding)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, name, description, price, image, images, videos,
                      category_id, size_stock, media_encoding
            ",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price.amount())
        .bind(&input.image)
        .bind(&lists.images)
        .bind(&lists.videos)
        .bind(input.category_id)
        .bind(&lists.size_stock)
        .bind(lists.version)
        .fetch_one(&self.pool)
        .await?;

        debug!(id = row.id, "Inserted product");
        Product::try_from(row)
    }

    #[instrument(skip(self, input))]
    async fn update_product(
        &self,
        id: ProductId,
        input: NewProduct,
    ) -> Result<Option<Product>, StoreError> {
        let lists = encode_lists(&input.images, &input.videos, &input.size_stock)?;

        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE catalog.product
            SET name = $2,
                description = $3,
                price = $4,
                image = $5,
                images = $6,
                videos = $7,
                category_id = $8,
                size_stock = $9,
                media_encoding = $10
            WHERE id = $1
            RETURNING id, name, description, price, image, images, videos,
                      category_id, size_stock, media_encoding
            ",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price.amount())
        .bind(&input.image)
        .bind(&lists.images)
        .bind(&lists.videos)
        .bind(input.category_id)
        .bind(&lists.size_stock)
        .bind(lists.version)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let items = sqlx::query::<sqlx::Postgres>(
            r"
            DELETE FROM catalog.cart_item
            WHERE product_id = $1
            ",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query::<sqlx::Postgres>(
            r"
            DELETE FROM catalog.product
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(removed_items = items.rows_affected(), "Deleted product");
        Ok(())
    }

    // =========================================================================
    // Categories
    // =========================================================================

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, description, image
            FROM catalog.category
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, description, image
            FROM catalog.category
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Category::from))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn create_category(&self, input: NewCategory) -> Result<Category, StoreError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            INSERT INTO catalog.category (name, description, image)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, image
            ",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.image)
        .fetch_one(&self.pool)
        .await?;

        debug!(id = row.id, "Inserted category");
        Ok(row.into())
    }

    #[instrument(skip(self, input))]
    async fn update_category(
        &self,
        id: CategoryId,
        input: NewCategory,
    ) -> Result<Option<Category>, StoreError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            UPDATE catalog.category
            SET name = $2, description = $3, image = $4
            WHERE id = $1
            RETURNING id, name, description, image
            ",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.image)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Category::from))
    }

    #[instrument(skip(self))]
    async fn delete_category(&self, id: CategoryId) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let items = sqlx::query::<sqlx::Postgres>(
            r"
            DELETE FROM catalog.cart_item
            WHERE product_id IN (
                SELECT id FROM catalog.product WHERE category_id = $1
            )
            ",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let products = sqlx::query::<sqlx::Postgres>(
            r"
            DELETE FROM catalog.product
            WHERE category_id = $1
            ",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query::<sqlx::Postgres>(
            r"
            DELETE FROM catalog.category
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(
            removed_products = products.rows_affected(),
            removed_items = items.rows_affected(),
            "Deleted category"
        );
        Ok(())
    }

    // =========================================================================
    // Cart
    // =========================================================================

    async fn list_cart_items(&self, session_id: &str) -> Result<Vec<CartItem>, StoreError> {
        let rows = sqlx::query_as::<_, CartItemRow>(
            r"
            SELECT id, product_id, quantity, session_id, size, created_at
            FROM catalog.cart_item
            WHERE session_id = $1
            ORDER BY id
            ",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CartItem::from).collect())
    }

    #[instrument(skip(self, input), fields(product_id = %input.product_id))]
    async fn add_to_cart(&self, input: NewCartItem) -> Result<CartItem, StoreError> {
        let row = sqlx::query_as::<_, CartItemRow>(
            r"
            INSERT INTO catalog.cart_item (product_id, quantity, session_id, size)
            VALUES ($1, $2, $3, $4)
            RETURNING id, product_id, quantity, session_id, size, created_at
            ",
        )
        .bind(input.product_id)
        .bind(input.quantity)
        .bind(&input.session_id)
        .bind(&input.size)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn update_cart_item_quantity(
        &self,
        id: CartItemId,
        quantity: i32,
    ) -> Result<Option<CartItem>, StoreError> {
        let row = sqlx::query_as::<_, CartItemRow>(
            r"
            UPDATE catalog.cart_item
            SET quantity = $2
            WHERE id = $1
            RETURNING id, product_id, quantity, session_id, size, created_at
            ",
        )
        .bind(id)
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CartItem::from))
    }

    #[instrument(skip(self))]
    async fn remove_from_cart(&self, id: CartItemId) -> Result<(), StoreError> {
        sqlx::query::<sqlx::Postgres>(
            r"
            DELETE FROM catalog.cart_item
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product_row(media_encoding: i16, price: Decimal) -> ProductRow {
        ProductRow {
            id: 4,
            name: "Shoe".to_string(),
            description: String::new(),
            price,
            image: "x".to_string(),
            images: r#"["x"]"#.to_string(),
            videos: "[]".to_string(),
            category_id: 2,
            size_stock: r#"[{"size":"M","stock":5}]"#.to_string(),
            media_encoding,
        }
    }

    #[test]
    fn test_product_row_converts_to_domain() {
        let product = Product::try_from(product_row(1, Decimal::new(1000, 2))).unwrap();
        assert_eq!(product.id, ProductId::new(4));
        assert_eq!(product.category_id, CategoryId::new(2));
        assert_eq!(product.price.to_string(), "10.00");
        assert_eq!(product.images, vec!["x"]);
        assert!(!product.is_sold_out());
    }

    #[test]
    fn test_product_row_with_negative_price_is_corruption() {
        let err = Product::try_from(product_row(1, Decimal::new(-1, 0))).unwrap_err();
        assert!(matches!(err, StoreError::DataCorruption(_)));
    }

    #[test]
    fn test_product_row_with_unknown_encoding_is_corruption() {
        let err = Product::try_from(product_row(9, Decimal::ONE)).unwrap_err();
        assert!(matches!(err, StoreError::DataCorruption(_)));
    }

    #[test]
    fn test_cart_item_row_converts_to_domain() {
        let created_at = Utc::now();
        let item = CartItem::from(CartItemRow {
            id: 1,
            product_id: 3,
            quantity: 2,
            session_id: "s1".to_string(),
            size: "M".to_string(),
            created_at,
        });
        assert_eq!(item.product_id, ProductId::new(3));
        assert_eq!(item.created_at, created_at);
    }
}
