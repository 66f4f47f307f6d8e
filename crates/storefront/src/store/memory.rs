//! In-memory catalog store for development and testing.
//!
//! One ordered map per entity family plus one id counter per family. Counters
//! belong to the store instance and only ever move forward, so ids are never
//! reused within a store's lifetime, even after deletes.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, instrument};

use boutique_core::{
    CartItem, CartItemId, Category, CategoryId, NewCartItem, NewCategory, NewProduct, Product,
    ProductId,
};

use super::seed;
use super::{CatalogStore, StoreError};

/// In-memory implementation of [`CatalogStore`].
///
/// Every call takes the lock once, so a cascade delete is observed by other
/// callers either entirely or not at all.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

#[derive(Debug)]
struct Collections {
    categories: BTreeMap<CategoryId, Category>,
    products: BTreeMap<ProductId, Product>,
    cart_items: BTreeMap<CartItemId, CartItem>,
    next_category_id: i32,
    next_product_id: i32,
    next_cart_item_id: i32,
}

impl Default for Collections {
    fn default() -> Self {
        Self {
            categories: BTreeMap::new(),
            products: BTreeMap::new(),
            cart_items: BTreeMap::new(),
            next_category_id: 1,
            next_product_id: 1,
            next_cart_item_id: 1,
        }
    }
}

impl Collections {
    fn insert_category(&mut self, input: NewCategory) -> Category {
        let id = CategoryId::new(self.next_category_id);
        self.next_category_id += 1;
        let category = input.with_id(id);
        self.categories.insert(id, category.clone());
        category
    }

    fn insert_product(&mut self, input: NewProduct) -> Product {
        let id = ProductId::new(self.next_product_id);
        self.next_product_id += 1;
        let product = input.with_id(id);
        self.products.insert(id, product.clone());
        product
    }

    fn insert_cart_item(&mut self, input: NewCartItem) -> CartItem {
        let id = CartItemId::new(self.next_cart_item_id);
        self.next_cart_item_id += 1;
        let item = input.with_id(id, Utc::now());
        self.cart_items.insert(id, item.clone());
        item
    }

    /// Remove a product and its cart items. Returns the number of cart items removed.
    fn remove_product(&mut self, id: ProductId) -> usize {
        let dependents: Vec<CartItemId> = self
            .cart_items
            .values()
            .filter(|item| item.product_id == id)
            .map(|item| item.id)
            .collect();

        for item_id in &dependents {
            self.cart_items.remove(item_id);
        }
        self.products.remove(&id);

        dependents.len()
    }
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store preloaded with the fixture catalog.
    #[must_use]
    pub fn seeded() -> Self {
        let mut collections = Collections::default();

        for fixture in seed::catalog() {
            let category = collections.insert_category(fixture.category);
            for product in fixture.products {
                collections.insert_product(product.into_new_product(category.id));
            }
        }

        debug!(
            categories = collections.categories.len(),
            products = collections.products.len(),
            "Seeded in-memory store"
        );

        Self {
            inner: RwLock::new(collections),
        }
    }

    #[cfg(test)]
    fn cart_item_count(&self) -> usize {
        self.inner.read().cart_items.len()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.inner.read().products.values().cloned().collect())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.inner.read().products.get(&id).cloned())
    }

    async fn list_products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, StoreError> {
        Ok(self
            .inner
            .read()
            .products
            .values()
            .filter(|product| product.category_id == category_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn create_product(&self, input: NewProduct) -> Result<Product, StoreError> {
        Ok(self.inner.write().insert_product(input))
    }

    #[instrument(skip(self, input))]
    async fn update_product(
        &self,
        id: ProductId,
        input: NewProduct,
    ) -> Result<Option<Product>, StoreError> {
        let mut inner = self.inner.write();
        let Some(existing) = inner.products.get_mut(&id) else {
            return Ok(None);
        };
        *existing = input.with_id(id);
        Ok(Some(existing.clone()))
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        let removed_items = self.inner.write().remove_product(id);
        debug!(removed_items, "Deleted product");
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.inner.read().categories.values().cloned().collect())
    }

    async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        Ok(self.inner.read().categories.get(&id).cloned())
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn create_category(&self, input: NewCategory) -> Result<Category, StoreError> {
        Ok(self.inner.write().insert_category(input))
    }

    #[instrument(skip(self, input))]
    async fn update_category(
        &self,
        id: CategoryId,
        input: NewCategory,
    ) -> Result<Option<Category>, StoreError> {
        let mut inner = self.inner.write();
        let Some(existing) = inner.categories.get_mut(&id) else {
            return Ok(None);
        };
        *existing = input.with_id(id);
        Ok(Some(existing.clone()))
    }

    #[instrument(skip(self))]
    async fn delete_category(&self, id: CategoryId) -> Result<(), StoreError> {
        let mut inner = self.inner.write();

        let products: Vec<ProductId> = inner
            .products
            .values()
            .filter(|product| product.category_id == id)
            .map(|product| product.id)
            .collect();

        let mut removed_items = 0;
        for product_id in &products {
            removed_items += inner.remove_product(*product_id);
        }
        inner.categories.remove(&id);

        debug!(
            removed_products = products.len(),
            removed_items, "Deleted category"
        );
        Ok(())
    }

    async fn list_cart_items(&self, session_id: &str) -> Result<Vec<CartItem>, StoreError> {
        Ok(self
            .inner
            .read()
            .cart_items
            .values()
            .filter(|item| item.session_id == session_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self, input), fields(product_id = %input.product_id))]
    async fn add_to_cart(&self, input: NewCartItem) -> Result<CartItem, StoreError> {
        Ok(self.inner.write().insert_cart_item(input))
    }

    #[instrument(skip(self))]
    async fn update_cart_item_quantity(
        &self,
        id: CartItemId,
        quantity: i32,
    ) -> Result<Option<CartItem>, StoreError> {
        let mut inner = self.inner.write();
        let Some(item) = inner.cart_items.get_mut(&id) else {
            return Ok(None);
        };
        item.quantity = quantity;
        Ok(Some(item.clone()))
    }

    #[instrument(skip(self))]
    async fn remove_from_cart(&self, id: CartItemId) -> Result<(), StoreError> {
        self.inner.write().cart_items.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use boutique_core::SizeStock;

    use super::*;

    fn new_category(name: &str) -> NewCategory {
        NewCategory {
            name: name.to_string(),
            description: "d".to_string(),
            image: "x".to_string(),
        }
    }

    fn new_product(category_id: CategoryId) -> NewProduct {
        NewProduct {
            name: "Shoe".to_string(),
            description: String::new(),
            price: "10.00".parse().unwrap(),
            image: "x".to_string(),
            images: vec!["x".to_string()],
            videos: vec![],
            category_id,
            size_stock: vec![SizeStock::new("M", 5)],
        }
    }

    fn new_item(product_id: ProductId, session: &str) -> NewCartItem {
        NewCartItem {
            product_id,
            quantity: 1,
            session_id: session.to_string(),
            size: "M".to_string(),
        }
    }

    #[tokio::test]
    async fn test_ids_start_at_one_per_family() {
        let store = MemoryStore::new();
        let category = store.create_category(new_category("Test")).await.unwrap();
        let product = store.create_product(new_product(category.id)).await.unwrap();
        let item = store.add_to_cart(new_item(product.id, "s1")).await.unwrap();

        assert_eq!(category.id, CategoryId::new(1));
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(item.id, CartItemId::new(1));
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = MemoryStore::new();
        let first = store.create_category(new_category("A")).await.unwrap();
        store.delete_category(first.id).await.unwrap();
        let second = store.create_category(new_category("B")).await.unwrap();

        assert_eq!(second.id, CategoryId::new(2));
    }

    #[tokio::test]
    async fn test_fresh_instances_do_not_share_counters() {
        let a = MemoryStore::new();
        let b = MemoryStore::new();
        a.create_category(new_category("A")).await.unwrap();
        let from_b = b.create_category(new_category("B")).await.unwrap();

        assert_eq!(from_b.id, CategoryId::new(1));
    }

    #[tokio::test]
    async fn test_update_missing_product_returns_none() {
        let store = MemoryStore::new();
        let result = store
            .update_product(ProductId::new(99), new_product(CategoryId::new(1)))
            .await
            .unwrap();
        assert!(result.is_none());
        assert!(store.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_product_replaces_all_fields() {
        let store = MemoryStore::new();
        let created = store.create_product(new_product(CategoryId::new(1))).await.unwrap();

        let mut replacement = new_product(CategoryId::new(2));
        replacement.name = "Boot".to_string();
        replacement.images = vec![];
        replacement.size_stock = vec![SizeStock::new("L", 0)];

        let updated = store
            .update_product(created.id, replacement.clone())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated, replacement.with_id(created.id));
    }

    #[tokio::test]
    async fn test_delete_category_cascades_two_levels() {
        let store = MemoryStore::new();
        let keep = store.create_category(new_category("Keep")).await.unwrap();
        let drop = store.create_category(new_category("Drop")).await.unwrap();
        let kept_product = store.create_product(new_product(keep.id)).await.unwrap();
        let dropped_product = store.create_product(new_product(drop.id)).await.unwrap();
        store.add_to_cart(new_item(kept_product.id, "s1")).await.unwrap();
        store.add_to_cart(new_item(dropped_product.id, "s1")).await.unwrap();
        store.add_to_cart(new_item(dropped_product.id, "s2")).await.unwrap();

        store.delete_category(drop.id).await.unwrap();

        assert!(store.get_category(drop.id).await.unwrap().is_none());
        assert!(store.get_product(dropped_product.id).await.unwrap().is_none());
        assert!(store.get_product(kept_product.id).await.unwrap().is_some());
        assert_eq!(store.cart_item_count(), 1);
    }

    #[tokio::test]
    async fn test_seeded_store_has_fixture_catalog() {
        let store = MemoryStore::seeded();
        let categories = store.list_categories().await.unwrap();
        let products = store.list_products().await.unwrap();

        assert_eq!(categories.len(), seed::catalog().len());
        assert!(products.iter().any(Product::is_sold_out));
        assert!(products.iter().any(|p| !p.is_sold_out()));
        for product in &products {
            assert!(categories.iter().any(|c| c.id == product.category_id));
        }
    }
}
