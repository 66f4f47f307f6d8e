//! Behavior every `CatalogStore` must share.
//!
//! Each check expects an empty store whose id counters start at 1 and
//! panics on the first violation.

use boutique_core::{
    CartItemId, CategoryId, NewCartItem, NewCategory, NewProduct, Product, ProductId, SizeStock,
};
use boutique_storefront::store::CatalogStore;

// =============================================================================
// Fixtures
// =============================================================================

#[must_use]
pub fn category(name: &str) -> NewCategory {
    NewCategory {
        name: name.to_string(),
        description: "d".to_string(),
        image: "x".to_string(),
    }
}

#[must_use]
pub fn product(name: &str, category_id: CategoryId, sizes: &[(&str, u32)]) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: String::new(),
        price: "10.00".parse().unwrap(),
        image: "x".to_string(),
        images: vec!["x".to_string()],
        videos: vec![],
        category_id,
        size_stock: sizes
            .iter()
            .map(|(size, stock)| SizeStock::new(*size, *stock))
            .collect(),
    }
}

#[must_use]
pub fn cart_line(product_id: ProductId, session: &str, quantity: i32) -> NewCartItem {
    NewCartItem {
        product_id,
        quantity,
        session_id: session.to_string(),
        size: "M".to_string(),
    }
}

// =============================================================================
// Checks
// =============================================================================

/// A created product reads back as its input plus the assigned id.
pub async fn created_product_reads_back(store: &dyn CatalogStore) {
    let category = store.create_category(category("Test")).await.unwrap();
    let mut input = product("Shoe", category.id, &[("M", 5), ("L", 0)]);
    input.images = vec!["a.jpg".to_string(), "b.jpg".to_string()];
    input.videos = vec!["/uploads/videos/1-abc.mp4".to_string()];

    let created = store.create_product(input.clone()).await.unwrap();
    let fetched = store.get_product(created.id).await.unwrap().unwrap();

    assert_eq!(fetched, input.with_id(created.id));
    assert_eq!(fetched, created);
}

/// Deleting a category removes its products and leaves others alone.
pub async fn category_delete_cascades(store: &dyn CatalogStore) {
    let doomed = store.create_category(category("Doomed")).await.unwrap();
    let kept = store.create_category(category("Kept")).await.unwrap();
    let p1 = store.create_product(product("A", doomed.id, &[])).await.unwrap();
    let p2 = store.create_product(product("B", doomed.id, &[])).await.unwrap();
    let survivor = store.create_product(product("C", kept.id, &[])).await.unwrap();
    store.add_to_cart(cart_line(p1.id, "s1", 1)).await.unwrap();
    store.add_to_cart(cart_line(survivor.id, "s1", 1)).await.unwrap();

    store.delete_category(doomed.id).await.unwrap();

    assert!(store.get_category(doomed.id).await.unwrap().is_none());
    assert!(store.list_products_by_category(doomed.id).await.unwrap().is_empty());
    assert!(store.get_product(p1.id).await.unwrap().is_none());
    assert!(store.get_product(p2.id).await.unwrap().is_none());
    assert!(store.get_product(survivor.id).await.unwrap().is_some());

    let lines = store.list_cart_items("s1").await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].product_id, survivor.id);
}

/// Deleting a product removes its cart lines from every session.
pub async fn product_delete_clears_cart_lines(store: &dyn CatalogStore) {
    let category = store.create_category(category("Test")).await.unwrap();
    let doomed = store.create_product(product("A", category.id, &[])).await.unwrap();
    let other = store.create_product(product("B", category.id, &[])).await.unwrap();
    for session in ["s1", "s2", "s3"] {
        store.add_to_cart(cart_line(doomed.id, session, 1)).await.unwrap();
    }
    store.add_to_cart(cart_line(other.id, "s2", 2)).await.unwrap();

    store.delete_product(doomed.id).await.unwrap();

    for session in ["s1", "s2", "s3"] {
        let lines = store.list_cart_items(session).await.unwrap();
        assert!(lines.iter().all(|line| line.product_id != doomed.id));
    }
    assert_eq!(store.list_cart_items("s2").await.unwrap().len(), 1);
}

/// Quantity updates are exact and visible on the next read.
pub async fn quantity_update_is_exact(store: &dyn CatalogStore) {
    let category = store.create_category(category("Test")).await.unwrap();
    let shoe = store.create_product(product("Shoe", category.id, &[])).await.unwrap();
    let line = store.add_to_cart(cart_line(shoe.id, "s1", 1)).await.unwrap();

    for quantity in [1, 7, 250] {
        let updated = store
            .update_cart_item_quantity(line.id, quantity)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.quantity, quantity);

        let listed = store.list_cart_items("s1").await.unwrap();
        assert_eq!(listed[0].quantity, quantity);
    }

    let missing = store
        .update_cart_item_quantity(CartItemId::new(9_999), 2)
        .await
        .unwrap();
    assert!(missing.is_none());
}

/// A session never sees another session's lines.
pub async fn sessions_are_isolated(store: &dyn CatalogStore) {
    let category = store.create_category(category("Test")).await.unwrap();
    let shoe = store.create_product(product("Shoe", category.id, &[])).await.unwrap();
    store.add_to_cart(cart_line(shoe.id, "s1", 1)).await.unwrap();
    store.add_to_cart(cart_line(shoe.id, "s1", 2)).await.unwrap();
    store.add_to_cart(cart_line(shoe.id, "s2", 3)).await.unwrap();

    let s1 = store.list_cart_items("s1").await.unwrap();
    let s2 = store.list_cart_items("s2").await.unwrap();

    assert_eq!(s1.len(), 2);
    assert_eq!(s2.len(), 1);
    assert!(s1.iter().all(|line| line.session_id == "s1"));
    assert!(s2.iter().all(|line| line.session_id == "s2"));
    assert!(s1.iter().all(|a| s2.iter().all(|b| a.id != b.id)));
    assert!(store.list_cart_items("nobody").await.unwrap().is_empty());
}

/// Deleting twice is the same as deleting once.
pub async fn deletes_are_idempotent(store: &dyn CatalogStore) {
    let category = store.create_category(category("Test")).await.unwrap();
    let shoe = store.create_product(product("Shoe", category.id, &[])).await.unwrap();
    let boot = store.create_product(product("Boot", category.id, &[])).await.unwrap();
    store.add_to_cart(cart_line(shoe.id, "s1", 1)).await.unwrap();
    let kept_line = store.add_to_cart(cart_line(boot.id, "s1", 1)).await.unwrap();

    store.delete_product(shoe.id).await.unwrap();
    let products_once = store.list_products().await.unwrap();
    let lines_once = store.list_cart_items("s1").await.unwrap();

    store.delete_product(shoe.id).await.unwrap();
    assert_eq!(store.list_products().await.unwrap(), products_once);
    assert_eq!(store.list_cart_items("s1").await.unwrap(), lines_once);

    store.delete_product(ProductId::new(9_999)).await.unwrap();
    store.delete_category(CategoryId::new(9_999)).await.unwrap();
    store.remove_from_cart(CartItemId::new(9_999)).await.unwrap();

    store.remove_from_cart(kept_line.id).await.unwrap();
    store.remove_from_cart(kept_line.id).await.unwrap();
    assert!(store.list_cart_items("s1").await.unwrap().is_empty());
}

/// Adding the same product and size twice yields two lines.
pub async fn add_to_cart_never_merges(store: &dyn CatalogStore) {
    let category = store.create_category(category("Test")).await.unwrap();
    let shoe = store.create_product(product("Shoe", category.id, &[])).await.unwrap();

    let first = store.add_to_cart(cart_line(shoe.id, "s1", 1)).await.unwrap();
    let second = store.add_to_cart(cart_line(shoe.id, "s1", 1)).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(store.list_cart_items("s1").await.unwrap().len(), 2);
}

/// Updates replace whole entities; unknown ids change nothing.
pub async fn updates_replace_or_report_missing(store: &dyn CatalogStore) {
    let original = store.create_category(category("Old")).await.unwrap();
    let mut replacement = category("New");
    replacement.description = "fresh".to_string();

    let updated = store
        .update_category(original.id, replacement.clone())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated, replacement.with_id(original.id));

    assert!(
        store
            .update_category(CategoryId::new(9_999), category("Ghost"))
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        store
            .update_product(ProductId::new(9_999), product("Ghost", original.id, &[]))
            .await
            .unwrap()
            .is_none()
    );
    assert_eq!(store.list_categories().await.unwrap().len(), 1);
    assert!(store.list_products().await.unwrap().is_empty());
}

/// Lists come back in ascending id order.
pub async fn lists_are_ordered_by_id(store: &dyn CatalogStore) {
    for name in ["C", "A", "B"] {
        store.create_category(category(name)).await.unwrap();
    }
    let ids: Vec<i32> = store
        .list_categories()
        .await
        .unwrap()
        .iter()
        .map(|c| c.id.as_i32())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

/// Category, product, cart line, quantity change, product delete.
pub async fn storefront_walkthrough(store: &dyn CatalogStore) {
    let category = store.create_category(category("Test")).await.unwrap();
    assert_eq!(category.id, CategoryId::new(1));

    let shoe = store
        .create_product(product("Shoe", category.id, &[("M", 5)]))
        .await
        .unwrap();
    assert_eq!(shoe.id, ProductId::new(1));
    assert_eq!(shoe.price.to_string(), "10.00");

    let line = store.add_to_cart(cart_line(shoe.id, "s1", 1)).await.unwrap();
    assert_eq!(line.id, CartItemId::new(1));
    assert_eq!(line.quantity, 1);

    let line = store
        .update_cart_item_quantity(line.id, 3)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(line.quantity, 3);

    store.delete_product(shoe.id).await.unwrap();
    assert!(store.list_cart_items("s1").await.unwrap().is_empty());
}

/// Sold-out state survives storage and drives per-size availability.
pub async fn sold_out_detection(store: &dyn CatalogStore) {
    let category = store.create_category(category("Test")).await.unwrap();
    let sold_out = store
        .create_product(product("Gone", category.id, &[("M", 0)]))
        .await
        .unwrap();
    let partial = store
        .create_product(product("Some", category.id, &[("M", 0), ("L", 2)]))
        .await
        .unwrap();

    let sold_out: Product = store.get_product(sold_out.id).await.unwrap().unwrap();
    let partial: Product = store.get_product(partial.id).await.unwrap().unwrap();

    assert!(sold_out.is_sold_out());
    assert!(!sold_out.is_available_in("M"));
    assert!(!partial.is_sold_out());
    assert!(!partial.is_available_in("M"));
    assert!(partial.is_available_in("L"));
    assert_eq!(partial.available_sizes(), vec!["L"]);
}

/// Prices far above everyday amounts are stored without loss.
pub async fn large_prices_round_trip(store: &dyn CatalogStore) {
    let category = store.create_category(category("Test")).await.unwrap();
    let mut input = product("Yacht", category.id, &[("One", 1)]);
    input.price = "100000000000.5".parse().unwrap();

    let created = store.create_product(input).await.unwrap();
    let fetched = store.get_product(created.id).await.unwrap().unwrap();

    assert_eq!(fetched.price.to_string(), "100000000000.50");
    assert_eq!(fetched, created);
}
