//! Store contract tests.
//!
//! Every check runs against a fresh in-memory store. The `PostgreSQL` run
//! needs a disposable database in `DATABASE_URL`; it truncates the catalog
//! tables between checks.

#![allow(clippy::unwrap_used)]

use boutique_integration_tests::contract;
use boutique_storefront::store::MemoryStore;

// =============================================================================
// In-Memory Store
// =============================================================================

#[tokio::test]
async fn memory_created_product_reads_back() {
    contract::created_product_reads_back(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_category_delete_cascades() {
    contract::category_delete_cascades(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_product_delete_clears_cart_lines() {
    contract::product_delete_clears_cart_lines(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_quantity_update_is_exact() {
    contract::quantity_update_is_exact(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_sessions_are_isolated() {
    contract::sessions_are_isolated(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_deletes_are_idempotent() {
    contract::deletes_are_idempotent(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_add_to_cart_never_merges() {
    contract::add_to_cart_never_merges(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_updates_replace_or_report_missing() {
    contract::updates_replace_or_report_missing(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_lists_are_ordered_by_id() {
    contract::lists_are_ordered_by_id(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_storefront_walkthrough() {
    contract::storefront_walkthrough(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_sold_out_detection() {
    contract::sold_out_detection(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_large_prices_round_trip() {
    contract::large_prices_round_trip(&MemoryStore::new()).await;
}

// =============================================================================
// PostgreSQL Store
// =============================================================================

mod postgres {
    use boutique_integration_tests::contract;
    use boutique_storefront::db::{self, PgCatalogStore};
    use boutique_storefront::store::CatalogStore;
    use secrecy::SecretString;
    use sqlx::PgPool;

    async fn connect() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = db::create_pool(&SecretString::from(url)).await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        pool
    }

    async fn reset(pool: &PgPool) {
        sqlx::query(
            "TRUNCATE catalog.cart_item, catalog.product, catalog.category RESTART IDENTITY",
        )
        .execute(pool)
        .await
        .unwrap();
    }

    // One test so checks never race on the shared tables.
    #[tokio::test]
    #[ignore = "Requires PostgreSQL (DATABASE_URL)"]
    async fn postgres_store_satisfies_contract() {
        let pool = connect().await;
        let store = PgCatalogStore::new(pool.clone());
        let store: &dyn CatalogStore = &store;

        reset(&pool).await;
        contract::created_product_reads_back(store).await;
        reset(&pool).await;
        contract::category_delete_cascades(store).await;
        reset(&pool).await;
        contract::product_delete_clears_cart_lines(store).await;
        reset(&pool).await;
        contract::quantity_update_is_exact(store).await;
        reset(&pool).await;
        contract::sessions_are_isolated(store).await;
        reset(&pool).await;
        contract::deletes_are_idempotent(store).await;
        reset(&pool).await;
        contract::add_to_cart_never_merges(store).await;
        reset(&pool).await;
        contract::updates_replace_or_report_missing(store).await;
        reset(&pool).await;
        contract::lists_are_ordered_by_id(store).await;
        reset(&pool).await;
        contract::storefront_walkthrough(store).await;
        reset(&pool).await;
        contract::sold_out_detection(store).await;
        reset(&pool).await;
        contract::large_prices_round_trip(store).await;

        store.ping().await.unwrap();
        rejects_unknown_media_encoding(&pool, store).await;
    }

    async fn rejects_unknown_media_encoding(pool: &PgPool, store: &dyn CatalogStore) {
        reset(pool).await;
        let category = store
            .create_category(contract::category("Test"))
            .await
            .unwrap();
        let product = store
            .create_product(contract::product("Shoe", category.id, &[("M", 1)]))
            .await
            .unwrap();

        sqlx::query("UPDATE catalog.product SET media_encoding = 99 WHERE id = $1")
            .bind(product.id)
            .execute(pool)
            .await
            .unwrap();

        let err = store.get_product(product.id).await.unwrap_err();
        assert!(err.to_string().contains("media encoding"));
    }
}
