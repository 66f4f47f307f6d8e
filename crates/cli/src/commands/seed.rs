//! Seed the storefront database with the fixture catalog.
//!
//! Refuses to run against a database that already has categories unless
//! `--force` is given, since seeding twice duplicates the catalog.

use tracing::info;

use boutique_storefront::db::PgCatalogStore;
use boutique_storefront::store::{CatalogStore, seed};

use super::{CommandError, connect};

/// Counts of what a seed run inserted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories: usize,
    pub products: usize,
}

/// Insert the fixture catalog.
///
/// # Errors
///
/// Returns `CommandError::Refused` if the catalog is not empty and `force`
/// is false, or a database error if inserting fails.
pub async fn run(force: bool) -> Result<(), CommandError> {
    let pool = connect().await?;
    let store = PgCatalogStore::new(pool);

    let existing = store.list_categories().await?.len();
    if existing > 0 && !force {
        return Err(CommandError::Refused(format!(
            "catalog already has {existing} categories; pass --force to seed anyway"
        )));
    }

    let summary = seed_catalog(&store).await?;
    info!(
        categories = summary.categories,
        products = summary.products,
        "Seeding complete"
    );
    Ok(())
}

/// Insert every fixture category and its products through `store`.
///
/// # Errors
///
/// Returns the first `StoreError` encountered.
pub async fn seed_catalog(
    store: &dyn CatalogStore,
) -> Result<SeedSummary, boutique_storefront::store::StoreError> {
    let mut summary = SeedSummary::default();

    for fixture in seed::catalog() {
        let category = store.create_category(fixture.category).await?;
        summary.categories += 1;

        for product in fixture.products {
            store
                .create_product(product.into_new_product(category.id))
                .await?;
            summary.products += 1;
        }
        info!(category = %category.name, "Seeded category");
    }

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use boutique_storefront::store::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_seed_catalog_inserts_all_fixtures() {
        let store = MemoryStore::new();
        let summary = seed_catalog(&store).await.unwrap();

        let fixtures = seed::catalog();
        let expected_products: usize = fixtures.iter().map(|c| c.products.len()).sum();
        assert_eq!(summary.categories, fixtures.len());
        assert_eq!(summary.products, expected_products);
        assert_eq!(store.list_products().await.unwrap().len(), expected_products);
    }
}
