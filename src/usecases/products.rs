//! Product catalog operations, one per domain verb.

use crate::config::settings::CatalogProduct;
use crate::entities::{product, ProductCategory};
use crate::errors::Result;
use crate::repository::{NewProduct, ProductRepository};
use crate::store::LiveQuery;

/// Active products, name ascending, re-emitted on every committed change
#[must_use]
pub fn watch_active_products(repo: &ProductRepository) -> LiveQuery<product::Model> {
    repo.all_active()
}

/// Every product including deactivated ones
#[must_use]
pub fn watch_all_products(repo: &ProductRepository) -> LiveQuery<product::Model> {
    repo.all()
}

/// Active products in one category
#[must_use]
pub fn watch_products_by_category(
    repo: &ProductRepository,
    category: ProductCategory,
) -> LiveQuery<product::Model> {
    repo.by_category(category)
}

/// Live substring search over the product name
#[must_use]
pub fn watch_product_search(repo: &ProductRepository, query: &str) -> LiveQuery<product::Model> {
    repo.search(query)
}

/// One-shot bounded search for the search pipeline
pub async fn search_products_page(
    repo: &ProductRepository,
    query: &str,
    limit: u64,
) -> Result<Vec<product::Model>> {
    repo.search_page(query, limit).await
}

/// Single product by id; absent ids read as `None`
pub async fn get_product(repo: &ProductRepository, id: i64) -> Result<Option<product::Model>> {
    repo.by_id(id).await
}

/// Inserts a new product and returns its assigned id
pub async fn create_product(repo: &ProductRepository, draft: NewProduct) -> Result<i64> {
    repo.save(draft).await
}

/// Full-row replace of one product
pub async fn update_product(
    repo: &ProductRepository,
    product: product::Model,
) -> Result<product::Model> {
    repo.update(product).await
}

/// Hard delete; refused while any quote item references the product
pub async fn delete_product(repo: &ProductRepository, id: i64) -> Result<()> {
    repo.delete(id).await
}

/// Soft-deactivates a product; existing quote items keep referencing it
pub async fn deactivate_product(repo: &ProductRepository, id: i64) -> Result<product::Model> {
    repo.deactivate(id).await
}

/// Brings a deactivated product back
pub async fn activate_product(repo: &ProductRepository, id: i64) -> Result<product::Model> {
    repo.activate(id).await
}

/// Number of active products
pub async fn count_products(repo: &ProductRepository) -> Result<u64> {
    repo.count().await
}

/// Inserts the configured catalog entries that are not present yet and
/// returns how many were added
pub async fn seed_product_catalog(
    repo: &ProductRepository,
    catalog: &[CatalogProduct],
) -> Result<u64> {
    repo.seed_catalog(catalog).await
}
