//! Product repository - CRUD, live listings, substring search, and catalog
//! seeding for products.
//!
//! Products are delete-restricted: a hard delete fails with a foreign key
//! violation while any quote item still references the product. Deactivation
//! is the soft alternative for discontinued items.

use crate::config::settings::CatalogProduct;
use crate::entities::{product, Product, ProductCategory};
use crate::errors::{Error, Result};
use crate::store::{ChangeFeed, LiveQuery, RowLoader, Store};
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tracing::info;

/// Field set for inserting a new product
#[derive(Clone, Debug)]
pub struct NewProduct {
    /// Explicit id; leave `None` to let the store assign one
    pub id: Option<i64>,
    /// Product name; must not be blank
    pub name: String,
    /// Longer description shown in catalogs
    pub description: String,
    /// Unit price; must be finite and not negative
    pub price: f64,
    /// Closed category set
    pub category: ProductCategory,
    /// Optional reference to a product image
    pub image_url: Option<String>,
}

/// Data access for products. Cheap to clone; all clones share one store.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    store: Store,
}

impl ProductRepository {
    /// Creates a repository over the given store
    #[must_use]
    pub fn new(store: &Store) -> Self {
        Self {
            store: store.clone(),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.store.db()
    }

    fn feed(&self) -> &ChangeFeed {
        &self.store.feeds().products
    }

    fn live(&self, load: RowLoader<product::Model>) -> LiveQuery<product::Model> {
        LiveQuery::new(self.feed().subscribe(), load)
    }

    /// Active products ordered by name, re-emitted on every committed change
    #[must_use]
    pub fn all_active(&self) -> LiveQuery<product::Model> {
        let db = self.store.db_handle();
        self.live(Box::new(move || {
            let db = db.clone();
            Box::pin(async move {
                Product::find()
                    .filter(product::Column::IsActive.eq(true))
                    .order_by_asc(product::Column::Name)
                    .all(&*db)
                    .await
                    .map_err(Into::into)
            })
        }))
    }

    /// Every product, inactive ones included, ordered by name
    #[must_use]
    pub fn all(&self) -> LiveQuery<product::Model> {
        let db = self.store.db_handle();
        self.live(Box::new(move || {
            let db = db.clone();
            Box::pin(async move {
                Product::find()
                    .order_by_asc(product::Column::Name)
                    .all(&*db)
                    .await
                    .map_err(Into::into)
            })
        }))
    }

    /// Active products in one category, ordered by name
    #[must_use]
    pub fn by_category(&self, category: ProductCategory) -> LiveQuery<product::Model> {
        let db = self.store.db_handle();
        self.live(Box::new(move || {
            let db = db.clone();
            Box::pin(async move {
                Product::find()
                    .filter(product::Column::IsActive.eq(true))
                    .filter(product::Column::Category.eq(category.as_str()))
                    .order_by_asc(product::Column::Name)
                    .all(&*db)
                    .await
                    .map_err(Into::into)
            })
        }))
    }

    /// Case-insensitive substring search over the name, active rows only.
    /// A blank query yields an empty result set, not the full table.
    #[must_use]
    pub fn search(&self, query: &str) -> LiveQuery<product::Model> {
        let pattern = query.trim().to_string();
        let db = self.store.db_handle();
        self.live(Box::new(move || {
            let db = db.clone();
            let pattern = pattern.clone();
            Box::pin(async move {
                if pattern.is_empty() {
                    return Ok(Vec::new());
                }
                Product::find()
                    .filter(product::Column::IsActive.eq(true))
                    .filter(product::Column::Name.contains(&pattern))
                    .order_by_asc(product::Column::Name)
                    .all(&*db)
                    .await
                    .map_err(Into::into)
            })
        }))
    }

    /// One-shot bounded search for the debounced pipeline
    ///
    /// # Errors
    /// Returns `Error::Storage` when the query fails.
    pub async fn search_page(&self, query: &str, limit: u64) -> Result<Vec<product::Model>> {
        let pattern = query.trim();
        if pattern.is_empty() {
            return Ok(Vec::new());
        }
        Product::find()
            .filter(product::Column::IsActive.eq(true))
            .filter(product::Column::Name.contains(pattern))
            .order_by_asc(product::Column::Name)
            .limit(limit)
            .all(self.db())
            .await
            .map_err(Into::into)
    }

    /// Single read by id; a missing row is `Ok(None)`, not an error
    pub async fn by_id(&self, id: i64) -> Result<Option<product::Model>> {
        Product::find_by_id(id)
            .one(self.db())
            .await
            .map_err(Into::into)
    }

    /// Inserts a new product and returns the assigned id.
    ///
    /// # Errors
    /// `Error::Validation` on a blank name or a negative/non-finite price;
    /// `Error::Constraint` when the draft carries an id that is taken.
    pub async fn save(&self, draft: NewProduct) -> Result<i64> {
        validate_name_and_price(&draft.name, draft.price)?;

        let now = Utc::now();
        let product = product::ActiveModel {
            id: draft.id.map_or(NotSet, Set),
            name: Set(draft.name.trim().to_string()),
            description: Set(draft.description),
            price: Set(draft.price),
            category: Set(draft.category.as_str().to_string()),
            is_active: Set(true),
            image_url: Set(draft.image_url),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = product.insert(self.db()).await?;
        info!(product_id = inserted.id, name = %inserted.name, "created product");
        self.feed().mark_changed();
        Ok(inserted.id)
    }

    /// Full-row replace by id; `updated_at` is bumped, `created_at` kept.
    ///
    /// # Errors
    /// `Error::NotFound` when the id is absent; `Error::Validation` on a
    /// blank name, bad price, or an unrecognized category string.
    pub async fn update(&self, product: product::Model) -> Result<product::Model> {
        validate_name_and_price(&product.name, product.price)?;
        ProductCategory::parse(&product.category)?;

        if Product::find_by_id(product.id)
            .one(self.db())
            .await?
            .is_none()
        {
            return Err(Error::NotFound {
                entity: "product",
                id: product.id,
            });
        }

        let replacement = product::ActiveModel {
            id: Set(product.id),
            name: Set(product.name.trim().to_string()),
            description: Set(product.description),
            price: Set(product.price),
            category: Set(product.category),
            is_active: Set(product.is_active),
            image_url: Set(product.image_url),
            created_at: Set(product.created_at),
            updated_at: Set(Utc::now()),
        };

        let updated = replacement.update(self.db()).await?;
        info!(product_id = updated.id, "updated product");
        self.feed().mark_changed();
        Ok(updated)
    }

    /// Hard delete.
    ///
    /// # Errors
    /// `Error::ForeignKey` while any quote item still references this
    /// product; `Error::NotFound` when the id is absent.
    pub async fn delete(&self, id: i64) -> Result<()> {
        if Product::find_by_id(id).one(self.db()).await?.is_none() {
            return Err(Error::NotFound {
                entity: "product",
                id,
            });
        }

        Product::delete_by_id(id).exec(self.db()).await?;
        info!(product_id = id, "deleted product");
        self.feed().mark_changed();
        Ok(())
    }

    /// Soft-deactivates a product so it disappears from default listings
    pub async fn deactivate(&self, id: i64) -> Result<product::Model> {
        self.set_active(id, false).await
    }

    /// Brings a deactivated product back
    pub async fn activate(&self, id: i64) -> Result<product::Model> {
        self.set_active(id, true).await
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<product::Model> {
        let Some(product) = Product::find_by_id(id).one(self.db()).await? else {
            return Err(Error::NotFound {
                entity: "product",
                id,
            });
        };

        let mut product: product::ActiveModel = product.into();
        product.is_active = Set(active);
        product.updated_at = Set(Utc::now());

        let updated = product.update(self.db()).await?;
        info!(product_id = id, active, "toggled product active flag");
        self.feed().mark_changed();
        Ok(updated)
    }

    /// Number of active products
    pub async fn count(&self) -> Result<u64> {
        Product::find()
            .filter(product::Column::IsActive.eq(true))
            .count(self.db())
            .await
            .map_err(Into::into)
    }

    /// Seeds the catalog from config, skipping names already present.
    /// Returns how many products were inserted.
    ///
    /// # Errors
    /// `Error::Validation` when an entry carries an unknown category string
    /// or fails draft validation.
    pub async fn seed_catalog(&self, catalog: &[CatalogProduct]) -> Result<u64> {
        let mut inserted = 0;
        for entry in catalog {
            let category = ProductCategory::parse(&entry.category)?;
            let exists = Product::find()
                .filter(product::Column::Name.eq(entry.name.as_str()))
                .one(self.db())
                .await?
                .is_some();
            if exists {
                continue;
            }

            self.save(NewProduct {
                id: None,
                name: entry.name.clone(),
                description: entry.description.clone(),
                price: entry.price,
                category,
                image_url: None,
            })
            .await?;
            info!(name = %entry.name, "seeded catalog product");
            inserted += 1;
        }
        Ok(inserted)
    }
}

fn validate_name_and_price(name: &str, price: f64) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "product name cannot be empty".to_string(),
        });
    }
    if !price.is_finite() || price < 0.0 {
        return Err(Error::Validation {
            message: format!("product price must be finite and not negative, got {price}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{
        create_custom_product, create_test_client, create_test_product, item_draft,
        setup_test_repos, test_product_draft,
    };

    #[tokio::test]
    async fn test_save_and_fetch_round_trip() -> Result<()> {
        let repos = setup_test_repos().await?;
        let id = repos.products.save(test_product_draft()).await?;

        let product = repos.products.by_id(id).await?.unwrap();
        assert_eq!(product.name, "Canvas banner 1x2m");
        assert_eq!(product.category, "textile");
        assert_eq!(product.price, 350.0);
        assert!(product.is_active);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_rejects_negative_price() -> Result<()> {
        let repos = setup_test_repos().await?;
        let mut draft = test_product_draft();
        draft.price = -1.0;

        let err = repos.products.save(draft).await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_rejects_unknown_category_string() -> Result<()> {
        let repos = setup_test_repos().await?;
        let mut product = create_test_product(&repos).await?;
        product.category = "vehicles".to_string();

        let err = repos.products.update(product).await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_unreferenced_product_succeeds() -> Result<()> {
        let repos = setup_test_repos().await?;
        let product = create_test_product(&repos).await?;

        repos.products.delete(product.id).await?;
        assert!(repos.products.by_id(product.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_referenced_product_fails_and_changes_nothing() -> Result<()> {
        let repos = setup_test_repos().await?;
        let client = create_test_client(&repos).await?;
        let product = create_test_product(&repos).await?;
        let quote_id = repos
            .quotes
            .add_quote_with_items(
                crate::test_utils::test_quote_draft(client.id),
                vec![item_draft(product.id, 2, 350.0)],
            )
            .await?;

        let err = repos.products.delete(product.id).await.unwrap_err();
        assert!(matches!(err, Error::ForeignKey { .. }));

        // nothing was deleted
        assert!(repos.products.by_id(product.id).await?.is_some());
        let quote = repos.quotes.with_items_by_id(quote_id).await?.unwrap();
        assert_eq!(quote.items.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_search_is_scoped_to_active_products() -> Result<()> {
        let repos = setup_test_repos().await?;
        let banner = create_custom_product(&repos, "Canvas banner", 350.0).await?;
        create_custom_product(&repos, "Canvas tote", 120.0).await?;
        repos.products.deactivate(banner.id).await?;

        let hits = repos.products.search("canvas").next().await?;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Canvas tote");
        Ok(())
    }

    #[tokio::test]
    async fn test_by_category_filters() -> Result<()> {
        let repos = setup_test_repos().await?;
        create_test_product(&repos).await?; // textile
        let mut draft = test_product_draft();
        draft.name = "Installation visit".to_string();
        draft.category = ProductCategory::Service;
        repos.products.save(draft).await?;

        let services = repos
            .products
            .by_category(ProductCategory::Service)
            .next()
            .await?;
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].category, "service");
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_catalog_inserts_missing_and_skips_existing() -> Result<()> {
        let repos = setup_test_repos().await?;
        let catalog = vec![
            CatalogProduct {
                name: "Canvas banner 1x2m".to_string(),
                description: "Printed canvas banner".to_string(),
                price: 350.0,
                category: "textile".to_string(),
            },
            CatalogProduct {
                name: "Installation visit".to_string(),
                description: String::new(),
                price: 500.0,
                category: "service".to_string(),
            },
        ];

        assert_eq!(repos.products.seed_catalog(&catalog).await?, 2);
        // a second run finds everything in place
        assert_eq!(repos.products.seed_catalog(&catalog).await?, 0);
        assert_eq!(repos.products.count().await?, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_catalog_rejects_unknown_category() -> Result<()> {
        let repos = setup_test_repos().await?;
        let catalog = vec![CatalogProduct {
            name: "Mystery item".to_string(),
            description: String::new(),
            price: 10.0,
            category: "mystery".to_string(),
        }];

        let err = repos.products.seed_catalog(&catalog).await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        Ok(())
    }
}
