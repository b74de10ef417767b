//! Shared test utilities.
//!
//! This module provides draft builders with sensible defaults and setup
//! functions that wire repositories to a fresh in-memory store.

use crate::entities::{client, product, ClientKind, ProductCategory, QuoteStatus};
use crate::errors::{Error, Result};
use crate::repository::{NewClient, NewProduct, NewQuote, NewQuoteItem, Repositories};
use crate::store::Store;

/// Creates repositories over a fresh in-memory `SQLite` store with all
/// tables initialized. This is the standard setup for all integration tests.
pub async fn setup_test_repos() -> Result<Repositories> {
    let store = Store::in_memory().await?;
    Ok(Repositories::new(&store))
}

/// A client draft with sensible defaults.
///
/// # Defaults
/// * `name`: "Acme Industrial"
/// * `email`: "compras@acme.test"
/// * `kind`: [`ClientKind::Company`]
#[must_use]
pub fn test_client_draft() -> NewClient {
    NewClient {
        id: None,
        name: "Acme Industrial".to_string(),
        email: "compras@acme.test".to_string(),
        phone: "555 0100".to_string(),
        address: "Av. Siempre Viva 742".to_string(),
        city: "Monterrey".to_string(),
        state: "NL".to_string(),
        kind: ClientKind::Company,
    }
}

/// Saves the default client draft and returns the stored row.
pub async fn create_test_client(repos: &Repositories) -> Result<client::Model> {
    let id = repos.clients.save(test_client_draft()).await?;
    fetch_client(repos, id).await
}

/// Saves a client with a custom name and email.
/// Use this when a test needs several distinguishable clients.
pub async fn create_custom_client(
    repos: &Repositories,
    name: &str,
    email: &str,
) -> Result<client::Model> {
    let mut draft = test_client_draft();
    draft.name = name.to_string();
    draft.email = email.to_string();
    let id = repos.clients.save(draft).await?;
    fetch_client(repos, id).await
}

/// A product draft with sensible defaults.
///
/// # Defaults
/// * `name`: "Canvas banner 1x2m"
/// * `price`: 350.0
/// * `category`: [`ProductCategory::Textile`]
#[must_use]
pub fn test_product_draft() -> NewProduct {
    NewProduct {
        id: None,
        name: "Canvas banner 1x2m".to_string(),
        description: "Full color print, reinforced edges".to_string(),
        price: 350.0,
        category: ProductCategory::Textile,
        image_url: None,
    }
}

/// Saves the default product draft and returns the stored row.
pub async fn create_test_product(repos: &Repositories) -> Result<product::Model> {
    let id = repos.products.save(test_product_draft()).await?;
    fetch_product(repos, id).await
}

/// Saves a product with a custom name and price.
pub async fn create_custom_product(
    repos: &Repositories,
    name: &str,
    price: f64,
) -> Result<product::Model> {
    let mut draft = test_product_draft();
    draft.name = name.to_string();
    draft.price = price;
    let id = repos.products.save(draft).await?;
    fetch_product(repos, id).await
}

/// A quote draft for the given client.
///
/// # Defaults
/// * `status`: [`QuoteStatus::Pending`]
/// * `total_amount`: 0.0
#[must_use]
pub fn test_quote_draft(client_id: i64) -> NewQuote {
    NewQuote {
        id: None,
        client_id,
        status: QuoteStatus::Pending,
        total_amount: 0.0,
        notes: "Entrega en dos semanas".to_string(),
    }
}

/// A line item draft. The `quote_id` is left at zero; callers attaching the
/// item to an existing quote set it themselves, and `add_quote_with_items`
/// overrides it with the freshly inserted quote's id.
#[must_use]
pub fn item_draft(product_id: i64, quantity: i32, unit_price: f64) -> NewQuoteItem {
    NewQuoteItem {
        id: None,
        quote_id: 0,
        product_id,
        quantity,
        unit_price,
    }
}

async fn fetch_client(repos: &Repositories, id: i64) -> Result<client::Model> {
    repos.clients.by_id(id).await?.ok_or(Error::NotFound {
        entity: "client",
        id,
    })
}

async fn fetch_product(repos: &Repositories, id: i64) -> Result<product::Model> {
    repos.products.by_id(id).await?.ok_or(Error::NotFound {
        entity: "product",
        id,
    })
}
