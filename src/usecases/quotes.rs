//! Quote operations, one per domain verb.
//!
//! `create_quote` is the only composite: it delegates to
//! `add_quote_with_items` so a failing item insert rolls the whole quote
//! back.

use crate::entities::{quote, quote_item, QuoteStatus};
use crate::errors::Result;
use crate::repository::{NewQuote, NewQuoteItem, QuoteRepository, QuoteWithItems};
use crate::store::LiveQuery;

/// Inserts a quote and its items atomically and returns the quote id
pub async fn create_quote(
    repo: &QuoteRepository,
    draft: NewQuote,
    items: Vec<NewQuoteItem>,
) -> Result<i64> {
    repo.add_quote_with_items(draft, items).await
}

/// One quote with its items; absent ids read as `None`
pub async fn get_quote_with_items(
    repo: &QuoteRepository,
    id: i64,
) -> Result<Option<QuoteWithItems>> {
    repo.with_items_by_id(id).await
}

/// Every quote with items, newest first
#[must_use]
pub fn watch_quotes_with_items(repo: &QuoteRepository) -> LiveQuery<QuoteWithItems> {
    repo.all_with_items()
}

/// One client's quotes with items
#[must_use]
pub fn watch_quotes_by_client(repo: &QuoteRepository, client_id: i64) -> LiveQuery<QuoteWithItems> {
    repo.by_client(client_id)
}

/// Quotes with items in one lifecycle state
#[must_use]
pub fn watch_quotes_by_status(
    repo: &QuoteRepository,
    status: QuoteStatus,
) -> LiveQuery<QuoteWithItems> {
    repo.by_status(status)
}

/// Single quote row by id
pub async fn get_quote(repo: &QuoteRepository, id: i64) -> Result<Option<quote::Model>> {
    repo.by_id(id).await
}

/// Full-row replace of one quote
pub async fn update_quote(repo: &QuoteRepository, quote: quote::Model) -> Result<quote::Model> {
    repo.update(quote).await
}

/// Removes a quote and, by cascade, its items
pub async fn delete_quote(repo: &QuoteRepository, id: i64) -> Result<()> {
    repo.delete(id).await
}

/// Adds one item to an existing quote and returns its assigned id
pub async fn add_quote_item(repo: &QuoteRepository, draft: NewQuoteItem) -> Result<i64> {
    repo.add_item(draft).await
}

/// Full-row replace of one item; the stored subtotal is written as given
pub async fn update_quote_item(
    repo: &QuoteRepository,
    item: quote_item::Model,
) -> Result<quote_item::Model> {
    repo.update_item(item).await
}

/// Removes one item from its quote
pub async fn delete_quote_item(repo: &QuoteRepository, id: i64) -> Result<()> {
    repo.delete_item(id).await
}

/// One quote's items in insertion order
pub async fn get_quote_items(
    repo: &QuoteRepository,
    quote_id: i64,
) -> Result<Vec<quote_item::Model>> {
    repo.items_by_quote(quote_id).await
}

/// Number of quotes across every status
pub async fn count_quotes(repo: &QuoteRepository) -> Result<u64> {
    repo.count().await
}
