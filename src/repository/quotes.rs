//! Quote repository - composite operations spanning quotes and their line
//! items.
//!
//! `add_quote_with_items` is the only way a quote comes into existence with
//! items attached: quote and items are written inside one transaction, so a
//! failing item insert rolls the quote back and never leaves an orphan.
//! Quotes and quote items share one change feed; a committed mutation to
//! either table re-emits every quote live query.

use crate::entities::{quote, quote_item, Client, Quote, QuoteItem, QuoteStatus};
use crate::errors::{Error, Result};
use crate::store::{ChangeFeed, LiveQuery, Store};
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Field set for inserting a new quote
#[derive(Clone, Debug)]
pub struct NewQuote {
    /// Explicit id; leave `None` to let the store assign one
    pub id: Option<i64>,
    /// Client this quote is issued to; must exist at write time
    pub client_id: i64,
    /// Initial lifecycle state
    pub status: QuoteStatus,
    /// Caller-computed total to cache on the row
    pub total_amount: f64,
    /// Free-form notes
    pub notes: String,
}

/// Field set for inserting a new line item
#[derive(Clone, Debug)]
pub struct NewQuoteItem {
    /// Explicit id; leave `None` to let the store assign one
    pub id: Option<i64>,
    /// Owning quote; ignored by `add_quote_with_items`, which assigns the
    /// freshly inserted quote's id instead
    pub quote_id: i64,
    /// Quoted product; must exist at write time
    pub product_id: i64,
    /// Number of units; must be greater than zero
    pub quantity: i32,
    /// Price per unit; must be finite and not negative
    pub unit_price: f64,
}

/// A quote plus its line items, item id ascending
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteWithItems {
    /// The quote row as stored
    pub quote: quote::Model,
    /// Line items in insertion order
    pub items: Vec<quote_item::Model>,
}

impl QuoteWithItems {
    /// Sum of item subtotals. Trust this over the cached
    /// `quote.total_amount` column, which callers maintain by hand.
    #[must_use]
    pub fn total_amount(&self) -> f64 {
        self.items.iter().map(|item| item.subtotal).sum()
    }
}

/// Data access for quotes and their items. Cheap to clone; all clones share
/// one store.
#[derive(Debug, Clone)]
pub struct QuoteRepository {
    store: Store,
}

impl QuoteRepository {
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
        &self.store.feeds().quotes
    }

    fn live_with_items(
        &self,
        client_id: Option<i64>,
        status: Option<QuoteStatus>,
    ) -> LiveQuery<QuoteWithItems> {
        let db = self.store.db_handle();
        LiveQuery::new(
            self.feed().subscribe(),
            Box::new(move || {
                let db = db.clone();
                Box::pin(async move { load_with_items(&*db, client_id, status).await })
            }),
        )
    }

    /// Inserts a quote and all of its items in one transaction and returns
    /// the assigned quote id. If any item insert fails, the quote insert is
    /// rolled back too; this operation never persists an orphan quote. Once
    /// started it runs to completion or rolls back, there is no mid-flight
    /// cancellation.
    ///
    /// # Errors
    /// `Error::Validation` on a bad draft, `Error::ForeignKey` when the
    /// client or a product row is missing, `Error::Constraint` on a taken
    /// id, `Error::Storage` when the store fails.
    pub async fn add_quote_with_items(
        &self,
        draft: NewQuote,
        items: Vec<NewQuoteItem>,
    ) -> Result<i64> {
        validate_total(draft.total_amount)?;
        for item in &items {
            validate_item(item.quantity, item.unit_price)?;
        }

        let txn = self.db().begin().await?;

        // the client must exist at write time; returning early drops the
        // transaction and rolls back
        if Client::find_by_id(draft.client_id).one(&txn).await?.is_none() {
            return Err(Error::ForeignKey {
                message: format!("quote references missing client {}", draft.client_id),
            });
        }

        let now = Utc::now();
        let quote = quote::ActiveModel {
            id: draft.id.map_or(NotSet, Set),
            client_id: Set(draft.client_id),
            status: Set(draft.status.as_str().to_string()),
            total_amount: Set(draft.total_amount),
            notes: Set(draft.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let quote = quote.insert(&txn).await?;

        let item_count = items.len();
        for item in items {
            insert_item(&txn, quote.id, item).await?;
        }

        txn.commit().await?;
        info!(quote_id = quote.id, items = item_count, "created quote");
        self.feed().mark_changed();
        Ok(quote.id)
    }

    /// The quote with its items, or `Ok(None)` when the id is absent
    pub async fn with_items_by_id(&self, id: i64) -> Result<Option<QuoteWithItems>> {
        let Some(quote) = Quote::find_by_id(id).one(self.db()).await? else {
            return Ok(None);
        };
        let items = quote
            .find_related(QuoteItem)
            .order_by_asc(quote_item::Column::Id)
            .all(self.db())
            .await?;
        Ok(Some(QuoteWithItems { quote, items }))
    }

    /// Every quote with its items, newest first, re-emitted on every
    /// committed change to quotes or quote items
    #[must_use]
    pub fn all_with_items(&self) -> LiveQuery<QuoteWithItems> {
        self.live_with_items(None, None)
    }

    /// One client's quotes with items, newest first
    #[must_use]
    pub fn by_client(&self, client_id: i64) -> LiveQuery<QuoteWithItems> {
        self.live_with_items(Some(client_id), None)
    }

    /// Quotes with items in one lifecycle state, newest first
    #[must_use]
    pub fn by_status(&self, status: QuoteStatus) -> LiveQuery<QuoteWithItems> {
        self.live_with_items(None, Some(status))
    }

    /// Plain quote rows without items, newest first
    #[must_use]
    pub fn all(&self) -> LiveQuery<quote::Model> {
        let db = self.store.db_handle();
        LiveQuery::new(
            self.feed().subscribe(),
            Box::new(move || {
                let db = db.clone();
                Box::pin(async move {
                    Quote::find()
                        .order_by_desc(quote::Column::CreatedAt)
                        .order_by_desc(quote::Column::Id)
                        .all(&*db)
                        .await
                        .map_err(Into::into)
                })
            }),
        )
    }

    /// Single quote row by id; a missing row is `Ok(None)`, not an error
    pub async fn by_id(&self, id: i64) -> Result<Option<quote::Model>> {
        Quote::find_by_id(id).one(self.db()).await.map_err(Into::into)
    }

    /// Full-row replace by id; `updated_at` is bumped, `created_at` kept.
    /// The cached `total_amount` is written as given, never recomputed.
    ///
    /// # Errors
    /// `Error::NotFound` when the id is absent; `Error::Validation` on an
    /// unrecognized status string or a bad total.
    pub async fn update(&self, quote: quote::Model) -> Result<quote::Model> {
        QuoteStatus::parse(&quote.status)?;
        validate_total(quote.total_amount)?;

        if Quote::find_by_id(quote.id).one(self.db()).await?.is_none() {
            return Err(Error::NotFound {
                entity: "quote",
                id: quote.id,
            });
        }

        let replacement = quote::ActiveModel {
            id: Set(quote.id),
            client_id: Set(quote.client_id),
            status: Set(quote.status),
            total_amount: Set(quote.total_amount),
            notes: Set(quote.notes),
            created_at: Set(quote.created_at),
            updated_at: Set(Utc::now()),
        };

        let updated = replacement.update(self.db()).await?;
        info!(quote_id = updated.id, "updated quote");
        self.feed().mark_changed();
        Ok(updated)
    }

    /// Removes the quote and, by cascade, all of its items.
    ///
    /// # Errors
    /// `Error::NotFound` when the id is absent.
    pub async fn delete(&self, id: i64) -> Result<()> {
        if Quote::find_by_id(id).one(self.db()).await?.is_none() {
            return Err(Error::NotFound {
                entity: "quote",
                id,
            });
        }

        Quote::delete_by_id(id).exec(self.db()).await?;
        info!(quote_id = id, "deleted quote");
        self.feed().mark_changed();
        Ok(())
    }

    /// Adds one item to an existing quote and returns the assigned item id.
    /// The cached `total_amount` on the quote is not touched.
    ///
    /// # Errors
    /// `Error::Validation` on a bad draft; `Error::ForeignKey` when the
    /// quote or product row is missing.
    pub async fn add_item(&self, draft: NewQuoteItem) -> Result<i64> {
        validate_item(draft.quantity, draft.unit_price)?;

        let quote_id = draft.quote_id;
        let item = insert_item(self.db(), quote_id, draft).await?;
        info!(quote_id, item_id = item.id, "added quote item");
        self.feed().mark_changed();
        Ok(item.id)
    }

    /// Full-row replace of one item. `subtotal` is written exactly as
    /// given; it was fixed at insertion time and is never re-derived here.
    ///
    /// # Errors
    /// `Error::NotFound` when the id is absent; `Error::Validation` on a
    /// quantity below one or a bad unit price.
    pub async fn update_item(&self, item: quote_item::Model) -> Result<quote_item::Model> {
        validate_item(item.quantity, item.unit_price)?;

        if QuoteItem::find_by_id(item.id)
            .one(self.db())
            .await?
            .is_none()
        {
            return Err(Error::NotFound {
                entity: "quote item",
                id: item.id,
            });
        }

        let replacement = quote_item::ActiveModel {
            id: Set(item.id),
            quote_id: Set(item.quote_id),
            product_id: Set(item.product_id),
            quantity: Set(item.quantity),
            unit_price: Set(item.unit_price),
            subtotal: Set(item.subtotal),
        };

        let updated = replacement.update(self.db()).await?;
        info!(item_id = updated.id, "updated quote item");
        self.feed().mark_changed();
        Ok(updated)
    }

    /// Removes one item. The cached `total_amount` on the quote is not
    /// touched.
    ///
    /// # Errors
    /// `Error::NotFound` when the id is absent.
    pub async fn delete_item(&self, id: i64) -> Result<()> {
        if QuoteItem::find_by_id(id).one(self.db()).await?.is_none() {
            return Err(Error::NotFound {
                entity: "quote item",
                id,
            });
        }

        QuoteItem::delete_by_id(id).exec(self.db()).await?;
        info!(item_id = id, "deleted quote item");
        self.feed().mark_changed();
        Ok(())
    }

    /// One quote's items, id ascending
    pub async fn items_by_quote(&self, quote_id: i64) -> Result<Vec<quote_item::Model>> {
        QuoteItem::find()
            .filter(quote_item::Column::QuoteId.eq(quote_id))
            .order_by_asc(quote_item::Column::Id)
            .all(self.db())
            .await
            .map_err(Into::into)
    }

    /// Number of items on one quote
    pub async fn item_count(&self, quote_id: i64) -> Result<u64> {
        QuoteItem::find()
            .filter(quote_item::Column::QuoteId.eq(quote_id))
            .count(self.db())
            .await
            .map_err(Into::into)
    }

    /// Number of quotes, every status included
    pub async fn count(&self) -> Result<u64> {
        Quote::find().count(self.db()).await.map_err(Into::into)
    }
}

/// Inserts one line item, computing `subtotal` from the draft. Runs against
/// a plain connection or an open transaction.
async fn insert_item<C>(conn: &C, quote_id: i64, draft: NewQuoteItem) -> Result<quote_item::Model>
where
    C: ConnectionTrait,
{
    let subtotal = f64::from(draft.quantity) * draft.unit_price;
    let item = quote_item::ActiveModel {
        id: draft.id.map_or(NotSet, Set),
        quote_id: Set(quote_id),
        product_id: Set(draft.product_id),
        quantity: Set(draft.quantity),
        unit_price: Set(draft.unit_price),
        subtotal: Set(subtotal),
    };
    item.insert(conn).await.map_err(Into::into)
}

async fn load_with_items<C>(
    conn: &C,
    client_id: Option<i64>,
    status: Option<QuoteStatus>,
) -> Result<Vec<QuoteWithItems>>
where
    C: ConnectionTrait,
{
    let mut query = Quote::find().find_with_related(QuoteItem);
    if let Some(client_id) = client_id {
        query = query.filter(quote::Column::ClientId.eq(client_id));
    }
    if let Some(status) = status {
        query = query.filter(quote::Column::Status.eq(status.as_str()));
    }

    let rows = query
        .order_by_desc(quote::Column::CreatedAt)
        .order_by_desc(quote::Column::Id)
        .order_by_asc(quote_item::Column::Id)
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(quote, items)| QuoteWithItems { quote, items })
        .collect())
}

fn validate_total(total: f64) -> Result<()> {
    if !total.is_finite() || total < 0.0 {
        return Err(Error::Validation {
            message: format!("quote total must be finite and not negative, got {total}"),
        });
    }
    Ok(())
}

fn validate_item(quantity: i32, unit_price: f64) -> Result<()> {
    if quantity <= 0 {
        return Err(Error::Validation {
            message: format!("item quantity must be greater than zero, got {quantity}"),
        });
    }
    if !unit_price.is_finite() || unit_price < 0.0 {
        return Err(Error::Validation {
            message: format!("item unit price must be finite and not negative, got {unit_price}"),
        });
    }
    Ok(())
}
