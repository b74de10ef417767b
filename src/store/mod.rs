//! The entity store - one database connection plus the change feeds that
//! back every live query.
//!
//! A [`Store`] is constructed once by the composition root and cloned into
//! each repository; all clones share the same connection pool and feeds.
//! Quotes and quote items share a feed because the quote aggregate spans
//! both tables, and a cascade touching one always concerns the other.

mod live;

pub use live::LiveQuery;
pub(crate) use live::{ChangeFeed, RowLoader};

use crate::config::database::{create_connection, create_tables};
use crate::errors::Result;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::info;

/// One change feed per watched table group
#[derive(Debug, Clone)]
pub(crate) struct Feeds {
    /// Committed mutations of `clients`
    pub(crate) clients: ChangeFeed,
    /// Committed mutations of `products`
    pub(crate) products: ChangeFeed,
    /// Committed mutations of `quotes` or `quote_items`
    pub(crate) quotes: ChangeFeed,
}

impl Feeds {
    fn new() -> Self {
        Self {
            clients: ChangeFeed::new(),
            products: ChangeFeed::new(),
            quotes: ChangeFeed::new(),
        }
    }
}

/// Durable relational storage for clients, products, quotes, and quote
/// items. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Store {
    db: Arc<DatabaseConnection>,
    feeds: Feeds,
}

impl Store {
    /// Connects to the given database URL and creates missing tables and
    /// indices.
    ///
    /// # Errors
    /// Returns `Error::Storage` when the connection or the DDL fails.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let db = create_connection(database_url).await?;
        create_tables(&db).await?;
        info!("entity store ready");
        Ok(Self::from_connection(db))
    }

    /// An in-memory store with all tables created, for tests and scratch
    /// work.
    ///
    /// # Errors
    /// Returns `Error::Storage` when table creation fails.
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:").await
    }

    /// Wraps an already-established connection without touching the schema.
    pub(crate) fn from_connection(db: DatabaseConnection) -> Self {
        Self {
            db: Arc::new(db),
            feeds: Feeds::new(),
        }
    }

    pub(crate) fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub(crate) fn db_handle(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.db)
    }

    pub(crate) fn feeds(&self) -> &Feeds {
        &self.feeds
    }
}
