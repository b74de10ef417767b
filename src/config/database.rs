//! Database configuration module.
//!
//! Handles `SQLite` connection and table creation using `SeaORM`. Tables are
//! generated from the entity definitions via `Schema::create_table_from_entity`,
//! so the schema always matches the Rust struct definitions; the foreign keys
//! declared on the entity relations (cascade on quotes and quote items,
//! restrict on products) end up in the generated DDL.

use crate::entities::{Client, Product, Quote, QuoteColumn, QuoteItem, QuoteItemColumn};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the environment or returns the default
/// `SQLite` path. `mode=rwc` lets `SQLite` create the file on first run.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/cotizador.sqlite?mode=rwc".to_string())
}

/// Establishes a connection to the database at the given URL.
///
/// # Errors
/// Returns `Error::Storage` when the connection cannot be established.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables and secondary indices, skipping any that already exist.
///
/// Parents are created before children so the foreign keys in the generated
/// DDL always have a target.
///
/// # Errors
/// Returns `Error::Storage` when a DDL statement fails.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut client_table = schema.create_table_from_entity(Client);
    let mut product_table = schema.create_table_from_entity(Product);
    let mut quote_table = schema.create_table_from_entity(Quote);
    let mut quote_item_table = schema.create_table_from_entity(QuoteItem);

    db.execute(builder.build(client_table.if_not_exists())).await?;
    db.execute(builder.build(product_table.if_not_exists())).await?;
    db.execute(builder.build(quote_table.if_not_exists())).await?;
    db.execute(builder.build(quote_item_table.if_not_exists()))
        .await?;

    let quotes_client_idx = Index::create()
        .name("idx_quotes_client_id")
        .table(Quote)
        .col(QuoteColumn::ClientId)
        .if_not_exists()
        .to_owned();
    let items_quote_idx = Index::create()
        .name("idx_quote_items_quote_id")
        .table(QuoteItem)
        .col(QuoteItemColumn::QuoteId)
        .if_not_exists()
        .to_owned();
    let items_product_idx = Index::create()
        .name("idx_quote_items_product_id")
        .table(QuoteItem)
        .col(QuoteItemColumn::ProductId)
        .if_not_exists()
        .to_owned();

    db.execute(builder.build(&quotes_client_idx)).await?;
    db.execute(builder.build(&items_quote_idx)).await?;
    db.execute(builder.build(&items_product_idx)).await?;

    Ok(())
}
