//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod client;
pub mod product;
pub mod quote;
pub mod quote_item;

// Re-export specific types to avoid conflicts
pub use client::{ClientKind, Column as ClientColumn, Entity as Client, Model as ClientModel};
pub use product::{
    Column as ProductColumn, Entity as Product, Model as ProductModel, ProductCategory,
};
pub use quote::{Column as QuoteColumn, Entity as Quote, Model as QuoteModel, QuoteStatus};
pub use quote_item::{Column as QuoteItemColumn, Entity as QuoteItem, Model as QuoteItemModel};
