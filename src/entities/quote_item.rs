//! Quote item entity - One priced line inside a quote.
//!
//! An item cannot outlive its quote (cascade) and pins the product it
//! references (restrict). `subtotal` is computed once when the row is
//! inserted and is never re-derived on later mutation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Quote item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quote_items")]
pub struct Model {
    /// Unique identifier for the line item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the quote this line belongs to
    pub quote_id: i64,
    /// ID of the quoted product
    pub product_id: i64,
    /// Number of units; always greater than zero
    pub quantity: i32,
    /// Price per unit at the time the line was written
    pub unit_price: f64,
    /// `quantity * unit_price`, fixed at insertion time
    pub subtotal: f64,
}

/// Defines relationships between QuoteItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each item belongs to one quote; deleting the quote deletes the item
    #[sea_orm(
        belongs_to = "super::quote::Entity",
        from = "Column::QuoteId",
        to = "super::quote::Column::Id",
        on_delete = "Cascade"
    )]
    Quote,
    /// Each item references one product; the product cannot be deleted
    /// while this item exists
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Restrict"
    )]
    Product,
}

impl Related<super::quote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quote.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
