//! Product entity - Represents items and services that can be quoted.
//!
//! Each product has a fixed unit price and a [`ProductCategory`] stored as
//! a string. Products referenced by quote items are delete-restricted: the
//! product cannot vanish while a line item still points at it.

use crate::errors::Error;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product (e.g., "Canvas banner", "Installation visit")
    pub name: String,
    /// Longer description shown in catalogs
    pub description: String,
    /// Unit price; never negative
    pub price: f64,
    /// Category discriminant, decoded via [`ProductCategory::parse`]
    pub category: String,
    /// Inactive products are hidden from default listings and search
    pub is_active: bool,
    /// Optional reference to a product image
    pub image_url: Option<String>,
    /// When the product was created
    pub created_at: DateTimeUtc,
    /// When the product was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Quote items reference products and restrict their deletion
    #[sea_orm(has_many = "super::quote_item::Entity")]
    QuoteItem,
}

impl Related<super::quote_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuoteItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Closed set of product categories
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductCategory {
    /// Fabric and printed textile goods
    Textile,
    /// Furniture pieces
    Furniture,
    /// Electronic goods
    Electronics,
    /// Labor, installation, and other services
    Service,
    /// Anything that fits nowhere else
    Other,
}

impl ProductCategory {
    /// Storage string for this category
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Textile => "textile",
            Self::Furniture => "furniture",
            Self::Electronics => "electronics",
            Self::Service => "service",
            Self::Other => "other",
        }
    }

    /// Decodes a storage string back into a category.
    ///
    /// # Errors
    /// Returns `Error::Validation` when the string names no known category.
    pub fn parse(value: &str) -> crate::errors::Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "textile" => Ok(Self::Textile),
            "furniture" => Ok(Self::Furniture),
            "electronics" => Ok(Self::Electronics),
            "service" => Ok(Self::Service),
            "other" => Ok(Self::Other),
            unknown => Err(Error::Validation {
                message: format!("unknown product category '{unknown}'"),
            }),
        }
    }
}
