//! Client entity - Represents a customer that quotes are issued to.
//!
//! Clients are either companies or individual persons; the `kind` column
//! stores the [`ClientKind`] discriminant as a string. Deleting a client
//! cascades to all of its quotes.

use crate::errors::Error;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Client database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    /// Unique identifier for the client
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name; search and default sort key
    pub name: String,
    /// Contact email, included in substring search
    pub email: String,
    /// Contact phone number
    pub phone: String,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// State or region
    pub state: String,
    /// `"company"` or `"person"`, decoded via [`ClientKind::parse`]
    pub kind: String,
    /// Inactive clients are hidden from default listings and search
    pub is_active: bool,
    /// When the client was created
    pub created_at: DateTimeUtc,
    /// When the client was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Client and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A client owns its quotes; they are deleted with it
    #[sea_orm(has_many = "super::quote::Entity")]
    Quote,
}

impl Related<super::quote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quote.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Whether a client is a business or an individual
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientKind {
    /// A registered business
    Company,
    /// A private individual
    Person,
}

impl ClientKind {
    /// Storage string for this kind
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Person => "person",
        }
    }

    /// Decodes a storage string back into a kind.
    ///
    /// # Errors
    /// Returns `Error::Validation` when the string names no known kind;
    /// unknown values never silently default.
    pub fn parse(value: &str) -> crate::errors::Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "company" => Ok(Self::Company),
            "person" => Ok(Self::Person),
            other => Err(Error::Validation {
                message: format!("unknown client kind '{other}'"),
            }),
        }
    }
}
