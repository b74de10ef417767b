//! Quote entity - Represents a price quotation issued to a client.
//!
//! A quote belongs to exactly one client and dies with it (cascade). Its
//! `total_amount` column is a denormalized cache written by callers; the
//! trustworthy figure is the sum of item subtotals exposed by
//! `QuoteWithItems::total_amount`.

use crate::errors::Error;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Quote database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quotes")]
pub struct Model {
    /// Unique identifier for the quote
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the client this quote was issued to
    pub client_id: i64,
    /// `"pending"`, `"accepted"`, or `"rejected"`, decoded via [`QuoteStatus::parse`]
    pub status: String,
    /// Cached total; not kept in sync with item subtotals automatically
    pub total_amount: f64,
    /// Free-form notes shown on the quote
    pub notes: String,
    /// When the quote was created; default listings sort by this, newest first
    pub created_at: DateTimeUtc,
    /// When the quote was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Quote and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each quote belongs to one client; deleting the client deletes the quote
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id",
        on_delete = "Cascade"
    )]
    Client,
    /// Line items composing this quote; they are deleted with it
    #[sea_orm(has_many = "super::quote_item::Entity")]
    QuoteItem,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::quote_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuoteItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Lifecycle state of a quote
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteStatus {
    /// Issued, awaiting the client's decision
    Pending,
    /// Accepted by the client
    Accepted,
    /// Turned down by the client
    Rejected,
}

impl QuoteStatus {
    /// Storage string for this status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Decodes a storage string back into a status.
    ///
    /// # Errors
    /// Returns `Error::Validation` when the string names no known status.
    pub fn parse(value: &str) -> crate::errors::Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            unknown => Err(Error::Validation {
                message: format!("unknown quote status '{unknown}'"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_status_round_trips_through_storage_string() {
        for status in [
            QuoteStatus::Pending,
            QuoteStatus::Accepted,
            QuoteStatus::Rejected,
        ] {
            assert_eq!(QuoteStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_status_rejects_unknown_string() {
        let err = QuoteStatus::parse("archived").unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }
}
