//! Unified error types and result handling for the quoting engine.
//!
//! Every fallible operation in the crate returns [`Result`]. Repository
//! methods map storage-level failures into the taxonomy below; use-cases
//! pass errors through untouched.

use thiserror::Error;

/// All the ways a quoting operation can fail
#[derive(Debug, Error)]
pub enum Error {
    /// Input was rejected before it reached the store (blank name, negative
    /// price or cost, quantity below one, unrecognized enum string)
    #[error("Validation failed: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// An insert collided with an existing row, e.g. a caller-supplied id
    /// that is already taken
    #[error("Constraint violation: {message}")]
    Constraint {
        /// Constraint that was violated, as reported by the store
        message: String,
    },

    /// A delete was blocked by a restricting reference, or a write pointed
    /// at a parent row that does not exist
    #[error("Foreign key violation: {message}")]
    ForeignKey {
        /// Reference that blocked the operation
        message: String,
    },

    /// The row an operation targeted by id does not exist
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Entity kind, e.g. `"client"`
        entity: &'static str,
        /// The id that was looked up
        id: i64,
    },

    /// The entity store failed underneath us (I/O, SQL, pool)
    #[error("Storage error: {message}")]
    Storage {
        /// Failure as reported by the store
        message: String,
    },

    /// A task or subscription was superseded or its source went away
    #[error("Cancelled: {context}")]
    Cancelled {
        /// What was cancelled
        context: String,
    },
}

impl From<sea_orm::DbErr> for Error {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(message)) => {
                Error::Constraint { message }
            }
            Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(message)) => {
                Error::ForeignKey { message }
            }
            _ => Error::Storage {
                message: err.to_string(),
            },
        }
    }
}

/// Convenience `Result` type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
