//! Data access layer over the shared [`Store`].
//!
//! One repository per aggregate. All repositories are cheap to clone and
//! hand out [`crate::store::LiveQuery`] handles that re-emit after every
//! committed write, so a caller that polls `next()` always observes its own
//! writes.

mod clients;
mod products;
mod quotes;

pub use clients::{ClientRepository, NewClient};
pub use products::{NewProduct, ProductRepository};
pub use quotes::{NewQuote, NewQuoteItem, QuoteRepository, QuoteWithItems};

use crate::store::Store;

/// Every repository wired to one store. Built once at startup and cloned
/// wherever data access is needed.
#[derive(Debug, Clone)]
pub struct Repositories {
    /// Client directory
    pub clients: ClientRepository,
    /// Product catalog
    pub products: ProductRepository,
    /// Quotes and their line items
    pub quotes: QuoteRepository,
}

impl Repositories {
    /// Wires each repository to the given store
    #[must_use]
    pub fn new(store: &Store) -> Self {
        Self {
            clients: ClientRepository::new(store),
            products: ProductRepository::new(store),
            quotes: QuoteRepository::new(store),
        }
    }
}
