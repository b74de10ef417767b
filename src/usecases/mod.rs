//! Thin, named operations for callers.
//!
//! Each function wraps exactly one repository call and adds no state; the
//! repository's error taxonomy passes through unchanged. Quote creation is
//! the one composite: it must go through
//! [`QuoteRepository::add_quote_with_items`](crate::repository::QuoteRepository::add_quote_with_items)
//! so the quote and its items land atomically.

pub mod clients;
pub mod message;
pub mod products;
pub mod quotes;
