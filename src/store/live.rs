//! Change feeds and live queries.
//!
//! Every repository write bumps a per-table-group [`ChangeFeed`] after the
//! commit. A [`LiveQuery`] holds a receiver on one feed and re-runs its
//! query whenever the version moves, so subscribers always observe a write
//! that completed before they were woken (read-your-writes).

use crate::errors::{Error, Result};
use std::future::Future;
use std::pin::Pin;
use tokio::sync::watch;

/// Future produced by one run of a live query's loader
pub(crate) type BoxedRows<T> = Pin<Box<dyn Future<Output = Result<Vec<T>>> + Send>>;

/// Query function a live query re-runs on every change notification.
/// Owns everything it needs (connection handle included), so each call
/// yields a self-contained future.
pub(crate) type RowLoader<T> = Box<dyn Fn() -> BoxedRows<T> + Send + Sync>;

/// Monotonic version counter for one table group, bumped after every
/// committed write
#[derive(Debug, Clone)]
pub(crate) struct ChangeFeed {
    version: watch::Sender<u64>,
}

impl ChangeFeed {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self { version }
    }

    /// Wakes every live query watching this feed. Call after the write
    /// committed, never before.
    pub(crate) fn mark_changed(&self) {
        self.version.send_modify(|version| *version += 1);
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }
}

/// A push-based view over one query.
///
/// The first `next()` returns the current rows immediately; every later call
/// waits for a committed mutation of the watched tables and re-runs the
/// query. Notifications coalesce while the caller is not waiting, so a burst
/// of writes yields one emission carrying the latest rows. Dropping the
/// handle unsubscribes.
pub struct LiveQuery<T> {
    changes: watch::Receiver<u64>,
    load: RowLoader<T>,
    primed: bool,
}

impl<T> LiveQuery<T> {
    pub(crate) fn new(changes: watch::Receiver<u64>, load: RowLoader<T>) -> Self {
        Self {
            changes,
            load,
            primed: false,
        }
    }

    /// Emits the current rows, waiting for a change first on every call
    /// after the initial one.
    ///
    /// # Errors
    /// Returns `Error::Cancelled` once the owning store has been dropped;
    /// query failures propagate as whatever the loader raised.
    pub async fn next(&mut self) -> Result<Vec<T>> {
        if self.primed {
            self.changes.changed().await.map_err(|_| Error::Cancelled {
                context: "change feed closed".to_string(),
            })?;
        } else {
            // Mark the current version seen before the first load so a
            // pre-subscription write does not produce a duplicate wake.
            self.changes.borrow_and_update();
            self.primed = true;
        }
        (self.load)().await
    }
}

impl<T> std::fmt::Debug for LiveQuery<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveQuery")
            .field("primed", &self.primed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn counting_loader() -> (RowLoader<u64>, std::sync::Arc<std::sync::atomic::AtomicU64>) {
        let runs = std::sync::Arc::new(std::sync::atomic::AtomicU64::new(0));
        let seen = std::sync::Arc::clone(&runs);
        let loader: RowLoader<u64> = Box::new(move || {
            let run = seen.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Box::pin(async move { Ok(vec![run]) })
        });
        (loader, runs)
    }

    #[tokio::test]
    async fn test_first_next_emits_without_a_change() {
        let feed = ChangeFeed::new();
        let (loader, runs) = counting_loader();
        let mut live = LiveQuery::new(feed.subscribe(), loader);

        let rows = live.next().await.unwrap();
        assert_eq!(rows, vec![0]);
        assert_eq!(runs.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_mark_changed_wakes_a_waiting_subscriber() {
        let feed = ChangeFeed::new();
        let (loader, _runs) = counting_loader();
        let mut live = LiveQuery::new(feed.subscribe(), loader);
        live.next().await.unwrap();

        let waiter = tokio::spawn(async move { live.next().await });
        tokio::task::yield_now().await;
        feed.mark_changed();

        let rows = waiter.await.unwrap().unwrap();
        assert_eq!(rows, vec![1]);
    }

    #[tokio::test]
    async fn test_next_fails_with_cancelled_once_feed_is_gone() {
        let feed = ChangeFeed::new();
        let (loader, _runs) = counting_loader();
        let mut live = LiveQuery::new(feed.subscribe(), loader);
        live.next().await.unwrap();

        drop(feed);
        let err = live.next().await.unwrap_err();
        assert!(matches!(err, Error::Cancelled { .. }));
    }

    #[tokio::test]
    async fn test_burst_of_changes_coalesces_into_one_emission() {
        let feed = ChangeFeed::new();
        let (loader, runs) = counting_loader();
        let mut live = LiveQuery::new(feed.subscribe(), loader);
        live.next().await.unwrap();

        feed.mark_changed();
        feed.mark_changed();
        feed.mark_changed();

        live.next().await.unwrap();
        assert_eq!(runs.load(std::sync::atomic::Ordering::SeqCst), 2);
    }
}
