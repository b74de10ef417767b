//! Debounced, cancellable search pipeline.
//!
//! One [`SearchPipeline`] backs one search field. Every submitted query
//! invalidates the previous one: the in-flight task is aborted and a fresh
//! generation token is issued, so at most one search runs at a time and
//! only the newest query's result ever reaches the visible state. Blank
//! queries short-circuit to [`SearchState::Idle`] without dispatching
//! anything.

use crate::errors::Result;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Quiet period between the last keystroke and the query dispatch
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// What a search field is currently showing
#[derive(Clone, Debug, PartialEq)]
pub enum SearchState<T> {
    /// No query entered
    Idle,
    /// A query is pending or running
    Searching {
        /// The query being searched
        query: String,
    },
    /// The newest query matched at least one row
    Results {
        /// The query that produced the hits
        query: String,
        /// Matching rows
        hits: Vec<T>,
    },
    /// The newest query matched nothing
    Empty {
        /// The query that matched nothing
        query: String,
    },
    /// The newest query's task failed; the next submission recovers
    Error {
        /// The query whose task failed
        query: String,
        /// Human-readable failure description
        message: String,
    },
}

/// Debounce/cancel state machine for one search field.
///
/// Holds the visible [`SearchState`] in a watch channel; UI code calls
/// [`subscribe`](Self::subscribe) once and re-renders on every change.
#[derive(Debug)]
pub struct SearchPipeline<T> {
    state: watch::Sender<SearchState<T>>,
    generation: Arc<AtomicU64>,
    in_flight: Option<JoinHandle<()>>,
    debounce: Duration,
}

impl<T: Send + Sync + 'static> SearchPipeline<T> {
    /// A pipeline with the standard debounce window
    #[must_use]
    pub fn new() -> Self {
        Self::with_debounce(DEFAULT_DEBOUNCE)
    }

    /// A pipeline with a custom debounce window
    #[must_use]
    pub fn with_debounce(debounce: Duration) -> Self {
        let (state, _) = watch::channel(SearchState::Idle);
        Self {
            state,
            generation: Arc::new(AtomicU64::new(0)),
            in_flight: None,
            debounce,
        }
    }

    /// Watches the visible state. Receivers see every transition committed
    /// after they subscribe.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState<T>> {
        self.state.subscribe()
    }

    /// Submits the current text of the search field.
    ///
    /// Whatever task the previous submission dispatched is cancelled here,
    /// before anything else; its result can no longer become visible. A
    /// blank query moves straight to `Idle`. Anything else shows
    /// `Searching` at once and dispatches `run` after the debounce window,
    /// restarting the window if superseded first.
    pub fn submit<F, Fut>(&mut self, query: &str, run: F)
    where
        F: FnOnce(String) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
    {
        // issuing the new token before the abort closes the window where a
        // finished task could still slip its result in
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = self.in_flight.take() {
            previous.abort();
            debug!(token, "superseded in-flight search task");
        }

        let query = query.trim();
        if query.is_empty() {
            self.state.send_replace(SearchState::Idle);
            return;
        }

        let query = query.to_string();
        self.state.send_replace(SearchState::Searching {
            query: query.clone(),
        });

        debug!(token, query = %query, "dispatched search task");
        let state = self.state.clone();
        let generation = Arc::clone(&self.generation);
        let debounce = self.debounce;
        self.in_flight = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;

            let next = match run(query.clone()).await {
                Ok(hits) if hits.is_empty() => SearchState::Empty { query },
                Ok(hits) => SearchState::Results { query, hits },
                Err(err) => SearchState::Error {
                    query,
                    message: err.to_string(),
                },
            };

            // a superseded task may reach this line before its abort lands;
            // the token comparison keeps its stale result invisible
            state.send_if_modified(|current| {
                if generation.load(Ordering::SeqCst) == token {
                    *current = next;
                    true
                } else {
                    false
                }
            });
        }));
    }
}

impl<T: Clone + Send + Sync + 'static> SearchPipeline<T> {
    /// Snapshot of the visible state
    #[must_use]
    pub fn state(&self) -> SearchState<T> {
        self.state.borrow().clone()
    }
}

impl<T: Send + Sync + 'static> Default for SearchPipeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for SearchPipeline<T> {
    fn drop(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
    }
}
