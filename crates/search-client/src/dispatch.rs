//! Dispatch layer: one observable search state per dispatcher.
//!
//! Each dispatch synchronously clears the state to [`SearchState::Pending`]
//! and issues the request on a spawned task. Requests carry a monotonically
//! increasing ticket; a completion is applied only while its ticket is
//! still the latest issued, so an older request finishing late can never
//! overwrite a newer result. Superseded requests are not cancelled, merely
//! discarded on completion.

use crate::{SearchBackend, SearchError};
use search_types::{SearchCriteria, SearchResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Coarse classification of a failed request, cheap to clone into UI state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Non-2xx response with its status code.
    Http(u16),
    Transport,
    Decode,
}

/// Clone-friendly record of a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&SearchError> for SearchFailure {
    fn from(err: &SearchError) -> Self {
        let kind = match err {
            SearchError::Status { status, .. } => ErrorKind::Http(*status),
            SearchError::Transport(_) => ErrorKind::Transport,
            SearchError::Decode(_) => ErrorKind::Decode,
        };
        SearchFailure {
            kind,
            message: err.to_string(),
        }
    }
}

/// Observable state of the most recent dispatch.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchState {
    /// No search has been issued yet.
    #[default]
    Idle,
    /// A request is in flight; the prior result has been cleared.
    Pending,
    Resolved(SearchResult),
    Failed(SearchFailure),
}

impl SearchState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SearchState::Resolved(_) | SearchState::Failed(_))
    }
}

/// Issues search requests against one backend and publishes the latest
/// outcome through a `watch` channel.
#[derive(Debug)]
pub struct Dispatcher<B: ?Sized> {
    backend: Arc<B>,
    seq: Arc<AtomicU64>,
    state: watch::Sender<SearchState>,
}

impl<B: SearchBackend + ?Sized + 'static> Dispatcher<B> {
    pub fn new(backend: Arc<B>) -> Self {
        let (state, _) = watch::channel(SearchState::Idle);
        Self {
            backend,
            seq: Arc::new(AtomicU64::new(0)),
            state,
        }
    }

    /// Watch the search state; receivers observe Pending and the terminal
    /// outcome of whichever dispatch is newest.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Issue a search. Publishes Pending before returning and resolves on a
    /// spawned task; returns the request's ticket.
    pub fn dispatch(&self, criteria: SearchCriteria) -> u64 {
        // The sequence bump and the Pending publish happen under the watch
        // lock, as does the completion's check-and-apply below; a completing
        // request can never interleave between the two.
        let mut ticket = 0;
        self.state.send_modify(|state| {
            ticket = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
            *state = SearchState::Pending;
        });

        let backend = Arc::clone(&self.backend);
        let seq = Arc::clone(&self.seq);
        let state = self.state.clone();
        tokio::spawn(async move {
            let outcome = match backend.search(&criteria).await {
                Ok(result) => SearchState::Resolved(result),
                Err(err) => {
                    tracing::warn!(error = %err, "search request failed");
                    SearchState::Failed(SearchFailure::from(&err))
                }
            };
            let applied = state.send_if_modified(|current| {
                if seq.load(Ordering::SeqCst) == ticket {
                    *current = outcome;
                    true
                } else {
                    false
                }
            });
            if !applied {
                tracing::debug!(ticket, "discarding result of superseded search");
            }
        });
        ticket
    }

    /// Dispatch and wait for the next terminal state. If another dispatch
    /// supersedes this one while waiting, the newer outcome is returned.
    pub async fn dispatch_and_wait(&self, criteria: SearchCriteria) -> SearchState {
        let mut rx = self.subscribe();
        self.dispatch(criteria);
        loop {
            let current = rx.borrow_and_update().clone();
            if current.is_terminal() {
                return current;
            }
            if rx.changed().await.is_err() {
                return SearchState::Idle;
            }
        }
    }
}
