//! Client-side book store.
//!
//! [`BookStore`] owns the cached collection and the list-fetch status,
//! forwards the four operations to a [`BookApi`] and reconciles each response
//! into the cache. State is published through a `tokio::sync::watch` channel
//! so any number of observers can follow it.

mod state;


use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bookshelf_client::{ApiError, BookApi};
use bookshelf_kernel::{Book, BookDraft, BookId, BookPatch};
use tokio::sync::watch;

pub use state::{BooksState, LoadStatus};

/// Result of a [`BookStore::fetch_all`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The cache now holds this many books.
    Loaded(usize),
    /// The fetch failed; the message is also recorded in the state.
    Failed(String),
    /// A newer fetch was issued while this one was in flight, so its
    /// response was discarded.
    Superseded,
}

/// Explicit state container, handed to whatever needs it.
pub struct BookStore {
    api: Arc<dyn BookApi>,
    state: watch::Sender<BooksState>,
    /// Sequence number of the most recently issued list fetch.
    latest_fetch: AtomicU64,
}

impl BookStore {
    pub fn new(api: Arc<dyn BookApi>) -> Self {
        let (state, _) = watch::channel(BooksState::default());
        Self {
            api,
            state,
            latest_fetch: AtomicU64::new(0),
        }
    }

    /// Follow state changes.
    pub fn subscribe(&self) -> watch::Receiver<BooksState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> BooksState {
        self.state.borrow().clone()
    }

    pub fn books(&self) -> Vec<Book> {
        self.state.borrow().books.clone()
    }

    pub fn status(&self) -> LoadStatus {
        self.state.borrow().status
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn find(&self, id: &BookId) -> Option<Book> {
        self.state.borrow().find(id).cloned()
    }

    /// Refresh the whole cache from the service.
    ///
    /// Failures are captured into the state rather than returned. Only the
    /// most recently issued fetch may touch the state once its response
    /// arrives; older responses are dropped.
    pub async fn fetch_all(&self) -> FetchOutcome {
        let ticket = self.latest_fetch.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(BooksState::begin_fetch);

        let result = self.api.list_books().await;

        let mut outcome = FetchOutcome::Superseded;
        self.state.send_if_modified(|state| {
            if self.latest_fetch.load(Ordering::SeqCst) != ticket {
                return false;
            }
            outcome = match result {
                Ok(books) => {
                    let count = books.len();
                    state.replace_all(books);
                    FetchOutcome::Loaded(count)
                }
                Err(e) => {
                    let message = e.to_string();
                    state.fail_fetch(message.clone());
                    FetchOutcome::Failed(message)
                }
            };
            true
        });

        match &outcome {
            FetchOutcome::Loaded(count) => tracing::info!(ticket, count, "book list loaded"),
            FetchOutcome::Failed(error) => {
                tracing::warn!(ticket, %error, "book list fetch failed")
            }
            FetchOutcome::Superseded => {
                tracing::debug!(ticket, "discarding superseded book list response")
            }
        }

        outcome
    }

    /// Issue the initial fetch if nothing has been requested yet.
    pub async fn load_if_idle(&self) -> Option<FetchOutcome> {
        if self.status() != LoadStatus::Idle {
            return None;
        }
        Some(self.fetch_all().await)
    }

    /// Create a book and append the server's record to the cache. The draft is
    /// forwarded as-is; validating it is the caller's job. The record is
    /// appended even if a concurrent fetch already brought in its id.
    pub async fn create(&self, draft: BookDraft) -> Result<Book, ApiError> {
        let book = self.api.create_book(&draft).await.inspect_err(|e| {
            tracing::warn!(error = %e, "create book failed");
        })?;

        tracing::info!(id = %book.id, "book created");
        self.state.send_modify(|state| state.append(book.clone()));
        Ok(book)
    }

    /// Update a book and merge the fields the server sent back into the
    /// cached entry, in place. Returns the merged record, or `None` when the
    /// response id is not cached; such a response is not inserted.
    pub async fn update(&self, id: &BookId, patch: BookPatch) -> Result<Option<Book>, ApiError> {
        let update = self.api.update_book(id, &patch).await.inspect_err(|e| {
            tracing::warn!(%id, error = %e, "update book failed");
        })?;

        let mut merged = None;
        self.state.send_if_modified(|state| {
            merged = state.merge_matching(&update);
            merged.is_some()
        });
        match &merged {
            Some(_) => tracing::info!(id = %update.id, "book updated"),
            None => {
                tracing::warn!(id = %update.id, "updated book is not cached; response dropped")
            }
        }
        Ok(merged)
    }

    /// Delete a book and drop it from the cache. Deleting an id that is not
    /// cached leaves the cache as it is.
    pub async fn delete(&self, id: &BookId) -> Result<BookId, ApiError> {
        self.api.delete_book(id).await.inspect_err(|e| {
            tracing::warn!(%id, error = %e, "delete book failed");
        })?;

        let removed = self.state.send_if_modified(|state| state.remove(id));
        tracing::info!(%id, removed, "book deleted");
        Ok(id.clone())
    }
}
