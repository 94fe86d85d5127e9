//! Client for the remote `/books` REST service.
//!
//! [`BookApi`] is the seam the store talks to; [`HttpBookApi`] is the
//! reqwest-backed implementation. Every failure is surfaced unmodified as an
//! [`ApiError`] and nothing is retried.

use async_trait::async_trait;
use bookshelf_kernel::{Book, BookDraft, BookId, BookPatch, BookUpdate};

pub mod error;
pub mod http;

pub use error::ApiError;
pub use http::HttpBookApi;

/// The four logical operations (plus single-item lookup) offered by the
/// remote book service.
#[async_trait]
pub trait BookApi: Send + Sync {
    /// `GET /books`
    async fn list_books(&self) -> Result<Vec<Book>, ApiError>;

    /// `GET /books/{id}`. A 404 becomes [`ApiError::NotFound`].
    async fn get_book(&self, id: &BookId) -> Result<Book, ApiError>;

    /// `POST /books`. The returned record carries the server-assigned id.
    async fn create_book(&self, draft: &BookDraft) -> Result<Book, ApiError>;

    /// `PUT /books/{id}` with only the fields present in `patch`. The
    /// response keeps track of which fields the server actually sent.
    async fn update_book(
        &self,
        id: &BookId,
        patch: &BookPatch,
    ) -> Result<BookUpdate, ApiError>;

    /// `DELETE /books/{id}`. Returns the id that was deleted.
    async fn delete_book(&self, id: &BookId) -> Result<BookId, ApiError>;
}
