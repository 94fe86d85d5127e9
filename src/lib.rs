//! Bookshelf application library
//!
//! Holds the client-side [`BookStore`](store::BookStore): the in-memory cache
//! of the remote book collection and the rules that reconcile each API
//! response into it.

pub mod store;

/// Re-export commonly used types
pub use bookshelf_client::{ApiError, BookApi, HttpBookApi};
pub use bookshelf_kernel::{Book, BookDraft, BookId, BookPatch, BookUpdate};
pub use store::{BookStore, BooksState, FetchOutcome, LoadStatus};
