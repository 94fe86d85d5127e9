//! Core types shared by every Bookshelf crate: the book domain model and
//! layered settings.

pub mod models;
pub mod settings;

pub use models::{Book, BookDraft, BookId, BookPatch, BookUpdate, ValidationError};
pub use settings::Settings;
