use std::fmt;

use bookshelf_kernel::{Book, BookId, BookUpdate};

/// Progress of the most recent full-list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl LoadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadStatus::Idle => "idle",
            LoadStatus::Loading => "loading",
            LoadStatus::Succeeded => "succeeded",
            LoadStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything observers can see: the cached collection in server order, the
/// list-fetch status and the last fetch error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BooksState {
    pub books: Vec<Book>,
    pub status: LoadStatus,
    /// Message of the last failed fetch. A later success does not clear it.
    pub error: Option<String>,
}

impl BooksState {
    pub fn find(&self, id: &BookId) -> Option<&Book> {
        self.books.iter().find(|book| &book.id == id)
    }

    pub fn begin_fetch(&mut self) {
        self.status = LoadStatus::Loading;
    }

    /// A successful fetch is authoritative: the cache becomes exactly the
    /// server's sequence.
    pub fn replace_all(&mut self, books: Vec<Book>) {
        self.books = books;
        self.status = LoadStatus::Succeeded;
    }

    /// Failed fetches keep the stale cache readable.
    pub fn fail_fetch(&mut self, message: String) {
        self.status = LoadStatus::Failed;
        self.error = Some(message);
    }

    pub fn append(&mut self, book: Book) {
        self.books.push(book);
    }

    /// Write the fields present in `update` into the entry carrying
    /// `update.id`, keeping its position. Returns the merged record, or
    /// `None` with the cache untouched when no entry matches.
    pub fn merge_matching(&mut self, update: &BookUpdate) -> Option<Book> {
        let slot = self.books.iter_mut().find(|existing| existing.id == update.id)?;
        slot.apply(update.changes.clone());
        Some(slot.clone())
    }

    /// Drop the entry with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: &BookId) -> bool {
        let before = self.books.len();
        self.books.retain(|book| &book.id != id);
        self.books.len() != before
    }
}
