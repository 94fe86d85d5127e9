//! In-memory `/books` resource.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{bail, Context};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookshelf_kernel::{Book, BookDraft, BookId, BookPatch};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;

use crate::error::AppError;

/// Table shared between request handlers.
pub type SharedTable = Arc<RwLock<BookTable>>;

/// Rows in insertion order plus the next id to hand out. `next_id` is `None`
/// once the numeric id space is used up.
#[derive(Debug)]
pub struct BookTable {
    rows: Vec<Book>,
    next_id: Option<i64>,
}

impl BookTable {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            next_id: Some(1),
        }
    }

    /// Start from existing rows; new ids continue after the largest numeric id.
    ///
    /// Rows must be addressable one by one, so two rows whose ids share a
    /// path form (`1` and `"1"` included) are rejected.
    pub fn seeded(rows: Vec<Book>) -> anyhow::Result<Self> {
        let mut keys = HashSet::new();
        for book in &rows {
            if !keys.insert(book.id.to_string()) {
                bail!("duplicate book id {} in seed", book.id);
            }
        }

        let next_id = match rows
            .iter()
            .filter_map(|book| match book.id {
                BookId::Number(n) => Some(n),
                BookId::Text(_) => None,
            })
            .max()
        {
            Some(max) => max.checked_add(1),
            None => Some(1),
        };
        Ok(Self { rows, next_id })
    }

    pub fn into_shared(self) -> SharedTable {
        Arc::new(RwLock::new(self))
    }

    pub fn rows(&self) -> &[Book] {
        &self.rows
    }

    /// Rows are addressed by the textual form of their id, as in a URL path.
    fn position(&self, key: &str) -> Option<usize> {
        self.rows.iter().position(|book| book.id.to_string() == key)
    }

    pub fn get(&self, key: &str) -> Option<&Book> {
        self.position(key).map(|index| &self.rows[index])
    }

    pub fn insert(&mut self, draft: BookDraft) -> anyhow::Result<Book> {
        let id = self.next_id.context("numeric book ids are exhausted")?;
        self.next_id = id.checked_add(1);

        let book = Book::from_draft(BookId::Number(id), draft);
        self.rows.push(book.clone());
        Ok(book)
    }

    pub fn update(&mut self, key: &str, patch: BookPatch) -> Option<Book> {
        let index = self.position(key)?;
        let book = &mut self.rows[index];
        book.apply(patch);
        Some(book.clone())
    }

    pub fn remove(&mut self, key: &str) -> Option<Book> {
        let index = self.position(key)?;
        Some(self.rows.remove(index))
    }
}

impl Default for BookTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Seed file layout: either a json-server style `{"books": [...]}` document
/// or a bare array of books.
#[derive(Deserialize)]
#[serde(untagged)]
enum SeedDocument {
    Database { books: Vec<Book> },
    Rows(Vec<Book>),
}

pub fn parse_seed(raw: &str) -> anyhow::Result<Vec<Book>> {
    let document: SeedDocument =
        serde_json::from_str(raw).context("seed must be {\"books\": [...]} or an array of books")?;
    Ok(match document {
        SeedDocument::Database { books } => books,
        SeedDocument::Rows(books) => books,
    })
}

/// Routes for the `/books` collection and its items.
pub fn routes(table: SharedTable) -> Router {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route(
            "/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(table)
}

async fn list_books(State(table): State<SharedTable>) -> Json<Vec<Book>> {
    Json(table.read().await.rows().to_vec())
}

async fn get_book(
    State(table): State<SharedTable>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    let table = table.read().await;
    let book = table.get(&id).ok_or_else(|| AppError::book_not_found(&id))?;
    Ok(Json(book.clone()))
}

async fn create_book(
    State(table): State<SharedTable>,
    payload: Result<Json<BookDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let Json(draft) = payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

    let violations = draft.violations();
    if !violations.is_empty() {
        return Err(AppError::from_violations(&violations));
    }

    let book = table.write().await.insert(draft)?;
    tracing::info!(id = %book.id, title = %book.title, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

async fn update_book(
    State(table): State<SharedTable>,
    Path(id): Path<String>,
    payload: Result<Json<BookPatch>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let Json(patch) = payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

    let violations = patch.violations();
    if !violations.is_empty() {
        return Err(AppError::from_violations(&violations));
    }

    let book = table
        .write()
        .await
        .update(&id, patch)
        .ok_or_else(|| AppError::book_not_found(&id))?;
    tracing::info!(id = %book.id, "book updated");
    Ok(Json(book))
}

async fn delete_book(
    State(table): State<SharedTable>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let book = table
        .write()
        .await
        .remove(&id)
        .ok_or_else(|| AppError::book_not_found(&id))?;
    tracing::info!(id = %book.id, "book deleted");
    Ok(Json(json!({ "id": book.id })))
}
