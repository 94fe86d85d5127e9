use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier assigned to a book by the remote service.
///
/// The service may hand out either numbers or strings. Two ids only compare
/// equal when they are the same kind with the same value, so `1` and `"1"`
/// are different books.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookId {
    Number(i64),
    Text(String),
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookId::Number(n) => f.pad(&n.to_string()),
            BookId::Text(s) => f.pad(s),
        }
    }
}

impl FromStr for BookId {
    type Err = std::convert::Infallible;

    /// Integers become numeric ids, anything else is kept as text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(n) => BookId::Number(n),
            Err(_) => BookId::Text(s.to_string()),
        })
    }
}

impl From<i64> for BookId {
    fn from(value: i64) -> Self {
        BookId::Number(value)
    }
}

impl From<&str> for BookId {
    fn from(value: &str) -> Self {
        BookId::Text(value.to_string())
    }
}

impl From<String> for BookId {
    fn from(value: String) -> Self {
        BookId::Text(value)
    }
}

/// A library item as stored by the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Server-assigned identifier, immutable once created
    pub id: BookId,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    #[serde(default)]
    pub description: String,
    /// Cover image URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub price: f64,
}

impl Book {
    /// Materialize a draft under the given id.
    pub fn from_draft(id: BookId, draft: BookDraft) -> Self {
        Self {
            id,
            title: draft.title,
            author: draft.author,
            description: draft.description,
            image_url: draft.image_url,
            language: draft.language,
            price: draft.price,
        }
    }

    /// Overwrite every field present in `patch`. The id never changes.
    pub fn apply(&mut self, patch: BookPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = Some(image_url);
        }
        if let Some(language) = patch.language {
            self.language = Some(language);
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
    }
}

/// Request model for creating a new book. The service assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub price: f64,
}

impl BookDraft {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            ..Self::default()
        }
    }

    /// Trim surrounding whitespace from the text fields, dropping optional
    /// fields that end up empty.
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            description: self.description.trim().to_string(),
            image_url: trim_optional(self.image_url),
            language: trim_optional(self.language),
            price: self.price,
        }
    }

    /// Every rule the draft breaks, in field order.
    pub fn violations(&self) -> Vec<ValidationError> {
        let mut violations = Vec::new();
        if self.title.trim().is_empty() {
            violations.push(ValidationError::Blank("title"));
        }
        if self.author.trim().is_empty() {
            violations.push(ValidationError::Blank("author"));
        }
        if !valid_price(self.price) {
            violations.push(ValidationError::InvalidPrice);
        }
        violations
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        first_violation(self.violations())
    }
}

/// Partial update. Absent fields are left untouched by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn normalized(self) -> Self {
        Self {
            title: self.title.map(|s| s.trim().to_string()),
            author: self.author.map(|s| s.trim().to_string()),
            description: self.description.map(|s| s.trim().to_string()),
            image_url: self.image_url.map(|s| s.trim().to_string()),
            language: self.language.map(|s| s.trim().to_string()),
            price: self.price,
        }
    }

    pub fn violations(&self) -> Vec<ValidationError> {
        let mut violations = Vec::new();
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            violations.push(ValidationError::Blank("title"));
        }
        if self.author.as_deref().is_some_and(|a| a.trim().is_empty()) {
            violations.push(ValidationError::Blank("author"));
        }
        if self.price.is_some_and(|p| !valid_price(p)) {
            violations.push(ValidationError::InvalidPrice);
        }
        violations
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        first_violation(self.violations())
    }
}

/// Record returned by an update, read field by field.
///
/// Servers may echo back only part of the record; fields missing from the
/// response stay `None` in `changes` rather than falling back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookUpdate {
    pub id: BookId,
    #[serde(flatten)]
    pub changes: BookPatch,
}

impl From<Book> for BookUpdate {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            changes: BookPatch {
                title: Some(book.title),
                author: Some(book.author),
                description: Some(book.description),
                image_url: book.image_url,
                language: book.language,
                price: Some(book.price),
            },
        }
    }
}

/// Caller-side input errors. The store itself never raises these.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Blank(&'static str),
    #[error("price must be a non-negative number")]
    InvalidPrice,
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Blank(field) => field,
            ValidationError::InvalidPrice => "price",
        }
    }
}

fn valid_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

fn first_violation(violations: Vec<ValidationError>) -> Result<(), ValidationError> {
    match violations.into_iter().next() {
        Some(violation) => Err(violation),
        None => Ok(()),
    }
}

fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn book_id_keeps_json_kind() {
        let numeric: BookId = serde_json::from_value(json!(7)).unwrap();
        let text: BookId = serde_json::from_value(json!("7")).unwrap();

        assert_eq!(numeric, BookId::Number(7));
        assert_eq!(text, BookId::Text("7".to_string()));
        assert_ne!(numeric, text);
        assert_eq!(numeric.to_string(), text.to_string());
    }

    #[test]
    fn book_id_honours_width() {
        assert_eq!(format!("{:>4}", BookId::Number(7)), "   7");
        assert_eq!(format!("{:<4}|", BookId::from("ab")), "ab  |");
    }

    #[test]
    fn book_id_from_str_prefers_numbers() {
        assert_eq!("42".parse::<BookId>().unwrap(), BookId::Number(42));
        assert_eq!(
            "a1b2".parse::<BookId>().unwrap(),
            BookId::Text("a1b2".to_string())
        );
    }

    #[test]
    fn book_defaults_optional_fields() {
        let book: Book =
            serde_json::from_value(json!({"id": 1, "title": "A", "author": "X"})).unwrap();

        assert_eq!(book.description, "");
        assert_eq!(book.image_url, None);
        assert_eq!(book.language, None);
        assert_eq!(book.price, 0.0);
    }

    #[test]
    fn book_uses_camel_case_on_the_wire() {
        let book: Book = serde_json::from_value(json!({
            "id": "abc",
            "title": "Dune",
            "author": "Frank Herbert",
            "imageUrl": "https://example.com/dune.jpg",
            "language": "English",
            "price": 9.5
        }))
        .unwrap();
        assert_eq!(book.image_url.as_deref(), Some("https://example.com/dune.jpg"));

        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["imageUrl"], "https://example.com/dune.jpg");
        assert!(value.get("image_url").is_none());
    }

    #[test]
    fn draft_never_serializes_an_id() {
        let value = serde_json::to_value(BookDraft::new("B", "Y")).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["title"], "B");
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = BookPatch {
            title: Some("New".to_string()),
            ..BookPatch::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"title": "New"}));
    }

    #[test]
    fn draft_validation_rejects_blank_required_fields() {
        let draft = BookDraft::new("  ", "");
        assert_eq!(
            draft.violations(),
            vec![ValidationError::Blank("title"), ValidationError::Blank("author")]
        );
        assert_eq!(draft.validate(), Err(ValidationError::Blank("title")));
    }

    #[test]
    fn draft_validation_rejects_negative_price() {
        let mut draft = BookDraft::new("A", "X");
        draft.price = -1.0;
        assert_eq!(draft.validate(), Err(ValidationError::InvalidPrice));
        assert_eq!(ValidationError::InvalidPrice.field(), "price");
    }

    #[test]
    fn draft_normalized_trims_text() {
        let mut draft = BookDraft::new("  Dune ", " Herbert");
        draft.language = Some("   ".to_string());
        let draft = draft.normalized();

        assert_eq!(draft.title, "Dune");
        assert_eq!(draft.author, "Herbert");
        assert_eq!(draft.language, None);
    }

    #[test]
    fn patch_validation_only_checks_present_fields() {
        assert!(BookPatch::default().validate().is_ok());

        let patch = BookPatch {
            author: Some(" ".to_string()),
            ..BookPatch::default()
        };
        assert_eq!(patch.validate(), Err(ValidationError::Blank("author")));
    }

    #[test]
    fn apply_keeps_id_and_untouched_fields() {
        let mut book = Book::from_draft(BookId::Number(1), BookDraft::new("A", "X"));
        book.apply(BookPatch {
            title: Some("A2".to_string()),
            price: Some(3.0),
            ..BookPatch::default()
        });

        assert_eq!(book.id, BookId::Number(1));
        assert_eq!(book.title, "A2");
        assert_eq!(book.author, "X");
        assert_eq!(book.price, 3.0);
    }

    #[test]
    fn partial_update_response_keeps_absent_fields_unset() {
        let update: BookUpdate =
            serde_json::from_value(json!({"id": 2, "title": "B2", "author": "Y"})).unwrap();

        assert_eq!(update.id, BookId::Number(2));
        assert_eq!(update.changes.title.as_deref(), Some("B2"));
        assert_eq!(update.changes.price, None);
        assert_eq!(update.changes.description, None);
    }

    #[test]
    fn full_record_converts_to_complete_update() {
        let mut book = Book::from_draft(BookId::Number(3), BookDraft::new("C", "Z"));
        book.price = 4.0;
        let update = BookUpdate::from(book.clone());

        let mut cached = Book::from_draft(BookId::Number(3), BookDraft::new("old", "old"));
        cached.apply(update.changes);
        assert_eq!(cached, book);
    }
}
