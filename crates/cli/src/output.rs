//! Human-readable rendering of books for the terminal.

use bookshelf_kernel::Book;

pub fn price_label(price: f64) -> String {
    if price > 0.0 {
        format!("${price:.2}")
    } else {
        "Not specified".to_string()
    }
}

/// One line per book: id, title, author and the optional extras that are set.
pub fn book_line(book: &Book) -> String {
    let mut line = format!("{:>6}  {} by {}", book.id, book.title, book.author);
    if let Some(language) = &book.language {
        line.push_str(&format!(" [{language}]"));
    }
    if book.price > 0.0 {
        line.push_str(&format!(" {}", price_label(book.price)));
    }
    line
}

pub fn book_list(books: &[Book]) -> String {
    if books.is_empty() {
        return "No books yet.".to_string();
    }
    books.iter().map(book_line).collect::<Vec<_>>().join("\n")
}

pub fn book_detail(book: &Book) -> String {
    let description = if book.description.is_empty() {
        "No description available."
    } else {
        &book.description
    };
    [
        format!("{} (id {})", book.title, book.id),
        format!("Author:   {}", book.author),
        format!(
            "Language: {}",
            book.language.as_deref().unwrap_or("Not specified")
        ),
        format!("Price:    {}", price_label(book.price)),
        format!("Cover:    {}", book.image_url.as_deref().unwrap_or("none")),
        String::new(),
        description.to_string(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_kernel::{BookDraft, BookId};

    fn dune() -> Book {
        Book::from_draft(BookId::Number(1), BookDraft::new("Dune", "Herbert"))
    }

    #[test]
    fn empty_list_has_placeholder() {
        assert_eq!(book_list(&[]), "No books yet.");
    }

    #[test]
    fn line_includes_optional_extras() {
        let mut book = dune();
        assert_eq!(book_line(&book), "     1  Dune by Herbert");

        book.language = Some("English".to_string());
        book.price = 7.0;
        assert_eq!(book_line(&book), "     1  Dune by Herbert [English] $7.00");
    }

    #[test]
    fn detail_falls_back_for_missing_fields() {
        let detail = book_detail(&dune());
        assert!(detail.contains("Language: Not specified"));
        assert!(detail.contains("Price:    Not specified"));
        assert!(detail.ends_with("No description available."));
    }
}
