use std::convert::Infallible;
use std::path::PathBuf;

use bookshelf_kernel::{BookDraft, BookId, BookPatch};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bookshelf",
    about = "Browse and edit a remote book library",
    version
)]
pub struct Cli {
    /// Base address of the book service (overrides configuration)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the in-memory development book service
    Serve {
        /// JSON file with `{"books": [...]}` or an array of books
        #[arg(long)]
        seed: Option<PathBuf>,
    },

    /// List every book
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one book
    Show {
        #[arg(value_parser = parse_book_id)]
        id: BookId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a book
    Add {
        #[command(flatten)]
        fields: BookFields,
    },

    /// Change fields of an existing book
    Edit {
        #[arg(value_parser = parse_book_id)]
        id: BookId,

        #[command(flatten)]
        fields: BookFields,
    },

    /// Delete a book
    Delete {
        #[arg(value_parser = parse_book_id)]
        id: BookId,
    },
}

/// Integers become numeric ids, anything else stays text.
fn parse_book_id(raw: &str) -> Result<BookId, Infallible> {
    raw.parse()
}

/// Editable book fields shared by `add` and `edit`.
#[derive(Args, Debug, Default)]
pub struct BookFields {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Cover image URI
    #[arg(long)]
    pub image_url: Option<String>,

    #[arg(long)]
    pub language: Option<String>,

    #[arg(long)]
    pub price: Option<f64>,
}

impl BookFields {
    pub fn into_draft(self) -> BookDraft {
        BookDraft {
            title: self.title.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            image_url: self.image_url,
            language: self.language,
            price: self.price.unwrap_or_default(),
        }
        .normalized()
    }

    pub fn into_patch(self) -> BookPatch {
        BookPatch {
            title: self.title,
            author: self.author,
            description: self.description,
            image_url: self.image_url,
            language: self.language,
            price: self.price,
        }
        .normalized()
    }
}
