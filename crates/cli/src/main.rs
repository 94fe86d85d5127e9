//! Bookshelf CLI: the `bookshelf` command.

mod cli;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use bookshelf_app::{BookApi, BookId, BookStore, FetchOutcome, HttpBookApi};
use bookshelf_http::BookTable;
use bookshelf_kernel::settings::Settings;
use clap::Parser;
use cli::{BookFields, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load Bookshelf settings")?;
    if let Some(base_url) = cli.base_url {
        settings.api.base_url = base_url;
    }

    bookshelf_telemetry::init(&settings.telemetry)?;

    tracing::debug!(
        env = ?settings.environment,
        api = %settings.api.base_url,
        "bookshelf starting"
    );

    match cli.command {
        Commands::Serve { seed } => serve(&settings, seed).await,
        Commands::List { json } => list(&settings, json).await,
        Commands::Show { id, json } => show(&settings, &id, json).await,
        Commands::Add { fields } => add(&settings, fields).await,
        Commands::Edit { id, fields } => edit(&settings, &id, fields).await,
        Commands::Delete { id } => delete(&settings, &id).await,
    }
}

async fn serve(settings: &Settings, seed: Option<PathBuf>) -> anyhow::Result<()> {
    let table = match seed {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read seed file {}", path.display()))?;
            let rows = bookshelf_http::books::parse_seed(&raw)?;
            tracing::info!(count = rows.len(), path = %path.display(), "seeded book table");
            BookTable::seeded(rows)
                .with_context(|| format!("invalid seed file {}", path.display()))?
        }
        None => BookTable::new(),
    };

    bookshelf_http::start_server(&settings.server, table.into_shared()).await
}

fn api(settings: &Settings) -> anyhow::Result<Arc<HttpBookApi>> {
    let api = HttpBookApi::from_settings(&settings.api).context("failed to build book API client")?;
    Ok(Arc::new(api))
}

async fn list(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let store = BookStore::new(api(settings)?);
    refresh(&store).await?;

    let books = store.books();
    if json {
        println!("{}", serde_json::to_string_pretty(&books)?);
    } else {
        println!("{}", output::book_list(&books));
    }
    Ok(())
}

async fn show(settings: &Settings, id: &BookId, json: bool) -> anyhow::Result<()> {
    let book = api(settings)?.get_book(id).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&book)?);
    } else {
        println!("{}", output::book_detail(&book));
    }
    Ok(())
}

async fn add(settings: &Settings, fields: BookFields) -> anyhow::Result<()> {
    let draft = fields.into_draft();
    draft.validate().context("invalid book")?;

    let store = BookStore::new(api(settings)?);
    let book = store.create(draft).await.context("failed to add book")?;
    println!("added {}", output::book_line(&book).trim_start());
    Ok(())
}

async fn edit(settings: &Settings, id: &BookId, fields: BookFields) -> anyhow::Result<()> {
    let patch = fields.into_patch();
    if patch.is_empty() {
        bail!("nothing to change; pass at least one field");
    }
    patch.validate().context("invalid book")?;

    let store = BookStore::new(api(settings)?);
    refresh(&store).await?;
    let merged = store
        .update(id, patch)
        .await
        .with_context(|| format!("failed to edit book {id}"))?;
    match merged {
        Some(book) => println!("updated {}", output::book_line(&book).trim_start()),
        None => println!("updated {id}"),
    }
    Ok(())
}

async fn delete(settings: &Settings, id: &BookId) -> anyhow::Result<()> {
    let store = BookStore::new(api(settings)?);
    let deleted = store
        .delete(id)
        .await
        .with_context(|| format!("failed to delete book {id}"))?;
    println!("deleted {deleted}");
    Ok(())
}

/// Load the cache, turning a failed fetch into an error for the user.
async fn refresh(store: &BookStore) -> anyhow::Result<()> {
    match store.fetch_all().await {
        FetchOutcome::Loaded(_) | FetchOutcome::Superseded => Ok(()),
        FetchOutcome::Failed(message) => bail!("failed to load books: {message}"),
    }
}
