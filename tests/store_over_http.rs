//! The store and HTTP client driven against the in-memory book service.

use std::net::SocketAddr;
use std::sync::Arc;

use bookshelf_app::{
    ApiError, Book, BookApi, BookDraft, BookId, BookPatch, BookStore, FetchOutcome, HttpBookApi,
    LoadStatus,
};
use bookshelf_http::{books::parse_seed, spawn_local, BookTable, SharedTable};

async fn serve(table: SharedTable) -> anyhow::Result<(HttpBookApi, SocketAddr)> {
    let (addr, _handle) = spawn_local(table).await?;
    let api = HttpBookApi::new(&format!("http://{addr}/"))?;
    Ok((api, addr))
}

fn seed() -> Vec<Book> {
    parse_seed(
        r#"{"books": [
            {"id": 1, "title": "A", "author": "X"},
            {"id": 2, "title": "B", "author": "Y", "language": "French", "price": 4.5}
        ]}"#,
    )
    .unwrap()
}

#[tokio::test]
async fn client_covers_every_endpoint() -> anyhow::Result<()> {
    let (api, _) = serve(BookTable::seeded(seed())?.into_shared()).await?;

    let books = api.list_books().await?;
    assert_eq!(books.len(), 2);
    assert_eq!(books[1].language.as_deref(), Some("French"));

    let fetched = api.get_book(&BookId::Number(2)).await?;
    assert_eq!(fetched.price, 4.5);

    let created = api.create_book(&BookDraft::new("C", "Z")).await?;
    assert_eq!(created.id, BookId::Number(3));

    let patch = BookPatch {
        description: Some("third".to_string()),
        ..BookPatch::default()
    };
    let updated = api.update_book(&created.id, &patch).await?;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.changes.title.as_deref(), Some("C"));
    assert_eq!(updated.changes.description.as_deref(), Some("third"));

    assert_eq!(api.delete_book(&created.id).await?, BookId::Number(3));
    assert_eq!(api.list_books().await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn missing_book_is_not_found() -> anyhow::Result<()> {
    let (api, _) = serve(BookTable::new().into_shared()).await?;

    let err = api.get_book(&BookId::Number(42)).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(BookId::Number(42))));

    let err = api
        .update_book(&BookId::Number(42), &BookPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404, .. }), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn rejected_create_carries_status_and_body() -> anyhow::Result<()> {
    let (api, _) = serve(BookTable::new().into_shared()).await?;

    let err = api.create_book(&BookDraft::new("", "Z")).await.unwrap_err();
    match err {
        ApiError::Http { status, body } => {
            assert_eq!(status, 422);
            let body: serde_json::Value = serde_json::from_str(&body)?;
            assert_eq!(body["error"]["code"], "validation_error");
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn text_ids_survive_the_url() -> anyhow::Result<()> {
    let rows = parse_seed(r#"[{"id": "shelf a/1", "title": "A", "author": "X"}]"#)?;
    let (api, _) = serve(BookTable::seeded(rows)?.into_shared()).await?;

    let book = api.get_book(&BookId::from("shelf a/1")).await?;
    assert_eq!(book.title, "A");
    Ok(())
}

#[tokio::test]
async fn store_mirrors_the_service() -> anyhow::Result<()> {
    let table = BookTable::seeded(seed())?.into_shared();
    let (api, _) = serve(table.clone()).await?;
    let store = BookStore::new(Arc::new(api));

    assert_eq!(store.fetch_all().await, FetchOutcome::Loaded(2));
    assert_eq!(store.books(), table.read().await.rows());

    let created = store.create(BookDraft::new("C", "Z")).await?;
    let patch = BookPatch {
        title: Some("A, revised".to_string()),
        ..BookPatch::default()
    };
    let merged = store.update(&BookId::Number(1), patch).await?;
    assert_eq!(merged.map(|b| b.author), Some("X".to_string()));
    store.delete(&BookId::Number(2)).await?;

    let titles: Vec<String> = store.books().into_iter().map(|b| b.title).collect();
    assert_eq!(titles, vec!["A, revised".to_string(), "C".to_string()]);
    assert_eq!(store.find(&created.id).map(|b| b.author), Some("Z".to_string()));

    // A fresh fetch agrees with what was reconciled locally.
    let local = store.books();
    store.fetch_all().await;
    assert_eq!(store.books(), local);
    assert_eq!(store.status(), LoadStatus::Succeeded);
    Ok(())
}

#[tokio::test]
async fn store_records_unreachable_service() -> anyhow::Result<()> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);

    let store = BookStore::new(Arc::new(HttpBookApi::new(&format!("http://{addr}/"))?));
    let outcome = store.fetch_all().await;

    assert!(matches!(outcome, FetchOutcome::Failed(_)));
    assert_eq!(store.status(), LoadStatus::Failed);
    assert!(store
        .last_error()
        .is_some_and(|message| message.starts_with("network error")));
    Ok(())
}
