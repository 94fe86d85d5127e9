//! Development backend serving the `/books` REST surface from memory,
//! with the same middleware stack a production service would carry.

use std::net::SocketAddr;

use anyhow::Context;
use axum::{routing::get, Router};
use bookshelf_kernel::settings::ServerSettings;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub mod books;
pub mod error;
pub mod router;

pub use books::{BookTable, SharedTable};
use router::RouterBuilder;

/// Start the HTTP server and run until Ctrl-C.
pub async fn start_server(settings: &ServerSettings, table: SharedTable) -> anyhow::Result<()> {
    let app = build_router(table, settings);

    let listener = TcpListener::bind(format!("{}:{}", settings.host, settings.port))
        .await
        .context("failed to bind to address")?;

    tracing::info!(
        "book service listening on http://{}",
        listener.local_addr().context("listener has no local address")?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("book service stopped");
    Ok(())
}

/// Serve on an ephemeral loopback port in the background. Returns the bound
/// address; the server lives until the handle is aborted or the runtime ends.
pub async fn spawn_local(table: SharedTable) -> anyhow::Result<(SocketAddr, JoinHandle<()>)> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind loopback listener")?;
    let addr = listener.local_addr().context("listener has no local address")?;
    let app = build_router(table, &ServerSettings::default());

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "book service failed");
        }
    });

    Ok((addr, handle))
}

/// Build the main HTTP router with the books resource and middleware.
pub fn build_router(table: SharedTable, settings: &ServerSettings) -> Router {
    RouterBuilder::new()
        .route("/healthz", get(health_check))
        .merge(books::routes(table))
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(settings.request_timeout_ms)
        .build()
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
