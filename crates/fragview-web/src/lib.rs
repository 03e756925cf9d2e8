use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{Router, routing::get};

use fragview_core::Searcher;

mod dto;
mod error;
mod handlers;

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub(crate) struct WebState {
    pub(crate) searcher: Arc<Searcher>,
}

/// Start the search server and block until shutdown.
///
/// # Errors
/// Returns an error when the runtime cannot be created, the socket cannot be
/// bound, or the server exits with a runtime failure.
pub fn serve_web(searcher: Searcher, host: &str, port: u16) -> Result<()> {
    let state = WebState {
        searcher: Arc::new(searcher),
    };
    let bind_addr = format!("{host}:{port}");
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build web runtime")?;

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("failed to bind search server at {bind_addr}"))?;
        tracing::info!("search server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, app_router(state))
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await
            .context("search server failed")
    })
}

pub(crate) fn app_router(state: WebState) -> Router {
    Router::new()
        .route("/search", get(handlers::search))
        .route("/load", get(handlers::load))
        .with_state(state)
}
