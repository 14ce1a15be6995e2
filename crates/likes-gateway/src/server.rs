//! Serve the router until shutdown, then release the store.

use std::future::Future;
use std::net::SocketAddr;

use likes_core::error::{LikesError, Result};

use crate::{app_state::AppState, router};

/// Bind `listen`, serve until `shutdown` resolves, then close the store.
/// The store is closed on every exit path, including a failed bind.
pub async fn serve<F>(listen: SocketAddr, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let served = run(listen, state.clone(), shutdown).await;

    state.store().close().await;
    tracing::info!(backend = state.store().backend(), "counter store closed");

    served
}

async fn run<F>(listen: SocketAddr, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| LikesError::Internal(format!("bind {listen} failed: {e}")))?;
    tracing::info!(%listen, backend = state.store().backend(), "likes-gateway listening");

    let app = router::build_router(state);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
    .map_err(|e| LikesError::Internal(format!("server failed: {e}")))
}
