//! likes gateway
//!
//! - `GET/POST /v1/likes/{slug}` backed by an atomic counter store
//! - Store backend and pool from `likes.yaml` (or `$LIKES_CONFIG`)
//! - Graceful shutdown: drain, stop accepting, then close the pool

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use likes_core::error::Result;
use likes_gateway::{app_state::AppState, config, server, store};

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "likes-gateway failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let path = config::config_path();
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.server.listen_addr()?;

    let store = store::connect(&cfg.store).await?;
    let state = AppState::new(cfg, store);

    tracing::info!(%listen, config = %path, "likes-gateway starting");
    server::serve(listen, state.clone(), shutdown_signal(state)).await
}

async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    state.set_draining();
    tracing::info!("signal received, draining and starting graceful shutdown");
}
