//! Operational HTTP endpoints.
//!
//! - `/healthz` : liveness
//! - `/readyz`  : readiness (503 when draining or the store is unreachable)
//! - `/metrics` : Prometheus text format

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::app_state::AppState;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    if state.is_draining() {
        return (StatusCode::SERVICE_UNAVAILABLE, "draining");
    }
    match state.store().ping().await {
        Ok(()) => (StatusCode::OK, "ready"),
        Err(e) => {
            tracing::warn!(backend = state.store().backend(), error = %e, "readiness probe failed");
            (StatusCode::SERVICE_UNAVAILABLE, "store unavailable")
        }
    }
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let extra = state.metrics_extra();
    let body = state.metrics().render(&extra);

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}
