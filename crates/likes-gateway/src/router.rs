//! Axum router wiring.

use axum::{middleware, routing::get, Router};

use crate::{api, app_state::AppState, obs, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/likes/",
            get(api::likes::get_likes_empty).post(api::likes::increment_likes_empty),
        )
        .route(
            "/v1/likes/*slug",
            get(api::likes::get_likes).post(api::likes::increment_likes),
        )
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            obs::access_log::access_log,
        ))
        .with_state(state)
}
