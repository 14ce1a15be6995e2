use std::time::Instant;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::HeaderMap,
    Json,
};

use likes_core::error::{LikesError, Result};
use likes_core::CounterRecord;

use super::ApiError;
use crate::app_state::AppState;

const IDEMPOTENCY_KEY: &str = "idempotency-key";

type ApiResult = std::result::Result<Json<CounterRecord>, ApiError>;

pub async fn get_likes(
    State(app): State<AppState>,
    slug: std::result::Result<Path<String>, PathRejection>,
) -> ApiResult {
    read(&app, captured_slug(slug)?).await
}

/// `/v1/likes/` with nothing after it: an empty slug.
pub async fn get_likes_empty(State(app): State<AppState>) -> ApiResult {
    read(&app, String::new()).await
}

/// Idempotency keys are accepted but not deduplicated: a retried POST with
/// the same key increments again.
pub async fn increment_likes(
    State(app): State<AppState>,
    slug: std::result::Result<Path<String>, PathRejection>,
    headers: HeaderMap,
) -> ApiResult {
    increment(&app, captured_slug(slug)?, &headers).await
}

pub async fn increment_likes_empty(State(app): State<AppState>, headers: HeaderMap) -> ApiResult {
    increment(&app, String::new(), &headers).await
}

async fn read(app: &AppState, slug: String) -> ApiResult {
    let started = Instant::now();
    let res = app.service().get(&slug).await;
    app.metrics().observe_op("get", started.elapsed(), &res);

    let count = log_failure("get", &slug, res)?;
    Ok(Json(CounterRecord::new(slug, count)))
}

async fn increment(app: &AppState, slug: String, headers: &HeaderMap) -> ApiResult {
    if let Some(key) = headers.get(IDEMPOTENCY_KEY).and_then(|v| v.to_str().ok()) {
        tracing::debug!(%slug, idempotency_key = key, "idempotency key ignored");
    }

    let started = Instant::now();
    let res = app.service().increment(&slug).await;
    app.metrics().observe_op("increment", started.elapsed(), &res);

    let count = log_failure("increment", &slug, res)?;
    Ok(Json(CounterRecord::new(slug, count)))
}

// The capture is passed through byte for byte; e.g. percent-decoding to invalid UTF-8 is a bad key.
fn captured_slug(slug: std::result::Result<Path<String>, PathRejection>) -> Result<String> {
    slug.map(|Path(s)| s).map_err(|rej| {
        LikesError::InvalidKey(format!("slug is not a valid path segment: {}", rej.body_text()))
    })
}

fn log_failure(op: &'static str, slug: &str, res: Result<u64>) -> Result<u64> {
    if let Err(e) = &res {
        match e {
            LikesError::InvalidKey(_) => tracing::debug!(op, slug, error = %e, "rejected slug"),
            _ => tracing::warn!(op, slug, error = %e, "counter operation failed"),
        }
    }
    res
}
