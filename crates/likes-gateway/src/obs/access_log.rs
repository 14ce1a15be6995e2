//! Per-request access log middleware.
//!
//! One event per request once the response status is known:
//! - 5xx at `error`
//! - 401/403 at `warn`
//! - everything else at `debug`
//!
//! 404s for static-asset probes (favicon, robots.txt, `/.well-known`, ...)
//! are dropped entirely; scanners generate a lot of them.
//!
//! Request and response bodies are logged too, cut at `MAX_BODY_LENGTH`
//! characters. A body is only buffered when its exact size is known and at
//! most `MAX_CAPTURE_BYTES`; anything else passes through untouched.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::{Body, HttpBody},
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;

const MAX_BODY_LENGTH: usize = 2048;
const MAX_CAPTURE_BYTES: u64 = 64 * 1024;

const STATIC_PREFIXES: [&str; 4] = ["/.well-known", "/static/", "/assets/", "/webjars/"];
const STATIC_PATHS: [&str; 2] = ["/favicon.ico", "/robots.txt"];
const STATIC_EXTENSIONS: [&str; 10] = [
    ".css", ".js", ".png", ".jpg", ".jpeg", ".gif", ".svg", ".ico", ".txt", ".map",
];

/// Decrements the in-flight gauge even if the client goes away mid-request.
struct InflightGuard<'a>(&'a AppState);

impl<'a> InflightGuard<'a> {
    fn enter(state: &'a AppState) -> Self {
        state.metrics().requests_inflight.inc(&[]);
        Self(state)
    }
}

impl Drop for InflightGuard<'_> {
    fn drop(&mut self) {
        self.0.metrics().requests_inflight.dec(&[]);
    }
}

pub async fn access_log(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let _inflight = InflightGuard::enter(&state);

    let method = req.method().clone();
    let uri = req.uri().clone();
    let client_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "<unknown>".to_string());
    let x_forwarded_for = header_value(req.headers(), "x-forwarded-for");
    let user_agent = header_value(req.headers(), "user-agent");

    let (parts, body) = req.into_parts();
    let (body, request_body) = capture_body(body).await;
    let req = Request::from_parts(parts, body);

    let started = Instant::now();
    let resp = next.run(req).await;
    let duration_ms = started.elapsed().as_millis() as u64;

    let status = resp.status();
    if should_skip(uri.path(), status) {
        return resp;
    }

    let loud = status.is_server_error() || is_auth_failure(status);
    if !loud && !tracing::enabled!(tracing::Level::DEBUG) {
        return resp;
    }

    let (parts, body) = resp.into_parts();
    let (body, response_body) = capture_body(body).await;
    let resp = Response::from_parts(parts, body);

    macro_rules! emit {
        ($lvl:ident) => {
            tracing::$lvl!(
                method = %method,
                uri = %uri,
                status = status.as_u16(),
                duration_ms,
                client_ip = %client_ip,
                x_forwarded_for = %x_forwarded_for,
                user_agent = %user_agent,
                request_body = %request_body,
                response_body = %response_body,
                "http request"
            )
        };
    }

    if status.is_server_error() {
        emit!(error);
    } else if is_auth_failure(status) {
        emit!(warn);
    } else {
        emit!(debug);
    }

    resp
}

/// Buffer a body of known, bounded size and return it rebuilt alongside its
/// display form.
pub(crate) async fn capture_body(body: Body) -> (Body, String) {
    match body.size_hint().exact() {
        Some(0) => (body, "<empty>".to_string()),
        Some(n) if n <= MAX_CAPTURE_BYTES => match axum::body::to_bytes(body, n as usize).await {
            Ok(bytes) => {
                let shown = display_body(&bytes);
                (Body::from(bytes), shown)
            }
            // The stream already failed; downstream would have seen the same error.
            Err(e) => (Body::empty(), format!("<unreadable: {e}>")),
        },
        _ => (body, "<not captured>".to_string()),
    }
}

fn display_body(bytes: &[u8]) -> String {
    let payload = String::from_utf8_lossy(bytes);
    if payload.chars().count() > MAX_BODY_LENGTH {
        let mut cut: String = payload.chars().take(MAX_BODY_LENGTH).collect();
        cut.push_str("...(truncated)");
        cut
    } else {
        payload.into_owned()
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("<absent>")
        .to_string()
}

fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

pub(crate) fn should_skip(path: &str, status: StatusCode) -> bool {
    status == StatusCode::NOT_FOUND && is_noisy_static_probe(path)
}

fn is_noisy_static_probe(path: &str) -> bool {
    STATIC_PATHS.contains(&path)
        || STATIC_PREFIXES.iter().any(|p| path.starts_with(p))
        || STATIC_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}
