//! Observability: in-process metrics and the per-request access log.

pub mod access_log;
pub mod metrics;

pub use metrics::LikesMetrics;
