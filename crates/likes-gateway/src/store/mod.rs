//! Durable counter stores and backend selection.
//!
//! Both SQL stores increment with one `INSERT .. ON CONFLICT (slug) DO UPDATE
//! .. RETURNING count` statement; the engine's row lock serializes same-slug
//! writers. Every operation is bounded by `store.op_timeout_ms`.

pub mod postgres;
pub mod sqlite;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use likes_core::error::{LikesError, Result};
use likes_core::{CounterStore, MemoryStore};

use crate::config::{StoreBackend, StoreConfig};

pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;

/// Open the configured backend. The returned handle owns the connection pool;
/// call `close()` on shutdown.
pub async fn connect(cfg: &StoreConfig) -> Result<Arc<dyn CounterStore>> {
    let store: Arc<dyn CounterStore> = match cfg.backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::Sqlite => Arc::new(SqliteStore::connect(cfg).await?),
        StoreBackend::Postgres => Arc::new(PostgresStore::connect(cfg).await?),
    };
    tracing::info!(backend = store.backend(), "counter store ready");
    Ok(store)
}

/// Run one store statement under `timeout`, mapping driver errors and
/// elapsed deadlines to `StoreUnavailable`.
///
/// If the deadline fires after the engine committed, the increment stays
/// applied; only the caller stops waiting.
pub(crate) async fn bounded<T, F>(op: &'static str, timeout: Duration, fut: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(v)) => Ok(v),
        Ok(Err(e)) => Err(LikesError::StoreUnavailable(format!("{op}: {e}"))),
        Err(_) => Err(LikesError::StoreUnavailable(format!(
            "{op}: timed out after {}ms",
            timeout.as_millis()
        ))),
    }
}

/// SQL integers are signed; a negative stored count means the table was
/// written outside this service.
pub(crate) fn to_count(raw: i64) -> Result<u64> {
    u64::try_from(raw).map_err(|_| LikesError::Internal(format!("negative stored count: {raw}")))
}
