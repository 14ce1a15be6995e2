//! SQLite-backed counter store.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};

use likes_core::error::{LikesError, Result};
use likes_core::{CounterStore, Slug};

use super::{bounded, to_count};
use crate::config::StoreConfig;

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS likes(
  slug TEXT PRIMARY KEY,
  count INTEGER NOT NULL DEFAULT 0 CHECK (count >= 0),
  updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)"#;

const INCREMENT: &str = r#"
INSERT INTO likes(slug, count, updated_at) VALUES (?1, 1, CURRENT_TIMESTAMP)
ON CONFLICT(slug) DO UPDATE SET count = likes.count + 1, updated_at = CURRENT_TIMESTAMP
RETURNING count"#;

const SELECT_COUNT: &str = "SELECT count FROM likes WHERE slug = ?1";

pub struct SqliteStore {
    pool: SqlitePool,
    op_timeout: Duration,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `cfg.url()` and ensure the
    /// `likes` table exists.
    pub async fn connect(cfg: &StoreConfig) -> Result<Self> {
        let url = cfg.url();
        let op_timeout = cfg.op_timeout();
        let opts = SqliteConnectOptions::from_str(url)
            .map_err(|e| LikesError::Internal(format!("sqlite connect options ({url}): {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(op_timeout);

        // Each connection to `:memory:` is its own database; pin a single one.
        let pool_opts = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(cfg.max_connections)
        };

        let pool = pool_opts
            .acquire_timeout(op_timeout)
            .connect_with(opts)
            .await
            .map_err(|e| LikesError::StoreUnavailable(format!("sqlite connect: {e}")))?;

        let store = Self { pool, op_timeout };
        store.migrate().await?;
        tracing::info!(url, "sqlite store opened");
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        bounded(
            "migrate",
            self.op_timeout,
            sqlx::query(CREATE_TABLE).execute(&self.pool),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl CounterStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn increment_atomic(&self, slug: &Slug) -> Result<u64> {
        let raw: i64 = bounded(
            "increment",
            self.op_timeout,
            sqlx::query_scalar(INCREMENT)
                .bind(slug.as_str())
                .fetch_one(&self.pool),
        )
        .await?;
        to_count(raw)
    }

    async fn get(&self, slug: &Slug) -> Result<u64> {
        let raw: Option<i64> = bounded(
            "get",
            self.op_timeout,
            sqlx::query_scalar(SELECT_COUNT)
                .bind(slug.as_str())
                .fetch_optional(&self.pool),
        )
        .await?;
        raw.map_or(Ok(0), to_count)
    }

    async fn ping(&self) -> Result<()> {
        bounded("ping", self.op_timeout, sqlx::query("SELECT 1").execute(&self.pool)).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
