//! Postgres-backed counter store.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use likes_core::error::{LikesError, Result};
use likes_core::{CounterStore, Slug};

use super::{bounded, to_count};
use crate::config::StoreConfig;

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS likes(
  slug TEXT PRIMARY KEY,
  count BIGINT NOT NULL DEFAULT 0 CHECK (count >= 0),
  updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
)"#;

const INCREMENT: &str = r#"
INSERT INTO likes(slug, count, updated_at) VALUES ($1, 1, now())
ON CONFLICT (slug) DO UPDATE SET count = likes.count + 1, updated_at = now()
RETURNING count"#;

const SELECT_COUNT: &str = "SELECT count FROM likes WHERE slug = $1";

pub struct PostgresStore {
    pool: PgPool,
    op_timeout: Duration,
}

impl PostgresStore {
    pub async fn connect(cfg: &StoreConfig) -> Result<Self> {
        let op_timeout = cfg.op_timeout();
        let pool = PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .acquire_timeout(op_timeout)
            .connect(cfg.url())
            .await
            .map_err(|e| LikesError::StoreUnavailable(format!("postgres connect: {e}")))?;

        let store = Self { pool, op_timeout };
        bounded(
            "migrate",
            op_timeout,
            sqlx::query(CREATE_TABLE).execute(&store.pool),
        )
        .await?;
        tracing::info!(max_connections = cfg.max_connections, "postgres store opened");
        Ok(store)
    }
}

#[async_trait]
impl CounterStore for PostgresStore {
    fn backend(&self) -> &'static str {
        "postgres"
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
