use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;

use likes_core::error::{LikesError, Result};
use likes_core::DEFAULT_MAX_SLUG_LEN;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LikesConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub store: StoreConfig,
}

impl LikesConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(LikesError::Internal(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.store.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            LikesError::Internal(format!(
                "server.listen must be a valid SocketAddr ({}): {e}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Sqlite,
    Postgres,
}

impl StoreBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreBackend::Memory => "memory",
            StoreBackend::Sqlite => "sqlite",
            StoreBackend::Postgres => "postgres",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,

    /// Connection URL. Required for postgres; sqlite falls back to `sqlite://likes.db`.
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Upper bound for one store operation, including pool acquisition.
    #[serde(default = "default_op_timeout_ms")]
    pub op_timeout_ms: u64,

    #[serde(default = "default_max_slug_len")]
    pub max_slug_len: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            url: None,
            max_connections: default_max_connections(),
            op_timeout_ms: default_op_timeout_ms(),
            max_slug_len: default_max_slug_len(),
        }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=256).contains(&self.max_connections) {
            return Err(LikesError::Internal(
                "store.max_connections must be between 1 and 256".into(),
            ));
        }
        if !(100..=60000).contains(&self.op_timeout_ms) {
            return Err(LikesError::Internal(
                "store.op_timeout_ms must be between 100 and 60000".into(),
            ));
        }
        if !(1..=4096).contains(&self.max_slug_len) {
            return Err(LikesError::Internal(
                "store.max_slug_len must be between 1 and 4096".into(),
            ));
        }
        match (self.backend, self.url.as_deref()) {
            (StoreBackend::Postgres, None | Some("")) => Err(LikesError::Internal(
                "store.url is required for the postgres backend".into(),
            )),
            (StoreBackend::Sqlite, Some("")) => Err(LikesError::Internal(
                "store.url must not be empty".into(),
            )),
            _ => Ok(()),
        }
    }

    pub fn op_timeout(&self) -> Duration {
        Duration::from_millis(self.op_timeout_ms)
    }

    /// Effective connection URL for SQL backends.
    pub fn url(&self) -> &str {
        match (&self.url, self.backend) {
            (Some(u), _) => u.as_str(),
            (None, StoreBackend::Sqlite) => "sqlite://likes.db",
            (None, _) => "",
        }
    }
}

fn default_backend() -> StoreBackend {
    StoreBackend::Sqlite
}
fn default_max_connections() -> u32 {
    10
}
fn default_op_timeout_ms() -> u64 {
    3000
}
fn default_max_slug_len() -> usize {
    DEFAULT_MAX_SLUG_LEN
}
