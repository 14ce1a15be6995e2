//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;

use likes_core::error::{LikesError, Result};

pub use schema::{LikesConfig, ServerSection, StoreBackend, StoreConfig};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "LIKES_CONFIG";
/// Environment variable overriding `store.url`.
pub const DATABASE_URL_ENV: &str = "LIKES_DATABASE_URL";

const DEFAULT_CONFIG_PATH: &str = "likes.yaml";

/// Config path from `LIKES_CONFIG`, falling back to `likes.yaml`.
pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

pub fn load_from_file(path: &str) -> Result<LikesConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| LikesError::Internal(format!("read config failed ({path}): {e}")))?;
    let mut cfg = parse(&s)?;
    if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
        cfg.store.url = Some(url);
    }
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_str(s: &str) -> Result<LikesConfig> {
    let cfg = parse(s)?;
    cfg.validate()?;
    Ok(cfg)
}

fn parse(s: &str) -> Result<LikesConfig> {
    serde_yaml::from_str(s).map_err(|e| LikesError::Internal(format!("invalid yaml: {e}")))
}
