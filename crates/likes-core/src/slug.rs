//! Validated counter key.
//!
//! Slugs are opaque: the only checks are non-empty, a byte-length ceiling,
//! and no control characters (the SQL engines cannot store e.g. NUL in text).
//! Stores accept only a parsed [`Slug`], so an invalid key never reaches them.

use std::fmt;

use crate::error::{LikesError, Result};

/// Default byte-length ceiling for a slug.
pub const DEFAULT_MAX_SLUG_LEN: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    /// Validate `raw` against `max_len` (bytes).
    pub fn parse(raw: &str, max_len: usize) -> Result<Self> {
        if raw.is_empty() {
            return Err(LikesError::InvalidKey("slug must not be empty".into()));
        }
        if raw.len() > max_len {
            return Err(LikesError::InvalidKey(format!(
                "slug exceeds {max_len} bytes (got {})",
                raw.len()
            )));
        }
        if raw.chars().any(char::is_control) {
            return Err(LikesError::InvalidKey(
                "slug must not contain control characters".into(),
            ));
        }
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
