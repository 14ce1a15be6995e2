//! Shared error type across likes crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Slug missing, empty, too long or malformed.
    InvalidKey,
    /// Counter store unreachable, failed, or timed out.
    StoreUnavailable,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::InvalidKey => "INVALID_KEY",
            ClientCode::StoreUnavailable => "STORE_UNAVAILABLE",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, LikesError>;

/// Unified error type used by core and gateway.
///
/// Reading an unknown slug is not an error: it yields a count of zero.
#[derive(Debug, Error)]
pub enum LikesError {
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl LikesError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            LikesError::InvalidKey(_) => ClientCode::InvalidKey,
            LikesError::StoreUnavailable(_) => ClientCode::StoreUnavailable,
            LikesError::Internal(_) => ClientCode::Internal,
        }
    }

    /// Whether a caller may retry the same request later.
    pub fn is_transient(&self) -> bool {
        matches!(self, LikesError::StoreUnavailable(_))
    }
}
