//! likes core: slug keys, the counter store contract, and the counter service.
//!
//! This crate defines the atomic-increment contract shared by every storage
//! backend and the thin service the HTTP layer calls into. It carries no
//! transport or SQL dependencies so the store can be swapped (the bundled
//! [`store::MemoryStore`] doubles as the in-memory fake for tests).
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `LikesError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod record;
pub mod service;
pub mod slug;
pub mod store;

/// Shared result type.
pub use error::{Result, LikesError};
pub use record::CounterRecord;
pub use service::CounterService;
pub use slug::{Slug, DEFAULT_MAX_SLUG_LEN};
pub use store::{CounterStore, MemoryStore};
