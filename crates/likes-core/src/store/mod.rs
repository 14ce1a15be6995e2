//! Counter store contract.
//!
//! A store owns consistency: `increment_atomic` must be a single
//! engine-level "insert or add one, returning the new value" step so that
//! N concurrent increments on one slug return exactly `k+1..=k+N`.

pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::slug::Slug;

pub use memory::MemoryStore;

#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Short backend name for logs and metric labels.
    fn backend(&self) -> &'static str;

    /// Add one to the count for `slug`, creating it at 1 if absent.
    /// Returns the post-increment value.
    async fn increment_atomic(&self, slug: &Slug) -> Result<u64>;

    /// Current count for `slug`, or 0 if it was never incremented.
    /// Never creates a record.
    async fn get(&self, slug: &Slug) -> Result<u64>;

    /// Reachability probe used by readiness checks.
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    /// Release pooled resources. Safe to call more than once.
    async fn close(&self) {}
}
