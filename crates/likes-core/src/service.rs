//! Counter service: the single entry point the HTTP layer calls into.
//!
//! Pure delegation. The service validates the raw slug, hands the call to the
//! store, and passes results and errors through unchanged. It holds no locks
//! and no cache; the store is the only place state lives.

use std::sync::Arc;

use crate::error::Result;
use crate::slug::{Slug, DEFAULT_MAX_SLUG_LEN};
use crate::store::CounterStore;

#[derive(Clone)]
pub struct CounterService {
    store: Arc<dyn CounterStore>,
    max_slug_len: usize,
}

impl CounterService {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self::with_max_slug_len(store, DEFAULT_MAX_SLUG_LEN)
    }

    pub fn with_max_slug_len(store: Arc<dyn CounterStore>, max_slug_len: usize) -> Self {
        Self {
            store,
            max_slug_len,
        }
    }

    /// Atomically add one like to `slug`; returns the new count.
    pub async fn increment(&self, slug: &str) -> Result<u64> {
        let slug = Slug::parse(slug, self.max_slug_len)?;
        let count = self.store.increment_atomic(&slug).await?;
        tracing::debug!(%slug, count, backend = self.store.backend(), "like incremented");
        Ok(count)
    }

    /// Current count for `slug`; 0 when it was never liked.
    pub async fn get(&self, slug: &str) -> Result<u64> {
        let slug = Slug::parse(slug, self.max_slug_len)?;
        let count = self.store.get(&slug).await?;
        tracing::debug!(%slug, count, backend = self.store.backend(), "like count read");
        Ok(count)
    }

    pub fn store(&self) -> &Arc<dyn CounterStore> {
        &self.store
    }

    pub fn max_slug_len(&self) -> usize {
        self.max_slug_len
    }
}
