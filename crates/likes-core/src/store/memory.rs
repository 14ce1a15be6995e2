use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::Result;
use crate::slug::Slug;

use super::CounterStore;

/// Process-local store backed by `DashMap`.
///
/// The increment runs while holding the shard's entry guard, so it is atomic
/// per slug; distinct slugs on distinct shards proceed in parallel.
/// Not durable: counts live as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    counts: DashMap<String, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            counts: DashMap::new(),
        }
    }

    /// Number of slugs that have at least one like.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[async_trait]
impl CounterStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn increment_atomic(&self, slug: &Slug) -> Result<u64> {
        let mut entry = self.counts.entry(slug.as_str().to_owned()).or_insert(0);
        *entry += 1;
        Ok(*entry)
    }

    async fn get(&self, slug: &Slug) -> Result<u64> {
        Ok(self.counts.get(slug.as_str()).map(|c| *c).unwrap_or(0))
    }
}
