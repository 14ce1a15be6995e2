use serde::{Deserialize, Serialize};

/// Current like count for a slug, as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterRecord {
    pub slug: String,
    pub count: u64,
}

impl CounterRecord {
    pub fn new(slug: impl Into<String>, count: u64) -> Self {
        Self {
            slug: slug.into(),
            count,
        }
    }
}
