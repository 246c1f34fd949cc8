//! Semantic cache domain models and traits
//!
//! Caches question-to-SQL mappings keyed by embedding similarity, so
//! semantically similar questions reuse previously generated SQL instead of
//! requiring exact text matches.

mod config;
mod entry;
mod store;

pub use config::SemanticCacheConfig;
pub use entry::CacheEntry;
pub use store::{CacheStats, SemanticCache, SimilarityMatch};
