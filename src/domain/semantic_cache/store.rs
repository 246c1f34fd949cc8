//! Semantic cache store trait and result types

use std::fmt::Debug;

use async_trait::async_trait;
use serde::Serialize;

use super::CacheEntry;
use crate::domain::DomainError;

/// The best match found by a similarity search
#[derive(Debug, Clone)]
pub struct SimilarityMatch {
    /// The question that produced the cached SQL
    pub question: String,
    /// The cached SQL
    pub sql: String,
    /// Similarity score against the query embedding
    pub similarity: f32,
}

impl SimilarityMatch {
    pub fn new(question: impl Into<String>, sql: impl Into<String>, similarity: f32) -> Self {
        Self {
            question: question.into(),
            sql: sql.into(),
            similarity,
        }
    }
}

/// Read-only snapshot of the store
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    /// Current number of entries
    pub entry_count: usize,
    /// Where the store persists its entries
    pub storage_location: String,
    /// Configured capacity
    pub max_entries: usize,
    /// Configured similarity threshold
    pub similarity_threshold: f32,
}

/// Trait for semantic (embedding-based) cache stores
#[async_trait]
pub trait SemanticCache: Send + Sync + Debug {
    /// Find the most similar entry at or above the configured threshold
    async fn find_similar(
        &self,
        embedding: &[f32],
    ) -> Result<Option<SimilarityMatch>, DomainError>;

    /// Append an entry, evicting the oldest if capacity is exceeded
    async fn append(&self, entry: CacheEntry) -> Result<(), DomainError>;

    /// Get a snapshot of the store state
    async fn stats(&self) -> Result<CacheStats, DomainError>;

    /// Remove all entries, returning how many were removed
    async fn clear(&self) -> Result<usize, DomainError>;
}
