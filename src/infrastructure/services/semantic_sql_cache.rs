//! Semantic SQL caching service
//!
//! Owns the embedding call on both the lookup and the store path, and the
//! fail-open policy around it: a cache-layer failure never blocks the
//! caller's generate-or-execute flow. Lookup degrades to a miss, store
//! degrades to a no-op, always with a logged warning.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::embedding::EmbeddingProvider;
use crate::domain::semantic_cache::{CacheEntry, CacheStats, SemanticCache, SimilarityMatch};
use crate::domain::DomainError;

/// Semantic cache service that uses embeddings for similarity matching
#[derive(Debug)]
pub struct SemanticSqlCacheService {
    cache: Arc<dyn SemanticCache>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
}

impl SemanticSqlCacheService {
    /// Create a new semantic SQL cache service
    pub fn new(cache: Arc<dyn SemanticCache>, embedding_provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            cache,
            embedding_provider,
        }
    }

    /// Look up cached SQL for a semantically similar question.
    ///
    /// Fail-open: embedding or store failures degrade to a miss so the
    /// caller falls through to generation.
    pub async fn find_similar(&self, question: &str) -> Option<SimilarityMatch> {
        let embedding = match self.embedding_provider.embed(question).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!("Failed to embed question for cache lookup: {}", e);
                return None;
            }
        };

        match self.cache.find_similar(&embedding).await {
            Ok(Some(found)) => {
                debug!(
                    similarity = found.similarity,
                    cached_question = %found.question,
                    "Semantic cache hit"
                );
                Some(found)
            }
            Ok(None) => {
                debug!("Semantic cache miss");
                None
            }
            Err(e) => {
                warn!("Semantic cache lookup failed: {}", e);
                None
            }
        }
    }

    /// Store a question-to-SQL mapping.
    ///
    /// Fail-open: embedding or store failures degrade to a no-op. The
    /// caller already holds its SQL and must be able to return it.
    pub async fn store(&self, question: &str, sql: &str) {
        let embedding = match self.embedding_provider.embed(question).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!("Failed to embed question for caching, entry not stored: {}", e);
                return;
            }
        };

        let entry = CacheEntry::new(question, embedding, sql);

        if let Err(e) = self.cache.append(entry).await {
            warn!("Failed to store semantic cache entry: {}", e);
        } else {
            debug!(question = %question, "Cached generated SQL");
        }
    }

    /// Get a snapshot of the store state
    pub async fn stats(&self) -> Result<CacheStats, DomainError> {
        self.cache.stats().await
    }

    /// Remove all cached entries, returning how many were removed
    pub async fn clear(&self) -> Result<usize, DomainError> {
        self.cache.clear().await
    }
}
