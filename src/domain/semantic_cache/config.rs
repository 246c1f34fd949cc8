//! Semantic cache configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the semantic cache store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticCacheConfig {
    /// Similarity threshold for cache hits (0.0 to 1.0, inclusive match)
    /// Higher values require more similar questions
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Maximum number of entries to store
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Path of the JSON file backing the store
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

fn default_similarity_threshold() -> f32 {
    0.9
}

fn default_max_entries() -> usize {
    1000
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/semantic_cache.json")
}

impl Default for SemanticCacheConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            max_entries: default_max_entries(),
            store_path: default_store_path(),
        }
    }
}

impl SemanticCacheConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the similarity threshold
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the maximum number of entries
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Set the store file path
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }
}
