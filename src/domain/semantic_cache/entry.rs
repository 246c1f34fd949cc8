//! Cache entry type and persisted shape

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A cached question-to-SQL mapping
///
/// Serializes to `{question, embedding, sql, timestamp}` — the on-disk
/// format of the file-backed store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The original natural-language question
    question: String,
    /// The embedding vector for similarity search
    embedding: Vec<f32>,
    /// The validated, formatted SQL
    sql: String,
    /// Insertion time in milliseconds since the epoch
    timestamp: i64,
}

impl CacheEntry {
    /// Create a new entry stamped with the current time
    pub fn new(question: impl Into<String>, embedding: Vec<f32>, sql: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            embedding,
            sql: sql.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Override the insertion timestamp
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Get the original question
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Get the embedding vector
    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    /// Get the cached SQL
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Get the insertion timestamp (ms since epoch)
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}
