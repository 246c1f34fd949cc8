//! Domain layer - Core business logic and entities

pub mod embedding;
pub mod error;
pub mod executor;
pub mod generator;
pub mod semantic_cache;
pub mod sql;

pub use embedding::{cosine_similarity, EmbeddingProvider};
pub use error::DomainError;
pub use executor::{QueryExecutor, Row};
pub use generator::SqlGenerator;
pub use semantic_cache::{
    CacheEntry, CacheStats, SemanticCache, SemanticCacheConfig, SimilarityMatch,
};
pub use sql::{
    format_casing, strip_sql_fences, validate_input, validate_syntax, ValidationReport,
};

#[cfg(test)]
pub use executor::mock::MockQueryExecutor;
#[cfg(test)]
pub use generator::mock::MockSqlGenerator;
