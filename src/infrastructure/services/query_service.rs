//! Question-to-rows pipeline
//!
//! Orchestrates the full flow: input guard, semantic cache lookup, SQL
//! generation on a miss, post-processing (fence stripping, casing,
//! guardrails), cache store, and execution against the remote data API.
//!
//! Cache failures are invisible here (the cache service is fail-open);
//! guardrail rejections and executor failures surface as errors.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::executor::{QueryExecutor, Row};
use crate::domain::generator::SqlGenerator;
use crate::domain::sql::{format_casing, strip_sql_fences, validate_input, validate_syntax};
use crate::domain::DomainError;
use crate::infrastructure::services::SemanticSqlCacheService;

/// Result of answering a question
#[derive(Debug, Serialize)]
pub struct QueryOutcome {
    /// The SQL that was executed
    pub sql: String,
    /// Result rows from the data API
    pub rows: Vec<Row>,
    /// Whether the SQL came from the semantic cache
    pub cache_hit: bool,
    /// Similarity score of the cached match, when `cache_hit` is true
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f32>,
    /// Advisory guardrail warnings for freshly generated SQL
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Service orchestrating the question-to-rows pipeline
#[derive(Debug)]
pub struct QueryService {
    cache: Arc<SemanticSqlCacheService>,
    generator: Arc<dyn SqlGenerator>,
    executor: Arc<dyn QueryExecutor>,
}

impl QueryService {
    /// Create a new query service
    pub fn new(
        cache: Arc<SemanticSqlCacheService>,
        generator: Arc<dyn SqlGenerator>,
        executor: Arc<dyn QueryExecutor>,
    ) -> Self {
        Self {
            cache,
            generator,
            executor,
        }
    }

    /// Answer a natural-language question.
    ///
    /// Rejected input and rejected generated SQL surface as `Validation`
    /// errors; rejected SQL is neither cached nor executed.
    pub async fn ask(&self, question: &str) -> Result<QueryOutcome, DomainError> {
        validate_input(question)?;

        if let Some(found) = self.cache.find_similar(question).await {
            info!(similarity = found.similarity, "Answering from semantic cache");

            let rows = self.executor.execute(&found.sql).await?;

            return Ok(QueryOutcome {
                sql: found.sql,
                rows,
                cache_hit: true,
                similarity: Some(found.similarity),
                warnings: Vec::new(),
            });
        }

        let raw = self.generator.generate(question).await?;
        let sql = format_casing(strip_sql_fences(&raw));

        debug!(sql = %sql, "Generated SQL");

        let report = validate_syntax(&sql);

        if !report.is_valid() {
            return Err(DomainError::validation(format!(
                "Generated SQL rejected: {}",
                report.errors().join("; ")
            )));
        }

        let warnings = report.into_warnings();

        self.cache.store(question, &sql).await;

        let rows = self.executor.execute(&sql).await?;

        Ok(QueryOutcome {
            sql,
            rows,
            cache_hit: false,
            similarity: None,
            warnings,
        })
    }
}
