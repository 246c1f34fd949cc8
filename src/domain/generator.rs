//! SQL generator trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for natural-language-to-SQL generators
#[async_trait]
pub trait SqlGenerator: Send + Sync + Debug {
    /// Produce a raw SQL string for the question.
    ///
    /// The output may be wrapped in markdown fencing; callers strip it
    /// before formatting and validation.
    async fn generate(&self, question: &str) -> Result<String, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
