//! Application services - Orchestration over domain traits

mod query_service;
mod semantic_sql_cache;

pub use query_service::{QueryOutcome, QueryService};
pub use semantic_sql_cache::SemanticSqlCacheService;
