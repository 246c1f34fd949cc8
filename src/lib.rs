//! PMP SQL Gateway
//!
//! Converts natural-language questions into validated SQL, executes them
//! against a remote data API, and caches question-to-SQL mappings by
//! embedding similarity so repeated questions skip the model call.
//!
//! Layout:
//! - `domain`: the core types and traits — semantic cache store, SQL
//!   formatter and guardrails, collaborator traits
//! - `infrastructure`: HTTP-backed collaborators, the file-backed cache
//!   store, and the services composing them
//! - `config`, `cli`: configuration loading and the command-line surface

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use infrastructure::embedding::OpenAiEmbeddingProvider;
use infrastructure::executor::HttpQueryExecutor;
use infrastructure::generator::OpenAiSqlGenerator;
use infrastructure::http_client::HttpClient;
use infrastructure::semantic_cache::FileSemanticCache;
use infrastructure::services::{QueryService, SemanticSqlCacheService};

/// Timeout applied to collaborator HTTP calls (embedding, generation,
/// execution); the cache itself imposes none.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared handles for the query pipeline.
///
/// Constructed once at process start and passed to the handlers that need
/// it; tests build their own contexts with mock collaborators.
pub struct AppContext {
    pub query_service: Arc<QueryService>,
    pub cache_service: Arc<SemanticSqlCacheService>,
}

/// Wire the full pipeline from configuration.
///
/// Opening the cache store never fails (a missing or malformed file loads
/// as empty); only building the HTTP client can.
pub async fn create_app_context(
    config: &AppConfig,
    openai_api_key: &str,
) -> Result<AppContext, domain::DomainError> {
    let http = HttpClient::with_timeout(HTTP_TIMEOUT)?;

    let embedding_provider = match &config.embedding.base_url {
        Some(base_url) => {
            OpenAiEmbeddingProvider::with_base_url(http.clone(), openai_api_key, base_url.as_str())
        }
        None => OpenAiEmbeddingProvider::new(http.clone(), openai_api_key),
    }
    .with_model(config.embedding.model.clone());

    let generator = match &config.generator.base_url {
        Some(base_url) => {
            OpenAiSqlGenerator::with_base_url(http.clone(), openai_api_key, base_url.as_str())
        }
        None => OpenAiSqlGenerator::new(http.clone(), openai_api_key),
    }
    .with_model(config.generator.model.clone());

    let mut executor = HttpQueryExecutor::new(http, config.data_api.base_url.clone());
    if let Ok(api_key) = std::env::var("DATA_API_KEY") {
        executor = executor.with_api_key(api_key);
    }

    let store = FileSemanticCache::open(config.cache.clone()).await;

    let cache_service = Arc::new(SemanticSqlCacheService::new(
        Arc::new(store),
        Arc::new(embedding_provider),
    ));

    let query_service = Arc::new(QueryService::new(
        cache_service.clone(),
        Arc::new(generator),
        Arc::new(executor),
    ));

    Ok(AppContext {
        query_service,
        cache_service,
    })
}
