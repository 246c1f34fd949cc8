//! Application configuration
//!
//! Layered loading: `config/default` file, then `config/local` file, then
//! `APP__`-prefixed environment variables, then the two flat cache
//! variables (`SEMANTIC_CACHE_THRESHOLD`, `SEMANTIC_CACHE_MAX_SIZE`) as
//! explicit overrides. Every field has a default, so an empty environment
//! yields a working configuration.

use serde::Deserialize;

use crate::domain::semantic_cache::SemanticCacheConfig;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub cache: SemanticCacheConfig,
    #[serde(default)]
    pub embedding: EmbeddingSettings,
    #[serde(default)]
    pub generator: GeneratorSettings,
    #[serde(default)]
    pub data_api: DataApiSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Embedding provider settings
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingSettings {
    /// Embedding model name
    #[serde(default = "default_embedding_model")]
    pub model: String,
    /// Override for the provider base URL (proxies, local gateways)
    #[serde(default)]
    pub base_url: Option<String>,
}

/// SQL generator (chat model) settings
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorSettings {
    /// Chat model name
    #[serde(default = "default_generator_model")]
    pub model: String,
    /// Override for the provider base URL
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Remote data execution API settings
#[derive(Debug, Clone, Deserialize)]
pub struct DataApiSettings {
    /// Base URL of the execution API
    #[serde(default = "default_data_api_url")]
    pub base_url: String,
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_generator_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_data_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            base_url: None,
        }
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            model: default_generator_model(),
            base_url: None,
        }
    }
}

impl Default for DataApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_data_api_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option(
                "cache.similarity_threshold",
                env_override("SEMANTIC_CACHE_THRESHOLD"),
            )?
            .set_override_option(
                "cache.max_entries",
                env_override("SEMANTIC_CACHE_MAX_SIZE"),
            )?
            .build()?;

        config.try_deserialize()
    }
}

fn env_override(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
