//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, DataApiSettings, EmbeddingSettings, GeneratorSettings, LogFormat, LoggingConfig,
};
