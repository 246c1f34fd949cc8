//! Cache management commands
//!
//! Operate directly on the file-backed store; no embedding provider or API
//! key is required.

use clap::Subcommand;

use crate::config::AppConfig;
use crate::domain::semantic_cache::SemanticCache;
use crate::infrastructure::logging;
use crate::infrastructure::semantic_cache::FileSemanticCache;

#[derive(Subcommand)]
pub enum CacheCommand {
    /// Print the cache stats snapshot
    Stats,

    /// Remove all cached entries
    Clear,
}

pub async fn run(command: CacheCommand) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let store = FileSemanticCache::open(config.cache).await;

    match command {
        CacheCommand::Stats => {
            let stats = store.stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        CacheCommand::Clear => {
            let removed = store.clear().await?;
            println!("Semantic cache cleared ({} entries removed)", removed);
        }
    }

    Ok(())
}
