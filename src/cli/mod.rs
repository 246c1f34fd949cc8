//! CLI module for the SQL gateway
//!
//! Subcommands:
//! - `ask`: run the full question-to-rows pipeline
//! - `cache`: manage the semantic cache (stats, clear)

pub mod ask;
pub mod cache;

use clap::{Parser, Subcommand};

/// SQL Gateway - Natural-language questions to validated SQL
#[derive(Parser)]
#[command(name = "pmp-sql-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Ask a natural-language question and print the resulting rows
    Ask(ask::AskArgs),

    /// Inspect or clear the semantic cache
    Cache {
        #[command(subcommand)]
        command: cache::CacheCommand,
    },
}
