use clap::Parser;
use pmp_sql_gateway::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Ask(args) => cli::ask::run(args).await,
        Command::Cache { command } => cli::cache::run(command).await,
    }
}
