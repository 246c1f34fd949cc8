//! Ask command - full question-to-rows pipeline

use clap::Args;

use crate::config::AppConfig;
use crate::infrastructure::logging;

#[derive(Args)]
pub struct AskArgs {
    /// The natural-language question to answer
    pub question: String,
}

/// Run the pipeline and print the outcome as JSON
pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let api_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY must be set to run the ask command"))?;

    let context = crate::create_app_context(&config, &api_key).await?;
    let outcome = context.query_service.ask(&args.question).await?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}
