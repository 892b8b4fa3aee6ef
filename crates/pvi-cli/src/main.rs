use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pvi_apify::ApifyClient;
use pvi_core::{load_app_config, AppConfig, Country};
use pvi_engine::{run_analysis, PipelineClients};
use pvi_serper::SerperClient;
use pvi_textgen::TextGenClient;

#[derive(Debug, Parser)]
#[command(name = "pvi-cli")]
#[command(about = "Product viability intelligence command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a full viability analysis for a product in a target market.
    Analyze {
        /// Product idea, e.g. "Smart Ring".
        #[arg(long)]
        product: String,

        /// Target market, e.g. "india" or "uk".
        #[arg(long)]
        country: String,
    },
    /// List supported target markets.
    Countries,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze { product, country } => analyze(&product, &country).await,
        Commands::Countries => {
            for country in Country::all() {
                let profile = country.profile();
                println!(
                    "{} (geo: {}, currency: {})",
                    profile.full_name, profile.geo_code, profile.currency_symbol
                );
            }
            Ok(())
        }
    }
}

async fn analyze(product: &str, country: &str) -> anyhow::Result<()> {
    let config = load_app_config().context("failed to load configuration")?;
    init_tracing(&config);

    let country: Country = country.parse()?;

    let generator = TextGenClient::with_base_url(
        &config.openai_api_key,
        &config.textgen_model,
        config.request_timeout_secs,
        &config.user_agent,
        &config.textgen_base_url,
    )
    .context("failed to build text-generation client")?;

    let serper = SerperClient::with_base_url(
        &config.serper_api_key,
        config.request_timeout_secs,
        &config.user_agent,
        &config.serper_base_url,
    )
    .context("failed to build search client")?;

    let marketplace = ApifyClient::with_base_url(
        &config.apify_api_token,
        &config.apify_actor,
        config.request_timeout_secs,
        &config.user_agent,
        &config.apify_base_url,
    )
    .context("failed to build marketplace client")?;

    let clients = PipelineClients {
        generator,
        web_search: &serper,
        shopping: &serper,
        marketplace,
    };

    let outcome = run_analysis(
        &clients,
        product,
        country,
        Duration::from_secs(config.signal_timeout_secs),
    )
    .await;

    if outcome.verdict.is_error() {
        tracing::error!(
            reason = %outcome.verdict.recommendation,
            "analysis finished in an error state"
        );
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&outcome).context("failed to serialize outcome")?
    );
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
