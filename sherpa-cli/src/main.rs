//! Sherpa CLI
//!
//! Command-line interface for submitting jobs and inspecting the queues,
//! status records and stored results.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use sherpa_client::{DEFAULT_INFERENCE_URL, DEFAULT_MODEL};

#[derive(Parser)]
#[command(name = "sherpa")]
#[command(about = "Sherpa job queue CLI", long_about = None)]
struct Cli {
    /// REST endpoint of the queue store
    #[arg(long, env = "UPSTASH_REDIS_REST_URL")]
    queue_url: String,

    /// Bearer token for the queue store
    #[arg(long, env = "UPSTASH_REDIS_REST_TOKEN", hide_env_values = true)]
    queue_token: String,

    /// Postgres connection string, needed by status and record commands
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    /// Chat-completions API root
    #[arg(long, env = "INFERENCE_URL", default_value = DEFAULT_INFERENCE_URL)]
    inference_url: String,

    /// Bearer token for the inference API
    #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
    inference_token: Option<String>,

    /// Model used by `ai check`
    #[arg(long, env = "INFERENCE_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = Config {
        queue_url: cli.queue_url,
        queue_token: cli.queue_token,
        database_url: cli.database_url,
        inference_url: cli.inference_url,
        inference_token: cli.inference_token,
        model: cli.model,
    };

    handle_command(cli.command, &config).await
}
