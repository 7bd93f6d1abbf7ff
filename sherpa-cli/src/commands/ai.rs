//! Inference API handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;

use crate::config::Config;

/// AI subcommands
#[derive(Subcommand)]
pub enum AiCommands {
    /// Send one tiny completion to verify the token and model
    Check,
}

/// Handle AI commands
pub async fn handle_ai_command(command: AiCommands, config: &Config) -> Result<()> {
    match command {
        AiCommands::Check => {
            let client = config.inference_client()?;
            println!("Checking {} at {}", client.model().cyan(), config.inference_url);

            let analysis = client.analyze("Reply with the single word: ready").await;
            match analysis.text() {
                Some(reply) => {
                    println!("{} {}", "✓ Model replied:".green().bold(), reply);
                    Ok(())
                }
                None => anyhow::bail!("Model check failed: {}", analysis.failure_reason()),
            }
        }
    }
}
