//! Result record handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use sherpa_store::repository::{icebreaker_repository, transcript_repository};

use crate::config::Config;

/// Record subcommands
#[derive(Subcommand)]
pub enum RecordCommands {
    /// Stored transcript summaries
    Transcripts,
    /// Stored icebreakers
    Icebreakers,
}

/// Handle record commands
pub async fn handle_record_command(command: RecordCommands, config: &Config) -> Result<()> {
    let pool = config.pool().await?;

    match command {
        RecordCommands::Transcripts => {
            let records = transcript_repository::list_all(&pool).await?;
            if records.is_empty() {
                println!("{}", "No transcripts found.".yellow());
            }
            for record in records {
                println!(
                    "{} {} {} ({})",
                    "▸".cyan(),
                    record.company.bold(),
                    record.date.dimmed(),
                    record.attendees.join(", ")
                );
                println!("{}", record.ai_feedback);
                println!();
            }
        }
        RecordCommands::Icebreakers => {
            let records = icebreaker_repository::list_all(&pool).await?;
            if records.is_empty() {
                println!("{}", "No icebreakers found.".yellow());
            }
            for record in records {
                println!(
                    "{} {} {}",
                    "▸".cyan(),
                    record.name.bold(),
                    record
                        .created_at
                        .format("%Y-%m-%d %H:%M:%S")
                        .to_string()
                        .dimmed()
                );
                println!("{}", record.ai_result);
                println!();
            }
        }
    }

    Ok(())
}
