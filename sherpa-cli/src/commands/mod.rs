//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod ai;
mod job;
mod queue;
mod records;
mod reset;

pub use ai::AiCommands;
pub use job::{JobCommands, SubmitCommands};
pub use queue::QueueCommands;
pub use records::RecordCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit and inspect jobs
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Results of jobs submitted without an id
    Records {
        #[command(subcommand)]
        command: RecordCommands,
    },
    /// Queue maintenance
    Queue {
        #[command(subcommand)]
        command: QueueCommands,
    },
    /// Clear both job queues and fail every in-flight job
    Reset,
    /// Inference API checks
    Ai {
        #[command(subcommand)]
        command: AiCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Job { command } => job::handle_job_command(command, config).await,
        Commands::Records { command } => records::handle_record_command(command, config).await,
        Commands::Queue { command } => queue::handle_queue_command(command, config).await,
        Commands::Reset => reset::handle_reset(config).await,
        Commands::Ai { command } => ai::handle_ai_command(command, config).await,
    }
}
