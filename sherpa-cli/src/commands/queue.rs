//! Queue command handlers

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use serde_json::Value;
use sherpa_client::QueueClient;
use sherpa_core::domain::job::JobKind;

use crate::config::Config;

const FIFO_CHECK_QUEUE: &str = "test-order-queue";
const FIFO_CHECK_ENTRIES: [&str; 5] = ["Job-A", "Job-B", "Job-C", "Job-D", "Job-E"];

/// Queue subcommands
#[derive(Subcommand)]
pub enum QueueCommands {
    /// Number of entries waiting in a queue
    Length {
        /// Queue name
        name: String,
    },
    /// Delete queues and everything in them
    Clear {
        /// Queue names, both job queues when omitted
        names: Vec<String>,
    },
    /// Verify the store hands entries back in push order
    FifoCheck,
}

/// Handle queue commands
pub async fn handle_queue_command(command: QueueCommands, config: &Config) -> Result<()> {
    let client = config.queue_client();

    match command {
        QueueCommands::Length { name } => {
            let length = client.length(&name).await;
            println!("{}: {}", name.cyan(), length);
            Ok(())
        }
        QueueCommands::Clear { names } => {
            let names = if names.is_empty() {
                default_queues()
            } else {
                names
            };
            clear_queues(&client, &names).await
        }
        QueueCommands::FifoCheck => fifo_check(&client).await,
    }
}

/// The queue of every job kind
pub fn default_queues() -> Vec<String> {
    [JobKind::Transcript, JobKind::Icebreaker]
        .iter()
        .map(|kind| kind.default_queue().to_string())
        .collect()
}

pub async fn clear_queues(client: &QueueClient, names: &[String]) -> Result<()> {
    for name in names {
        let removed = client
            .delete(name)
            .await
            .with_context(|| format!("Failed to clear {}", name))?;
        if removed > 0 {
            println!("{} Cleared {}", "✓".green(), name.cyan());
        } else {
            println!("{} {} was already empty", "·".dimmed(), name.cyan());
        }
    }
    Ok(())
}

async fn fifo_check(client: &QueueClient) -> Result<()> {
    client.delete(FIFO_CHECK_QUEUE).await?;

    for entry in FIFO_CHECK_ENTRIES {
        client.push(FIFO_CHECK_QUEUE, entry).await?;
    }
    println!("Pushed {} entries to {}", FIFO_CHECK_ENTRIES.len(), FIFO_CHECK_QUEUE);

    let mut popped = Vec::new();
    while let Some(value) = client.pop_head(FIFO_CHECK_QUEUE).await? {
        popped.push(value);
    }
    client.delete(FIFO_CHECK_QUEUE).await?;

    match check_order(&FIFO_CHECK_ENTRIES, &popped) {
        Ok(()) => {
            println!("{}", "✓ Entries came back in push order".green().bold());
            Ok(())
        }
        Err(mismatch) => {
            println!("{}", "✗ Entries came back out of order".red().bold());
            anyhow::bail!(mismatch)
        }
    }
}

/// Compares popped entries with the pushed sequence
fn check_order(expected: &[&str], popped: &[Value]) -> Result<(), String> {
    let popped: Vec<String> = popped
        .iter()
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();

    if popped.len() != expected.len() {
        return Err(format!(
            "expected {} entries, got {}: {:?}",
            expected.len(),
            popped.len(),
            popped
        ));
    }

    for (i, (want, got)) in expected.iter().zip(&popped).enumerate() {
        if *want != got.as_str() {
            return Err(format!("position {}: expected {}, got {}", i, want, got));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_matches() {
        let popped = vec![json!("Job-A"), json!("Job-B")];
        assert!(check_order(&["Job-A", "Job-B"], &popped).is_ok());
    }

    #[test]
    fn test_reversed_order_is_reported() {
        let popped = vec![json!("Job-B"), json!("Job-A")];
        let err = check_order(&["Job-A", "Job-B"], &popped).unwrap_err();
        assert!(err.contains("position 0"));
    }

    #[test]
    fn test_missing_entries_are_reported() {
        let err = check_order(&["Job-A", "Job-B"], &[json!("Job-A")]).unwrap_err();
        assert!(err.contains("expected 2 entries, got 1"));
    }

    #[test]
    fn test_default_queues_cover_both_kinds() {
        assert_eq!(default_queues(), vec!["transcript-queue", "icebreaker-queue"]);
    }
}
