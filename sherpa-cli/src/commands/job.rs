//! Job command handlers
//!
//! Submitting follows the producer contract: the pending status record is
//! written before the job is pushed, and a failed push fails the record.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use sherpa_client::QueueClient;
use sherpa_core::domain::job::{IcebreakerPayload, Job, JobId, JobKind, JobPayload, TranscriptPayload};
use sherpa_core::domain::status::{JobStatus, JobStatusRecord, Transition};
use sherpa_store::PgPool;
use sherpa_store::repository::job_repository;

use crate::config::Config;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// Submit a job to its queue
    Submit {
        #[command(subcommand)]
        job: SubmitCommands,

        /// Push to this queue instead of the kind's default
        #[arg(long, global = true)]
        queue: Option<String>,

        /// Push without an id or status record
        #[arg(long, global = true)]
        untracked: bool,
    },
    /// Show the status record of a job
    Status {
        /// Job ID
        id: String,
    },
    /// List status records of one kind
    List {
        /// transcript or icebreaker
        kind: JobKind,
    },
}

/// Job kinds that can be submitted
#[derive(Subcommand)]
pub enum SubmitCommands {
    /// Meeting transcript to summarize
    Transcript {
        #[arg(long)]
        company: String,

        /// Comma-separated attendee names
        #[arg(long, value_delimiter = ',')]
        attendees: Vec<String>,

        #[arg(long)]
        date: String,

        /// Transcript text
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        transcript: Option<String>,

        /// Read the transcript text from a file
        #[arg(long)]
        file: Option<std::path::PathBuf>,
    },
    /// Person to write an opening line for
    Icebreaker {
        #[arg(long)]
        name: String,

        #[arg(long)]
        linkedin_bio: String,

        #[arg(long)]
        pitch_deck_text: Option<String>,
    },
}

impl SubmitCommands {
    fn into_payload(self) -> Result<JobPayload> {
        match self {
            SubmitCommands::Transcript {
                company,
                attendees,
                date,
                transcript,
                file,
            } => {
                let transcript = match (transcript, file) {
                    (Some(text), _) => text,
                    (None, Some(path)) => std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?,
                    (None, None) => anyhow::bail!("either --transcript or --file is required"),
                };
                Ok(JobPayload::Transcript(TranscriptPayload {
                    company,
                    attendees: attendees
                        .iter()
                        .map(|a| a.trim().to_string())
                        .filter(|a| !a.is_empty())
                        .collect(),
                    date,
                    transcript,
                }))
            }
            SubmitCommands::Icebreaker {
                name,
                linkedin_bio,
                pitch_deck_text,
            } => Ok(JobPayload::Icebreaker(IcebreakerPayload {
                name,
                linkedin_bio,
                pitch_deck_text,
            })),
        }
    }
}

/// Handle job commands
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    match command {
        JobCommands::Submit {
            job,
            queue,
            untracked,
        } => {
            let payload = job.into_payload()?;
            let queue = queue.unwrap_or_else(|| payload.kind().default_queue().to_string());
            let client = config.queue_client();
            if untracked {
                submit_untracked(&client, &queue, payload).await
            } else {
                let pool = config.pool().await?;
                submit(&pool, &client, &queue, payload).await
            }
        }
        JobCommands::Status { id } => {
            let id = JobId::parse(&id).with_context(|| format!("'{}' is not a job id", id))?;
            let pool = config.pool().await?;
            show_status(&pool, id).await
        }
        JobCommands::List { kind } => {
            let pool = config.pool().await?;
            list_jobs(&pool, kind).await
        }
    }
}

/// Create the pending record, then push
async fn submit(pool: &PgPool, client: &QueueClient, queue: &str, payload: JobPayload) -> Result<()> {
    let job = Job::new(payload);
    let id = job.id.context("new jobs always carry an id")?;
    let fields = serde_json::to_value(&job.payload)?;

    job_repository::create(pool, id, job.kind(), fields)
        .await
        .context("Failed to create status record")?;

    match client.enqueue(queue, &job).await {
        Ok(length) => {
            println!("{}", "✓ Job submitted".green().bold());
            println!("  ID:     {}", id.to_string().cyan());
            println!("  Queue:  {} (length {})", queue, length);
            Ok(())
        }
        Err(e) => {
            let reason = format!("enqueue failed: {}", e);
            if let Err(mark) =
                job_repository::transition(pool, id, &Transition::Failed { reason }).await
            {
                eprintln!("{} {}", "⚠ Could not fail status record:".yellow(), mark);
            }
            Err(e).context("Failed to enqueue job")
        }
    }
}

async fn submit_untracked(client: &QueueClient, queue: &str, payload: JobPayload) -> Result<()> {
    let job = Job::legacy(payload);
    let length = client
        .enqueue(queue, &job)
        .await
        .context("Failed to enqueue job")?;

    println!("{}", "✓ Untracked job submitted".green().bold());
    println!("  Queue:  {} (length {})", queue, length);
    Ok(())
}

async fn show_status(pool: &PgPool, id: JobId) -> Result<()> {
    let record = job_repository::find_by_id(pool, id)
        .await?
        .with_context(|| format!("Job {} not found", id))?;

    print_record_details(&record);
    Ok(())
}

async fn list_jobs(pool: &PgPool, kind: JobKind) -> Result<()> {
    let records = job_repository::list_by_kind(pool, kind).await?;

    if records.is_empty() {
        println!("{}", format!("No {} jobs found.", kind).yellow());
    } else {
        println!(
            "{}",
            format!("Found {} {} job(s):", records.len(), kind).bold()
        );
        println!();
        for record in records {
            print_record_summary(&record);
        }
    }

    Ok(())
}

fn print_record_summary(record: &JobStatusRecord) {
    println!("  {} Job {}", "▸".cyan(), record.id.to_string().dimmed());
    println!("    Status:   {}", colorize_status(record.status));
    println!(
        "    Created:  {}",
        record
            .created_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    println!();
}

fn print_record_details(record: &JobStatusRecord) {
    println!("{}", "Job Details:".bold());
    println!("  ID:       {}", record.id.to_string().cyan());
    println!("  Kind:     {}", record.kind);
    println!("  Status:   {}", colorize_status(record.status));
    println!("  Created:  {}", record.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("  Updated:  {}", record.updated_at.format("%Y-%m-%d %H:%M:%S"));

    println!("\n{}", "Fields:".bold());
    match serde_json::to_string_pretty(&record.fields) {
        Ok(pretty) => println!("{}", pretty),
        Err(_) => println!("{:?}", record.fields),
    }

    if let Some(result) = &record.result {
        println!("\n{}", "Result:".bold());
        println!("{}", result);
    }

    if let Some(error) = &record.error {
        println!("\n{}", "Error:".bold());
        println!("{}", error.red());
    }
}

fn colorize_status(status: JobStatus) -> ColoredString {
    let label = status.as_str();
    match status {
        JobStatus::Pending => label.yellow(),
        JobStatus::Processing => label.cyan(),
        JobStatus::Completed => label.green(),
        JobStatus::Failed => label.red(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attendees_are_trimmed() {
        let command = SubmitCommands::Transcript {
            company: "Acme".to_string(),
            attendees: vec!["Ada".to_string(), " Grace".to_string(), " ".to_string()],
            date: "2025-06-01".to_string(),
            transcript: Some("hello".to_string()),
            file: None,
        };

        match command.into_payload().unwrap() {
            JobPayload::Transcript(t) => assert_eq!(t.attendees, vec!["Ada", "Grace"]),
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_missing_transcript_file_is_an_error() {
        let command = SubmitCommands::Transcript {
            company: "Acme".to_string(),
            attendees: vec![],
            date: "2025-06-01".to_string(),
            transcript: None,
            file: Some("/nonexistent/transcript.txt".into()),
        };

        assert!(command.into_payload().is_err());
    }
}
