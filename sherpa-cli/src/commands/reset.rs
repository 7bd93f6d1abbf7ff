//! Reset handler
//!
//! Empties both job queues, then fails every job that was still waiting
//! or running, since nothing can pick it up any more.

use anyhow::Result;
use colored::*;
use sherpa_store::repository::job_repository;

use super::queue::{clear_queues, default_queues};
use crate::config::Config;

pub async fn handle_reset(config: &Config) -> Result<()> {
    let pool = config.pool().await?;
    let client = config.queue_client();

    clear_queues(&client, &default_queues()).await?;
    let reset = job_repository::reset_in_flight(&pool).await?;

    println!(
        "{}",
        format!("✓ Reset complete ({} in-flight job(s) failed)", reset)
            .green()
            .bold()
    );
    Ok(())
}
