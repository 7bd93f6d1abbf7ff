//! Sherpa Worker
//!
//! A long-running consumer that drains the job queues and runs every job
//! through the AI collaborator.
//!
//! Architecture:
//! - Configuration: Load settings from the environment (and `.env`)
//! - Repositories: Queue store, status table, result tables, inference API
//! - Services: Prompt building and job processing
//! - Scheduler: Queue draining, per-job isolation and backoff
//!
//! Jobs are delivered at most once: an entry is gone from its queue as
//! soon as it is popped, whatever happens to it afterwards.

mod config;
mod error;
mod repository;
mod scheduler;
mod service;

#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::repository::{PgResultRepository, PgStatusRepository};
use crate::scheduler::JobPoller;
use crate::service::JobProcessor;
use sherpa_client::{InferenceClient, QueueClient};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sherpa_worker=info,sherpa_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Sherpa Worker");

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate()?;
    info!(
        "Loaded configuration: queue_url={}, model={}",
        config.queue_url, config.inference_model
    );

    let http = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let queue = Arc::new(QueueClient::with_client(
        config.queue_url.clone(),
        config.queue_token.clone(),
        http.clone(),
    ));
    let analyzer = Arc::new(InferenceClient::with_client(
        config.inference_url.clone(),
        config.inference_token.clone(),
        config.inference_model.clone(),
        http,
    ));

    info!("Connecting to database");
    let pool = sherpa_store::db::create_pool(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    sherpa_store::db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;
    info!("Database ready");

    let processor = JobProcessor::new(
        analyzer,
        Arc::new(PgStatusRepository::new(pool.clone())),
        Arc::new(PgResultRepository::new(pool)),
        config.transcript_delay,
    );
    let poller = JobPoller::new(config, queue, processor);

    tokio::select! {
        result = poller.run() => {
            if let Err(e) = result {
                error!("Poller error: {:#}", e);
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, stopping worker");
        }
    }

    Ok(())
}
