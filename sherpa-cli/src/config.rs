//! Configuration module
//!
//! Holds the endpoints and credentials the commands connect with.

use anyhow::{Context, Result};
use sherpa_client::{InferenceClient, QueueClient};
use sherpa_store::PgPool;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// REST endpoint of the queue store
    pub queue_url: String,
    /// Bearer token for the queue store
    pub queue_token: String,
    /// Postgres connection string
    pub database_url: Option<String>,
    /// Chat-completions API root
    pub inference_url: String,
    /// Bearer token for the inference API
    pub inference_token: Option<String>,
    /// Model used for completions
    pub model: String,
}

impl Config {
    pub fn queue_client(&self) -> QueueClient {
        QueueClient::new(&self.queue_url, &self.queue_token)
    }

    /// Connects to the database and makes sure the tables exist
    pub async fn pool(&self) -> Result<PgPool> {
        let url = self
            .database_url
            .as_deref()
            .context("DATABASE_URL is required for this command")?;

        let pool = sherpa_store::db::create_pool(url)
            .await
            .context("Failed to connect to database")?;
        sherpa_store::db::run_migrations(&pool)
            .await
            .context("Failed to run migrations")?;
        Ok(pool)
    }

    pub fn inference_client(&self) -> Result<InferenceClient> {
        let token = self
            .inference_token
            .as_deref()
            .context("HF_TOKEN is required for this command")?;
        Ok(InferenceClient::new(&self.inference_url, token, &self.model))
    }
}
