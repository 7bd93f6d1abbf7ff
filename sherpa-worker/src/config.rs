//! Worker configuration
//!
//! Defines all configurable parameters for the worker: service endpoints
//! and credentials, the queues to drain, and the backoff timings.

use std::time::Duration;

use sherpa_client::{DEFAULT_INFERENCE_URL, DEFAULT_MODEL};
use sherpa_core::domain::job::JobKind;

/// A queue the worker drains, and the job kind its legacy entries carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueBinding {
    pub name: String,
    pub kind: JobKind,
}

impl QueueBinding {
    pub fn new(name: impl Into<String>, kind: JobKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Parses `kind=queue` pairs separated by commas
    ///
    /// e.g. `icebreaker=icebreaker-queue,transcript=transcript-queue`
    pub fn parse_list(pairs: &str) -> anyhow::Result<Vec<Self>> {
        pairs.split(',')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (kind, name) = pair
                    .split_once('=')
                    .ok_or_else(|| anyhow::anyhow!("queue binding '{}' is not kind=queue", pair))?;
                let kind = kind.parse::<JobKind>().map_err(anyhow::Error::msg)?;
                Ok(Self::new(name.trim(), kind))
            })
            .collect()
    }
}

/// Worker configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// REST endpoint of the queue store
    pub queue_url: String,

    /// Bearer token for the queue store
    pub queue_token: String,

    /// Postgres connection string for status records and results
    pub database_url: String,

    /// Chat-completions API root
    pub inference_url: String,

    /// Bearer token for the inference API
    pub inference_token: String,

    /// Model used for every analysis
    pub inference_model: String,

    /// Queues drained in order on every pass
    pub queues: Vec<QueueBinding>,

    /// Sleep after a pass that found no work
    pub idle_interval: Duration,

    /// Sleep after a pass that hit an unexpected error
    pub error_backoff: Duration,

    /// Pause before a transcript job is analyzed
    pub transcript_delay: Duration,

    /// Timeout applied to every outbound HTTP request
    pub request_timeout: Duration,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(
        queue_url: String,
        queue_token: String,
        database_url: String,
        inference_token: String,
    ) -> Self {
        Self {
            queue_url,
            queue_token,
            database_url,
            inference_url: DEFAULT_INFERENCE_URL.to_string(),
            inference_token,
            inference_model: DEFAULT_MODEL.to_string(),
            queues: Self::default_queues(),
            idle_interval: Duration::from_secs(2),
            error_backoff: Duration::from_secs(5),
            transcript_delay: Duration::from_secs(1),
            request_timeout: Duration::from_secs(120),
        }
    }

    /// Icebreakers first, then transcripts
    pub fn default_queues() -> Vec<QueueBinding> {
        [JobKind::Icebreaker, JobKind::Transcript]
            .into_iter()
            .map(|kind| QueueBinding::new(kind.default_queue(), kind))
            .collect()
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - UPSTASH_REDIS_REST_URL (required)
    /// - UPSTASH_REDIS_REST_TOKEN (required)
    /// - DATABASE_URL (required)
    /// - HF_TOKEN (required)
    /// - INFERENCE_URL (optional, default: Hugging Face router)
    /// - INFERENCE_MODEL (optional)
    /// - SHERPA_QUEUES (optional, kind=queue pairs)
    /// - IDLE_INTERVAL (optional, seconds, default: 2)
    /// - ERROR_BACKOFF (optional, seconds, default: 5)
    /// - TRANSCRIPT_DELAY (optional, seconds, default: 1)
    /// - REQUEST_TIMEOUT (optional, seconds, default: 120)
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::new(
            required("UPSTASH_REDIS_REST_URL")?,
            required("UPSTASH_REDIS_REST_TOKEN")?,
            required("DATABASE_URL")?,
            required("HF_TOKEN")?,
        );

        if let Ok(url) = std::env::var("INFERENCE_URL") {
            config.inference_url = url;
        }

        if let Ok(model) = std::env::var("INFERENCE_MODEL") {
            config.inference_model = model;
        }

        if let Ok(pairs) = std::env::var("SHERPA_QUEUES") {
            config.queues = QueueBinding::parse_list(&pairs)?;
        }

        config.idle_interval = seconds("IDLE_INTERVAL").unwrap_or(config.idle_interval);
        config.error_backoff = seconds("ERROR_BACKOFF").unwrap_or(config.error_backoff);
        config.transcript_delay = seconds("TRANSCRIPT_DELAY").unwrap_or(config.transcript_delay);
        config.request_timeout = seconds("REQUEST_TIMEOUT").unwrap_or(config.request_timeout);

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, url) in [
            ("queue_url", &self.queue_url),
            ("inference_url", &self.inference_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with http:// or https://", name);
            }
        }

        if self.queue_token.is_empty() {
            anyhow::bail!("queue_token cannot be empty");
        }

        if self.database_url.is_empty() {
            anyhow::bail!("database_url cannot be empty");
        }

        if self.queues.is_empty() {
            anyhow::bail!("at least one queue must be configured");
        }

        for (i, binding) in self.queues.iter().enumerate() {
            if binding.name.is_empty() {
                anyhow::bail!("queue names cannot be empty");
            }
            if self.queues[..i].iter().any(|b| b.name == binding.name) {
                anyhow::bail!("queue '{}' is configured twice", binding.name);
            }
        }

        if self.idle_interval.is_zero() {
            anyhow::bail!("idle_interval must be greater than 0");
        }

        if self.error_backoff.is_zero() {
            anyhow::bail!("error_backoff must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    /// Local development endpoints
    fn default() -> Self {
        Self::new(
            "http://localhost:8079".to_string(),
            "local-token".to_string(),
            "postgres://localhost/sherpa".to_string(),
            String::new(),
        )
    }
}

fn required(name: &str) -> anyhow::Result<String> {
    std::env::var(name).map_err(|_| anyhow::anyhow!("{} environment variable not set", name))
}

fn seconds(name: &str) -> Option<Duration> {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
}
