//! Job poller
//!
//! Drains the queues in their configured order. A queue is emptied before
//! the next one is looked at, and each job runs in its own task so that a
//! panicking handler only fails that job.

use anyhow::Result;
use serde_json::Value;
use sherpa_client::ClientError;
use sherpa_core::codec;
use std::sync::Arc;
use tokio::time;
use tracing::{debug, error, info, warn};

use crate::config::{Config, QueueBinding};
use crate::error::ProcessError;
use crate::repository::QueueRepository;
use crate::service::JobProcessor;

/// Job poller that continuously drains the queues
pub struct JobPoller {
    config: Config,
    queue: Arc<dyn QueueRepository>,
    processor: JobProcessor,
}

impl JobPoller {
    /// Creates a new job poller
    pub fn new(config: Config, queue: Arc<dyn QueueRepository>, processor: JobProcessor) -> Self {
        Self {
            config,
            queue,
            processor,
        }
    }

    /// Starts the polling loop
    ///
    /// Never returns on its own; callers stop it by dropping the future.
    pub async fn run(&self) -> Result<()> {
        let queues: Vec<&str> = self.config.queues.iter().map(|b| b.name.as_str()).collect();
        info!(
            "Starting job poller (queues: {}, idle: {:?}, backoff: {:?})",
            queues.join(" -> "),
            self.config.idle_interval,
            self.config.error_backoff
        );

        loop {
            match self.run_once().await {
                Ok(0) => {
                    debug!("No jobs available");
                    time::sleep(self.config.idle_interval).await;
                }
                Ok(processed) => {
                    info!("Processed {} job(s) this pass", processed);
                }
                Err(e) if is_transport(&e) => {
                    warn!("Queue store unavailable, backing off: {:#}", e);
                    time::sleep(self.config.error_backoff).await;
                }
                Err(e) => {
                    error!("Error during poll pass: {:#}", e);
                    time::sleep(self.config.error_backoff).await;
                }
            }
        }
    }

    /// Performs a single pass over every queue
    ///
    /// Returns the number of entries removed, malformed ones included. A
    /// queue store failure aborts the pass.
    pub async fn run_once(&self) -> Result<usize> {
        let mut popped = 0;

        for binding in &self.config.queues {
            while let Some(raw) = self.queue.pop_head(&binding.name).await? {
                popped += 1;
                self.dispatch(binding, raw).await;
            }
        }

        Ok(popped)
    }

    /// Decodes one entry and runs it to completion
    async fn dispatch(&self, binding: &QueueBinding, raw: Value) {
        let job = match codec::decode(&raw, binding.kind) {
            Ok(job) => job,
            Err(e) => {
                warn!("Dropping malformed entry from {}: {}", binding.name, e);
                return;
            }
        };

        let id = job.id;
        debug!("Dequeued {} job from {}", job.kind(), binding.name);

        let processor = self.processor.clone();
        let handle = tokio::spawn(async move { processor.process(job).await });
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => Err(ProcessError::Panicked(e.to_string())),
        };

        let label = id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "(untracked)".to_string());

        match outcome {
            Ok(()) => {}
            Err(e @ ProcessError::Panicked(_)) => {
                error!("Job {} from {}: {}", label, binding.name, e);
                if let Some(id) = id {
                    self.processor.mark_failed(id, &e.to_string()).await;
                }
            }
            Err(e @ (ProcessError::Untracked(_) | ProcessError::AlreadyFinished { .. })) => {
                warn!("Skipping job from {}: {}", binding.name, e);
            }
            Err(e) => {
                error!("Job {} from {} failed: {:#}", label, binding.name, e);
            }
        }
    }
}

/// Whether a failed pass came from an unreachable or overloaded store
fn is_transport(e: &anyhow::Error) -> bool {
    e.downcast_ref::<ClientError>()
        .is_some_and(ClientError::is_transport)
}
