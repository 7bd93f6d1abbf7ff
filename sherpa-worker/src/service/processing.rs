//! Job processing service
//!
//! Type handlers for dequeued jobs. A tracked job (one with an id) moves
//! through its status record:
//!
//! `Pending -> Processing -> Completed | Failed`
//!
//! A job without an id predates status tracking; its analysis is written
//! straight to the result tables and failures only reach the log.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sherpa_core::domain::job::{Job, JobId, JobPayload};
use sherpa_core::domain::status::Transition;
use tracing::{debug, error, info};

use crate::error::ProcessError;
use crate::repository::{Analyzer, ResultRepository, StatusRepository};
use crate::service::prompt;

/// Dispatches jobs to their type handler and records the outcome
#[derive(Clone)]
pub struct JobProcessor {
    analyzer: Arc<dyn Analyzer>,
    statuses: Arc<dyn StatusRepository>,
    results: Arc<dyn ResultRepository>,
    transcript_delay: Duration,
}

impl JobProcessor {
    pub fn new(
        analyzer: Arc<dyn Analyzer>,
        statuses: Arc<dyn StatusRepository>,
        results: Arc<dyn ResultRepository>,
        transcript_delay: Duration,
    ) -> Self {
        Self {
            analyzer,
            statuses,
            results,
            transcript_delay,
        }
    }

    /// Processes one job to completion or failure
    pub async fn process(&self, job: Job) -> Result<(), ProcessError> {
        match job.id {
            Some(id) => self.process_tracked(id, job.payload).await,
            None => self.process_legacy(job.payload).await,
        }
    }

    /// Marks a tracked job failed, logging if even that is impossible
    pub async fn mark_failed(&self, id: JobId, reason: &str) {
        let transition = Transition::Failed {
            reason: reason.to_string(),
        };
        if let Err(e) = self.statuses.transition(id, transition).await {
            error!("Could not mark job {} failed: {:#}", id, e);
        }
    }

    async fn process_tracked(&self, id: JobId, payload: JobPayload) -> Result<(), ProcessError> {
        match self.run_tracked(id, &payload).await {
            Ok(()) => {
                info!(
                    "{} job {} for '{}' completed",
                    payload.kind(),
                    id,
                    payload.subject()
                );
                Ok(())
            }
            Err(e @ (ProcessError::Untracked(_) | ProcessError::AlreadyFinished { .. })) => Err(e),
            Err(e) => {
                // The entry is already off the queue, so nothing retries it
                self.mark_failed(id, &e.to_string()).await;
                Err(e)
            }
        }
    }

    async fn run_tracked(&self, id: JobId, payload: &JobPayload) -> Result<(), ProcessError> {
        let record = self
            .statuses
            .read(id)
            .await?
            .ok_or(ProcessError::Untracked(id))?;

        if record.status.is_terminal() {
            return Err(ProcessError::AlreadyFinished {
                id,
                status: record.status,
            });
        }

        self.statuses.transition(id, Transition::Processing).await?;
        debug!("Job {} is processing", id);

        let analysis = self.analyze(payload).await?;
        self.statuses
            .transition(id, Transition::Completed { analysis })
            .await?;
        Ok(())
    }

    async fn process_legacy(&self, payload: JobPayload) -> Result<(), ProcessError> {
        let analysis = self.analyze(&payload).await?;

        match &payload {
            JobPayload::Transcript(transcript) => {
                self.results
                    .insert_transcript(transcript, &analysis)
                    .await
                    .context("Failed to save transcript result")?;
            }
            JobPayload::Icebreaker(icebreaker) => {
                self.results
                    .insert_icebreaker(icebreaker, &analysis)
                    .await
                    .context("Failed to save icebreaker result")?;
            }
        }

        info!(
            "Untracked {} job for '{}' processed and saved",
            payload.kind(),
            payload.subject()
        );
        Ok(())
    }

    /// Runs the type-specific prompt through the analyzer
    async fn analyze(&self, payload: &JobPayload) -> Result<String, ProcessError> {
        let prompt = match payload {
            JobPayload::Transcript(transcript) => {
                if !self.transcript_delay.is_zero() {
                    tokio::time::sleep(self.transcript_delay).await;
                }
                prompt::transcript(transcript)
            }
            JobPayload::Icebreaker(icebreaker) => prompt::icebreaker(icebreaker),
        };

        debug!("Running {} analysis for '{}'", payload.kind(), payload.subject());
        let analysis = self.analyzer.analyze(&prompt).await;

        analysis
            .text()
            .map(str::to_string)
            .ok_or_else(|| ProcessError::Analysis(analysis.failure_reason()))
    }
}
