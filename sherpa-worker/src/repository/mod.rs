//! Repository layer
//!
//! Repositories are thin adapters over the external collaborators: the
//! queue store, the status table, the result tables and the inference API.
//! They carry no business logic.
//!
//! All repositories are trait-based so the worker loop can be exercised
//! against in-memory fakes.

mod analysis;
mod queue;
mod results;
mod status;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use sherpa_core::domain::analysis::Analysis;
use sherpa_core::domain::job::{IcebreakerPayload, JobId, TranscriptPayload};
use sherpa_core::domain::status::{JobStatusRecord, Transition};

// Re-export implementations
pub use results::PgResultRepository;
pub use status::PgStatusRepository;

/// Consumer side of the job queues
#[async_trait]
pub trait QueueRepository: Send + Sync {
    /// Removes the oldest entry of a queue, `None` when it is empty
    async fn pop_head(&self, queue: &str) -> Result<Option<Value>>;
}

/// Lifecycle records of tracked jobs
#[async_trait]
pub trait StatusRepository: Send + Sync {
    /// Reads the record of a job, `None` when it does not exist
    async fn read(&self, id: JobId) -> Result<Option<JobStatusRecord>>;

    /// Applies a transition, failing if the allowed table forbids it
    async fn transition(&self, id: JobId, transition: Transition) -> Result<()>;
}

/// Result rows of jobs enqueued without an id
#[async_trait]
pub trait ResultRepository: Send + Sync {
    async fn insert_transcript(&self, payload: &TranscriptPayload, analysis: &str) -> Result<()>;

    async fn insert_icebreaker(&self, payload: &IcebreakerPayload, analysis: &str) -> Result<()>;
}

/// The AI collaborator
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Never fails: errors are reported inside the returned `Analysis`
    async fn analyze(&self, prompt: &str) -> Analysis;
}
