//! Job status domain types
//!
//! The lifecycle is `Pending -> Processing -> Completed | Failed`. The
//! allowed-transition table lives here so every store implementation
//! enforces the same contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::job::{JobId, JobKind};

/// Lifecycle state of a tracked job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(JobStatus::Pending),
            "processing" => Some(JobStatus::Processing),
            "completed" => Some(JobStatus::Completed),
            "failed" => Some(JobStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether a record in `self` may move to `next`
    ///
    /// Repeating a non-terminal state is accepted so retried calls stay
    /// idempotent. Terminal states never change.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (self, next),
            (Pending, Pending)
                | (Pending, Processing)
                | (Pending, Failed)
                | (Processing, Processing)
                | (Processing, Completed)
                | (Processing, Failed)
        )
    }

    /// States from which a record may move to `self`
    pub fn allowed_sources(&self) -> &'static [JobStatus] {
        use JobStatus::*;
        match self {
            Pending => &[Pending],
            Processing => &[Pending, Processing],
            Completed => &[Processing],
            Failed => &[Pending, Processing],
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requested status change, carrying the data that state needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Processing,
    Completed { analysis: String },
    Failed { reason: String },
}

impl Transition {
    pub fn target(&self) -> JobStatus {
        match self {
            Transition::Processing => JobStatus::Processing,
            Transition::Completed { .. } => JobStatus::Completed,
            Transition::Failed { .. } => JobStatus::Failed,
        }
    }

    pub fn result(&self) -> Option<&str> {
        match self {
            Transition::Completed { analysis } => Some(analysis),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Transition::Failed { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Persisted lifecycle state of a tracked job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatusRecord {
    pub id: JobId,
    pub kind: JobKind,
    pub status: JobStatus,
    /// Submitted job fields, kept for inspection
    pub fields: serde_json::Value,
    /// Present only when completed
    pub result: Option<String>,
    /// Present only when failed
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobStatusRecord {
    /// New pending record, as written by a producer before enqueueing
    pub fn pending(id: JobId, kind: JobKind, fields: serde_json::Value) -> Self {
        let now = Utc::now();
        Self {
            id,
            kind,
            status: JobStatus::Pending,
            fields,
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a transition in memory, enforcing the allowed table
    pub fn apply(&mut self, transition: &Transition) -> Result<(), (JobStatus, JobStatus)> {
        let next = transition.target();
        if !self.status.can_transition_to(next) {
            return Err((self.status, next));
        }

        self.status = next;
        self.result = transition.result().map(str::to_string);
        self.error = transition.error().map(str::to_string);
        self.updated_at = Utc::now();
        Ok(())
    }
}
