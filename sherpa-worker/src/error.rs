//! Job processing errors

use sherpa_core::domain::job::JobId;
use sherpa_core::domain::status::JobStatus;
use thiserror::Error;

/// Why a dequeued job did not complete
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The AI collaborator failed or returned nothing usable
    #[error("analysis failed: {0}")]
    Analysis(String),

    /// A tracked job arrived without a status record
    #[error("job {0} has no status record")]
    Untracked(JobId),

    /// A tracked job was already finished, e.g. pushed twice
    #[error("job {id} is already {status}")]
    AlreadyFinished { id: JobId, status: JobStatus },

    /// The handler task panicked
    #[error("handler panicked: {0}")]
    Panicked(String),

    /// Any other failure while handling the job
    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}
