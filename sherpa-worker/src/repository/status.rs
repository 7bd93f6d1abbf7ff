//! Status repository backed by the Postgres `jobs` table

use anyhow::{Context, Result};
use async_trait::async_trait;
use sherpa_core::domain::job::JobId;
use sherpa_core::domain::status::{JobStatusRecord, Transition};
use sherpa_store::PgPool;
use sherpa_store::repository::job_repository;

use super::StatusRepository;

pub struct PgStatusRepository {
    pool: PgPool,
}

impl PgStatusRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatusRepository for PgStatusRepository {
    async fn read(&self, id: JobId) -> Result<Option<JobStatusRecord>> {
        job_repository::find_by_id(&self.pool, id)
            .await
            .with_context(|| format!("Failed to read status of job {}", id))
    }

    async fn transition(&self, id: JobId, transition: Transition) -> Result<()> {
        let target = transition.target();
        job_repository::transition(&self.pool, id, &transition)
            .await
            .with_context(|| format!("Failed to mark job {} {}", id, target))
    }
}
