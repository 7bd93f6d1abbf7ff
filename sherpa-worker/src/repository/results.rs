//! Result repository backed by the Postgres result tables

use anyhow::{Context, Result};
use async_trait::async_trait;
use sherpa_core::domain::job::{IcebreakerPayload, TranscriptPayload};
use sherpa_store::PgPool;
use sherpa_store::repository::{icebreaker_repository, transcript_repository};

use super::ResultRepository;

pub struct PgResultRepository {
    pool: PgPool,
}

impl PgResultRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResultRepository for PgResultRepository {
    async fn insert_transcript(&self, payload: &TranscriptPayload, analysis: &str) -> Result<()> {
        transcript_repository::insert(&self.pool, payload, analysis)
            .await
            .with_context(|| format!("Failed to save transcript for {}", payload.company))?;
        Ok(())
    }

    async fn insert_icebreaker(&self, payload: &IcebreakerPayload, analysis: &str) -> Result<()> {
        icebreaker_repository::insert(&self.pool, payload, analysis)
            .await
            .with_context(|| format!("Failed to save icebreaker for {}", payload.name))?;
        Ok(())
    }
}
