//! Transcript Result Repository
//!
//! Results of transcript jobs that were enqueued without an id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sherpa_core::domain::job::TranscriptPayload;
use sqlx::PgPool;

/// Stored transcript with its feedback
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TranscriptRecord {
    pub id: i64,
    pub company: String,
    pub attendees: Vec<String>,
    pub date: String,
    pub transcript: String,
    pub ai_feedback: String,
    pub created_at: DateTime<Utc>,
}

/// Insert a transcript together with its analysis
pub async fn insert(
    pool: &PgPool,
    payload: &TranscriptPayload,
    ai_feedback: &str,
) -> Result<TranscriptRecord, sqlx::Error> {
    let record = sqlx::query_as::<_, TranscriptRecord>(
        r#"
        INSERT INTO transcripts (company, attendees, date, transcript, ai_feedback, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, company, attendees, date, transcript, ai_feedback, created_at
        "#,
    )
    .bind(&payload.company)
    .bind(&payload.attendees)
    .bind(&payload.date)
    .bind(&payload.transcript)
    .bind(ai_feedback)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    tracing::info!("Saved transcript for company: {}", record.company);
    Ok(record)
}

/// List all stored transcripts, newest first
pub async fn list_all(pool: &PgPool) -> Result<Vec<TranscriptRecord>, sqlx::Error> {
    let records = sqlx::query_as::<_, TranscriptRecord>(
        r#"
        SELECT id, company, attendees, date, transcript, ai_feedback, created_at
        FROM transcripts
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    tracing::debug!("Fetched {} transcript record(s)", records.len());
    Ok(records)
}
