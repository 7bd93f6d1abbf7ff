//! Icebreaker Result Repository
//!
//! Results of icebreaker jobs that were enqueued without an id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sherpa_core::domain::job::IcebreakerPayload;
use sqlx::PgPool;

/// Stored icebreaker request with the generated message
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct IcebreakerRecord {
    pub id: i64,
    pub name: String,
    pub linkedin_bio: String,
    pub pitch_deck_text: Option<String>,
    pub ai_result: String,
    pub created_at: DateTime<Utc>,
}

/// Insert an icebreaker request together with its generated message
pub async fn insert(
    pool: &PgPool,
    payload: &IcebreakerPayload,
    ai_result: &str,
) -> Result<IcebreakerRecord, sqlx::Error> {
    let record = sqlx::query_as::<_, IcebreakerRecord>(
        r#"
        INSERT INTO icebreakers (name, linkedin_bio, pitch_deck_text, ai_result, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, linkedin_bio, pitch_deck_text, ai_result, created_at
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.linkedin_bio)
    .bind(&payload.pitch_deck_text)
    .bind(ai_result)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    tracing::info!("Saved icebreaker for: {}", record.name);
    Ok(record)
}

/// List all stored icebreakers, newest first
pub async fn list_all(pool: &PgPool) -> Result<Vec<IcebreakerRecord>, sqlx::Error> {
    let records = sqlx::query_as::<_, IcebreakerRecord>(
        r#"
        SELECT id, name, linkedin_bio, pitch_deck_text, ai_result, created_at
        FROM icebreakers
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    tracing::debug!("Fetched {} icebreaker record(s)", records.len());
    Ok(records)
}
