//! Job Status Repository
//!
//! Handles all database operations on job status records. Transition
//! ordering is enforced in the `UPDATE` itself, so two writers can never
//! interleave a forbidden move.

use chrono::{DateTime, Utc};
use sherpa_core::domain::job::{JobId, JobKind};
use sherpa_core::domain::status::{JobStatus, JobStatusRecord, Transition};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;

const MAINTENANCE_RESET_REASON: &str = "reset by maintenance";

/// Insert a pending record for a job about to be enqueued
pub async fn create(
    pool: &PgPool,
    id: JobId,
    kind: JobKind,
    fields: serde_json::Value,
) -> Result<JobStatusRecord, StoreError> {
    let record = JobStatusRecord::pending(id, kind, fields);

    let result = sqlx::query(
        r#"
        INSERT INTO jobs (id, kind, status, fields, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(id.0)
    .bind(kind.as_str())
    .bind(record.status.as_str())
    .bind(&record.fields)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::Duplicate { id });
    }

    tracing::debug!("Created pending {} job {}", kind, id);
    Ok(record)
}

/// Move a job to a new status
///
/// Fails with `InvalidTransition` when the current status is not an
/// allowed source for the target, and `NotFound` when no record exists.
pub async fn transition(
    pool: &PgPool,
    id: JobId,
    transition: &Transition,
) -> Result<(), StoreError> {
    let target = transition.target();
    let sources: Vec<&str> = target
        .allowed_sources()
        .iter()
        .map(JobStatus::as_str)
        .collect();

    let result = sqlx::query(
        r#"
        UPDATE jobs
        SET status = $1, result = $2, error = $3, updated_at = $4
        WHERE id = $5 AND status = ANY($6)
        "#,
    )
    .bind(target.as_str())
    .bind(transition.result())
    .bind(transition.error())
    .bind(Utc::now())
    .bind(id.0)
    .bind(sources)
    .execute(pool)
    .await?;

    if result.rows_affected() > 0 {
        tracing::debug!("Job {} is now {}", id, target);
        return Ok(());
    }

    match find_by_id(pool, id).await? {
        Some(record) => Err(StoreError::InvalidTransition {
            id,
            from: record.status,
            to: target,
        }),
        None => Err(StoreError::NotFound(id)),
    }
}

/// Find a status record by job id
pub async fn find_by_id(pool: &PgPool, id: JobId) -> Result<Option<JobStatusRecord>, StoreError> {
    let row = sqlx::query_as::<_, JobRow>(
        r#"
        SELECT id, kind, status, fields, result, error, created_at, updated_at
        FROM jobs
        WHERE id = $1
        "#,
    )
    .bind(id.0)
    .fetch_optional(pool)
    .await?;

    row.map(JobStatusRecord::try_from).transpose()
}

/// List status records of one kind, newest first
pub async fn list_by_kind(pool: &PgPool, kind: JobKind) -> Result<Vec<JobStatusRecord>, StoreError> {
    let rows = sqlx::query_as::<_, JobRow>(
        r#"
        SELECT id, kind, status, fields, result, error, created_at, updated_at
        FROM jobs
        WHERE kind = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(kind.as_str())
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(JobStatusRecord::try_from).collect()
}

/// Fail every job still pending or processing
///
/// Maintenance only: used after queues are cleared, when no worker can
/// ever pick those jobs up again.
pub async fn reset_in_flight(pool: &PgPool) -> Result<u64, StoreError> {
    let result = sqlx::query(
        r#"
        UPDATE jobs
        SET status = $1, error = $2, updated_at = $3
        WHERE status = ANY($4)
        "#,
    )
    .bind(JobStatus::Failed.as_str())
    .bind(MAINTENANCE_RESET_REASON)
    .bind(Utc::now())
    .bind(vec![JobStatus::Pending.as_str(), JobStatus::Processing.as_str()])
    .execute(pool)
    .await?;

    tracing::info!("Reset {} in-flight job(s)", result.rows_affected());
    Ok(result.rows_affected())
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct JobRow {
    id: Uuid,
    kind: String,
    status: String,
    fields: serde_json::Value,
    result: Option<String>,
    error: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for JobStatusRecord {
    type Error = StoreError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let kind = row
            .kind
            .parse::<JobKind>()
            .map_err(|e| StoreError::Corrupt(format!("job {}: {}", row.id, e)))?;
        let status = JobStatus::parse(&row.status).ok_or_else(|| {
            StoreError::Corrupt(format!("job {}: unknown status '{}'", row.id, row.status))
        })?;

        Ok(JobStatusRecord {
            id: JobId(row.id),
            kind,
            status,
            fields: row.fields,
            result: row.result,
            error: row.error,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
