use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Status records of tracked jobs
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS jobs (
            id UUID PRIMARY KEY,
            kind TEXT NOT NULL,
            status TEXT NOT NULL,
            fields JSONB NOT NULL DEFAULT '{}',
            result TEXT,
            error TEXT,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Results of untracked transcript jobs
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transcripts (
            id BIGSERIAL PRIMARY KEY,
            company TEXT NOT NULL,
            attendees TEXT[] NOT NULL DEFAULT '{}',
            date TEXT NOT NULL,
            transcript TEXT NOT NULL,
            ai_feedback TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Results of untracked icebreaker jobs
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS icebreakers (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            linkedin_bio TEXT NOT NULL,
            pitch_deck_text TEXT,
            ai_result TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_jobs_status ON jobs(status)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_jobs_kind_created ON jobs(kind, created_at DESC)")
        .execute(pool)
        .await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
