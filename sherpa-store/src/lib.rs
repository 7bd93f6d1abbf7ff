//! Sherpa Store
//!
//! Postgres persistence for the job system:
//! - `jobs`: status records of tracked jobs
//! - `transcripts`, `icebreakers`: results of jobs enqueued without an id
//!
//! Each repository module exposes free functions over a `PgPool`.

pub mod db;
pub mod error;
pub mod repository;

pub use error::StoreError;
pub use sqlx::PgPool;
