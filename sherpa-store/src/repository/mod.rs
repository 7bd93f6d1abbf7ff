//! Repository Module
//!
//! Data access layer. Each module handles database operations for one table.

pub mod icebreakers;
pub mod jobs;
pub mod transcripts;

// Re-export for convenience
pub use icebreakers as icebreaker_repository;
pub use jobs as job_repository;
pub use transcripts as transcript_repository;
