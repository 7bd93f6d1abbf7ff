//! Core domain types
//!
//! Shared between the worker (consumes and updates), the store (persists)
//! and the CLI (produces and inspects).

pub mod analysis;
pub mod job;
pub mod status;
