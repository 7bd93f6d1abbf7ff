//! Sherpa Core
//!
//! Core types for the Sherpa analysis job system.
//!
//! This crate contains:
//! - Domain types: jobs, payloads, status records and analysis outcomes
//! - Codec: normalization of queue entries into canonical jobs

pub mod codec;
pub mod domain;

pub use codec::{MalformedJob, decode, encode};
