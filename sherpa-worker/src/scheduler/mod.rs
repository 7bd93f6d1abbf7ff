//! Scheduler layer for the worker
//!
//! This layer drains the configured queues and hands each entry to the
//! processing service. It owns the loop timing: idle sleeps when there is
//! no work and backoff after unexpected errors.

pub mod poller;

pub use poller::JobPoller;
