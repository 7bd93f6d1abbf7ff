//! Service layer
//!
//! Services contain the business logic of the worker: turning a decoded
//! job into a prompt, calling the analyzer and recording the outcome.

mod processing;
mod prompt;

pub use processing::JobProcessor;
