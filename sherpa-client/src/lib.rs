//! Sherpa HTTP Clients
//!
//! Type-safe HTTP clients for the two remote services the job system
//! depends on:
//!
//! - [`QueueClient`]: the REST list store backing the job queues
//! - [`InferenceClient`]: the chat-completion API that produces analyses
//!
//! # Example
//!
//! ```no_run
//! use sherpa_client::QueueClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sherpa_client::ClientError> {
//!     let queue = QueueClient::new("https://example.upstash.io", "token");
//!
//!     let length = queue.push("transcript-queue", "{\"company\":\"Acme\"}").await?;
//!     println!("queue now holds {} entries", length);
//!     Ok(())
//! }
//! ```

pub mod error;
mod inference;
mod queue;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use inference::{DEFAULT_INFERENCE_URL, DEFAULT_MODEL, InferenceClient};
pub use queue::QueueClient;
