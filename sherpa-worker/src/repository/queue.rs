//! Queue repository backed by the REST list store

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use sherpa_client::QueueClient;

use super::QueueRepository;

#[async_trait]
impl QueueRepository for QueueClient {
    async fn pop_head(&self, queue: &str) -> Result<Option<Value>> {
        QueueClient::pop_head(self, queue)
            .await
            .with_context(|| format!("Failed to dequeue from {}", queue))
    }
}
