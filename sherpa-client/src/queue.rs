//! Queue store client
//!
//! Each operation is a single `POST {base}/{command}/{key}` round trip
//! against a REST-fronted list store, authenticated with a bearer token.
//! Producers append to the tail and consumers remove from the head, so a
//! list behaves as a FIFO queue.

use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sherpa_core::codec;
use sherpa_core::domain::job::Job;
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};

/// HTTP client for the list store holding the job queues
#[derive(Debug, Clone)]
pub struct QueueClient {
    /// Base URL of the REST endpoint
    base_url: String,
    /// Bearer credential
    token: String,
    /// HTTP client instance
    client: Client,
}

/// Body returned by every store command
#[derive(Debug, Deserialize)]
struct StoreResponse<T> {
    result: Option<T>,
    error: Option<String>,
}

impl QueueClient {
    /// Create a new queue client
    ///
    /// # Arguments
    /// * `base_url` - REST endpoint of the list store
    /// * `token` - Bearer token sent with every command
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(base_url, token, Client::new())
    }

    /// Create a queue client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(
        base_url: impl Into<String>,
        token: impl Into<String>,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        }
    }

    /// Get the base URL of the list store
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // List Operations
    // =============================================================================

    /// Append a value to the tail of a queue
    ///
    /// # Returns
    /// The queue length after the push
    pub async fn push(&self, queue: &str, value: &str) -> Result<u64> {
        let url = self.command_url("rpush", queue);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .body(value.to_string())
            .send()
            .await?;

        let length = self
            .handle_response::<u64>(response)
            .await?
            .ok_or_else(|| ClientError::ParseError("push returned no length".to_string()))?;

        debug!("Pushed entry to {} (length {})", queue, length);
        Ok(length)
    }

    /// Remove and return the oldest entry of a queue
    ///
    /// Returns `None` when the queue is empty.
    pub async fn pop_head(&self, queue: &str) -> Result<Option<Value>> {
        self.pop("lpop", queue).await
    }

    /// Remove and return the newest entry of a queue
    ///
    /// Returns `None` when the queue is empty.
    pub async fn pop_tail(&self, queue: &str) -> Result<Option<Value>> {
        self.pop("rpop", queue).await
    }

    /// Number of entries in a queue
    ///
    /// Best effort: failures are logged and reported as an empty queue,
    /// since the length only feeds diagnostics.
    pub async fn length(&self, queue: &str) -> u64 {
        match self.try_length(queue).await {
            Ok(length) => length,
            Err(e) => {
                warn!("Failed to read length of {}: {}", queue, e);
                0
            }
        }
    }

    /// Delete a queue and everything in it
    ///
    /// # Returns
    /// The number of keys removed (0 or 1)
    pub async fn delete(&self, queue: &str) -> Result<u64> {
        let url = self.command_url("del", queue);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let removed = self.handle_response::<u64>(response).await?.unwrap_or(0);
        info!("Deleted queue {} ({} key(s) removed)", queue, removed);
        Ok(removed)
    }

    // =============================================================================
    // Producer Contract
    // =============================================================================

    /// Encode a job and append it to a queue
    ///
    /// The caller must have created the job's status record first, so a
    /// consumer never sees a job without one.
    pub async fn enqueue(&self, queue: &str, job: &Job) -> Result<u64> {
        let id = job
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "untracked".to_string());

        let length = self.push(queue, &codec::encode(job)).await?;
        info!(
            "Enqueued {} job {} for '{}' to {} (length {})",
            job.kind(),
            id,
            job.payload.subject(),
            queue,
            length
        );
        Ok(length)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    async fn pop(&self, command: &str, queue: &str) -> Result<Option<Value>> {
        let url = self.command_url(command, queue);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let value = self
            .handle_response::<Value>(response)
            .await?
            .filter(|value| !value.is_null());

        if value.is_none() {
            debug!("Queue {} is empty", queue);
        }
        Ok(value)
    }

    async fn try_length(&self, queue: &str) -> Result<u64> {
        let url = self.command_url("llen", queue);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        Ok(self.handle_response::<u64>(response).await?.unwrap_or(0))
    }

    fn command_url(&self, command: &str, queue: &str) -> String {
        format!("{}/{}/{}", self.base_url, command, queue)
    }

    /// Check the status code and unwrap the store's `result` field
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<Option<T>> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        let body: StoreResponse<T> = response
            .json()
            .await
            .map_err(|e| {
                ClientError::ParseError(format!("Failed to parse store response: {}", e))
            })?;

        match body.error {
            Some(error) => Err(ClientError::StoreError(error)),
            None => Ok(body.result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sherpa_core::domain::job::{IcebreakerPayload, JobKind, JobPayload};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

    /// Minimal in-memory list store speaking the REST protocol
    #[derive(Clone, Default)]
    struct ListStore {
        items: Arc<Mutex<VecDeque<String>>>,
    }

    impl Respond for ListStore {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let mut items = self.items.lock().unwrap();
            let command = request.url.path().split('/').nth(1).unwrap_or_default();
            let result = match command {
                "rpush" => {
                    items.push_back(String::from_utf8_lossy(&request.body).to_string());
                    json!(items.len())
                }
                "lpop" => json!(items.pop_front()),
                "rpop" => json!(items.pop_back()),
                "llen" => json!(items.len()),
                "del" => {
                    let existed = !items.is_empty();
                    items.clear();
                    json!(if existed { 1 } else { 0 })
                }
                _ => return ResponseTemplate::new(400).set_body_string("unknown command"),
            };
            ResponseTemplate::new(200).set_body_json(json!({ "result": result }))
        }
    }

    async fn store_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ListStore::default())
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = QueueClient::new("http://localhost:8079/", "token");
        assert_eq!(client.base_url(), "http://localhost:8079");
    }

    #[tokio::test]
    async fn test_push_then_pop_head_is_fifo() {
        let server = store_server().await;
        let client = QueueClient::new(server.uri(), "secret");

        for (i, job) in ["Job-A", "Job-B", "Job-C"].iter().enumerate() {
            let length = client.push("test-order-queue", job).await.unwrap();
            assert_eq!(length, i as u64 + 1);
        }

        let mut popped = Vec::new();
        while let Some(value) = client.pop_head("test-order-queue").await.unwrap() {
            popped.push(value);
        }

        assert_eq!(popped, vec![json!("Job-A"), json!("Job-B"), json!("Job-C")]);
    }

    #[tokio::test]
    async fn test_pop_tail_returns_newest() {
        let server = store_server().await;
        let client = QueueClient::new(server.uri(), "secret");

        client.push("q", "first").await.unwrap();
        client.push("q", "second").await.unwrap();

        assert_eq!(client.pop_tail("q").await.unwrap(), Some(json!("second")));
        assert_eq!(client.length("q").await, 1);
    }

    #[tokio::test]
    async fn test_pop_on_empty_queue_is_none() {
        let server = store_server().await;
        let client = QueueClient::new(server.uri(), "secret");

        assert_eq!(client.pop_head("empty-queue").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_reports_removed_keys() {
        let server = store_server().await;
        let client = QueueClient::new(server.uri(), "secret");

        client.push("q", "entry").await.unwrap();
        assert_eq!(client.delete("q").await.unwrap(), 1);
        assert_eq!(client.delete("q").await.unwrap(), 0);
        assert_eq!(client.length("q").await, 0);
    }

    #[tokio::test]
    async fn test_enqueue_round_trips_through_codec() {
        let server = store_server().await;
        let client = QueueClient::new(server.uri(), "secret");
        let job = Job::new(JobPayload::Icebreaker(IcebreakerPayload {
            name: "Ada".to_string(),
            linkedin_bio: "Analyst".to_string(),
            pitch_deck_text: Some("Engines".to_string()),
        }));

        client.enqueue("icebreaker-queue", &job).await.unwrap();
        let raw = client.pop_head("icebreaker-queue").await.unwrap().unwrap();

        assert_eq!(codec::decode(&raw, JobKind::Transcript).unwrap(), job);
    }

    #[tokio::test]
    async fn test_push_failure_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rpush/q"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;
        let client = QueueClient::new(server.uri(), "wrong");

        let err = client.push("q", "entry").await.unwrap_err();
        assert!(matches!(err, ClientError::ApiError { status: 401, .. }));
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn test_store_error_body_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "error": "WRONGTYPE" })),
            )
            .mount(&server)
            .await;
        let client = QueueClient::new(server.uri(), "secret");

        let err = client.pop_head("q").await.unwrap_err();
        assert!(matches!(err, ClientError::StoreError(ref e) if e == "WRONGTYPE"));
    }

    #[tokio::test]
    async fn test_length_swallows_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let client = QueueClient::new(server.uri(), "secret");

        assert_eq!(client.length("q").await, 0);
    }
}
