//! Analyzer backed by the chat-completions API

use async_trait::async_trait;
use sherpa_client::InferenceClient;
use sherpa_core::domain::analysis::Analysis;

use super::Analyzer;

#[async_trait]
impl Analyzer for InferenceClient {
    async fn analyze(&self, prompt: &str) -> Analysis {
        InferenceClient::analyze(self, prompt).await
    }
}
