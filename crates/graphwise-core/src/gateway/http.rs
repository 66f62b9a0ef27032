use async_trait::async_trait;
use futures::StreamExt;
use graphwise_llm::Message;
use serde_json::{json, Value};

use crate::collaborators::{ByteStream, GraphEndpoint, SummaryEndpoint};
use crate::composer::SummaryRequest;
use crate::error::TurnError;
use crate::extract::extract_json;

pub const GRAPH_PATH: &str = "/api/get-graph-data";
pub const SUMMARY_PATH: &str = "/api/summary";

/// Model-serving endpoints reached over HTTP (a running graphwise-api)
pub struct HttpGateway {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Result<Self, TurnError> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(TurnError::transport)?;
        Ok(Self::with_client(http_client, base_url))
    }

    pub fn with_client(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post(&self, path: &str, body: &Value) -> Result<reqwest::Response, TurnError> {
        let response = self
            .http_client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(TurnError::transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(TurnError::Transport(format!(
                "{} returned {}: {}",
                path, status, error_text
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl GraphEndpoint for HttpGateway {
    async fn generate_graph(&self, messages: Vec<Message>) -> Result<Value, TurnError> {
        let response = self.post(GRAPH_PATH, &json!({ "messages": messages })).await?;
        let text = response.text().await.map_err(TurnError::transport)?;
        Ok(extract_json(&text)?)
    }
}

#[async_trait]
impl SummaryEndpoint for HttpGateway {
    async fn stream_summary(&self, request: SummaryRequest) -> Result<ByteStream, TurnError> {
        let body = serde_json::to_value(&request).map_err(TurnError::transport)?;
        let response = self.post(SUMMARY_PATH, &body).await?;

        let chunks = response.bytes_stream().map(|chunk| {
            chunk
                .map(|bytes| bytes.to_vec())
                .map_err(TurnError::transport)
        });
        Ok(Box::pin(chunks))
    }
}
