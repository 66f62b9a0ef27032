// OpenAI-compatible client implementation (OpenAI, Nebius, Groq, vLLM...)

use crate::streaming::{parse_chat_sse_stream, StreamEvent};
use crate::traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, TokenUsage};
use crate::types::{Content, Message};
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::Stream;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::pin::Pin;

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI-compatible chat client (HTTP direct, no SDK)
pub struct OpenAIClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenAIClient {
    /// Create new client with API key against the public OpenAI endpoint
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, OPENAI_API_BASE)
    }

    /// Create new client against any OpenAI-compatible base URL
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .context("Invalid API key format")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build chat completion request payload
    fn build_chat_request(
        &self,
        model: &str,
        messages: Vec<Message>,
        options: &ChatOptions,
        stream: bool,
    ) -> Result<Value> {
        let openai_messages: Vec<Value> = messages
            .into_iter()
            .map(|msg| self.convert_message(msg))
            .collect::<Result<Vec<_>>>()?;

        let mut obj = Map::new();
        obj.insert("model".to_string(), Value::from(model));
        obj.insert("messages".to_string(), Value::Array(openai_messages));
        obj.insert("stream".to_string(), Value::Bool(stream));

        if let Some(temp) = options.temperature {
            obj.insert("temperature".to_string(), serde_json::json!(temp));
        }
        if let Some(max_tokens) = options.max_tokens {
            obj.insert("max_tokens".to_string(), serde_json::json!(max_tokens));
        }
        if options.json_mode {
            obj.insert(
                "response_format".to_string(),
                serde_json::json!({ "type": "json_object" }),
            );
        }

        Ok(Value::Object(obj))
    }

    /// Convert our Message type to OpenAI format
    fn convert_message(&self, message: Message) -> Result<Value> {
        let role = message.role().to_string();
        let (content, name) = match message {
            Message::System { content, name }
            | Message::Human { content, name }
            | Message::AI { content, name } => (content, name),
        };

        let mut obj = Map::new();
        obj.insert("role".to_string(), Value::String(role));
        obj.insert("content".to_string(), self.convert_content(content)?);
        if let Some(name) = name {
            obj.insert("name".to_string(), Value::String(name));
        }
        Ok(Value::Object(obj))
    }

    /// Convert Content to OpenAI format (string or array)
    fn convert_content(&self, content: Content) -> Result<Value> {
        match content {
            Content::Text(s) => Ok(Value::String(s)),
            parts @ Content::Parts(_) => Ok(serde_json::to_value(parts)?),
        }
    }

    async fn post_chat(&self, payload: &Value) -> Result<reqwest::Response> {
        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .json(payload)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("LLM API error ({}): {}", status, error_text);
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatClient for OpenAIClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = self.build_chat_request(
            &request.model,
            request.messages,
            &request.options,
            false,
        )?;

        tracing::debug!(model = %request.model, "Sending chat completion");
        let response = self.post_chat(&payload).await?;

        let raw: OpenAIChatResponse = response
            .json()
            .await
            .context("Failed to parse response")?;

        let choice = raw.choices.first();
        Ok(ChatResponse {
            content: choice.and_then(|c| c.message.content.clone()),
            usage: raw.usage.as_ref().map(|usage| TokenUsage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            }),
            finish_reason: choice.and_then(|c| c.finish_reason.clone()),
            raw: serde_json::to_value(&raw)?,
        })
    }

    async fn chat_stream(
        &self,
        request: ChatRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>> {
        let payload = self.build_chat_request(
            &request.model,
            request.messages,
            &request.options,
            true,
        )?;

        tracing::debug!(model = %request.model, "Opening chat stream");
        let response = self.post_chat(&payload).await?;

        Ok(parse_chat_sse_stream(response))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAIChatResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Choice {
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResponseMessage {
    pub role: String,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_chat_request_json_mode() {
        let client = OpenAIClient::with_base_url("key", "http://localhost:1/v1/").unwrap();
        let payload = client
            .build_chat_request(
                "llama",
                vec![Message::system("sys"), Message::human("hi")],
                &ChatOptions::new().temperature(0.7).json_mode(true),
                false,
            )
            .unwrap();

        assert_eq!(client.base_url(), "http://localhost:1/v1");
        assert_eq!(payload["model"], "llama");
        assert_eq!(payload["stream"], false);
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][1]["content"], "hi");
        assert_eq!(payload["response_format"]["type"], "json_object");
        assert!(payload.get("max_tokens").is_none());
    }
}
