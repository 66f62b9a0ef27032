use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use graphwise_llm::{
    encode_finish_part, encode_text_part, ChatClient, ChatOptions, ChatRequest, Message,
    StreamEvent,
};
use graphwise_types::ModelConfig;
use serde_json::Value;

use crate::collaborators::{ByteStream, GraphEndpoint, SummaryEndpoint};
use crate::composer::SummaryRequest;
use crate::error::{SchemaError, TurnError};
use crate::extract::extract_json;

/// Model-serving endpoints backed by an in-process [`ChatClient`].
///
/// Graph answers are extracted from the completion text; summary tokens
/// are re-encoded into the line protocol so that local and remote
/// summaries go through the same decoder.
pub struct LlmGateway {
    client: Arc<dyn ChatClient>,
    models: ModelConfig,
}

impl LlmGateway {
    pub fn new(client: Arc<dyn ChatClient>, models: ModelConfig) -> Self {
        Self { client, models }
    }

    pub fn models(&self) -> &ModelConfig {
        &self.models
    }

    fn options(&self) -> ChatOptions {
        let mut options = ChatOptions::new();
        if let Some(temp) = self.models.temperature {
            options = options.temperature(temp);
        }
        if let Some(max_tokens) = self.models.max_tokens {
            options = options.max_tokens(max_tokens);
        }
        options
    }
}

#[async_trait]
impl GraphEndpoint for LlmGateway {
    async fn generate_graph(&self, messages: Vec<Message>) -> Result<Value, TurnError> {
        tracing::debug!(
            model = %self.models.graph_model,
            messages = messages.len(),
            "Requesting graph"
        );

        let request =
            ChatRequest::new(self.models.graph_model.clone(), messages).with_options(self.options());
        let response = self.client.chat(request).await.map_err(TurnError::transport)?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Graph completion usage"
            );
        }

        let text = response.content.ok_or(SchemaError::NoJson)?;
        Ok(extract_json(&text)?)
    }
}

#[async_trait]
impl SummaryEndpoint for LlmGateway {
    async fn stream_summary(&self, request: SummaryRequest) -> Result<ByteStream, TurnError> {
        let messages = vec![
            Message::system(request.system),
            Message::human(request.user_prompt),
        ];
        let chat = ChatRequest::new(self.models.summary_model.clone(), messages)
            .with_options(self.options());

        let events = self
            .client
            .chat_stream(chat)
            .await
            .map_err(TurnError::transport)?;

        let lines = events.map(|event| match event {
            Ok(StreamEvent::Message { content }) => Ok(encode_text_part(&content).into_bytes()),
            Ok(StreamEvent::Done { finish_reason }) => {
                Ok(encode_finish_part(finish_reason.as_deref()).into_bytes())
            }
            Err(e) => Err(TurnError::transport(e)),
        });

        Ok(Box::pin(lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use futures::Stream;
    use graphwise_llm::{decode_summary_stream, ChatResponse};
    use std::pin::Pin;

    struct CannedClient {
        answer: String,
        tokens: Vec<&'static str>,
    }

    #[async_trait]
    impl ChatClient for CannedClient {
        async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse> {
            Ok(ChatResponse {
                content: Some(self.answer.clone()),
                usage: None,
                finish_reason: Some("stop".to_string()),
                raw: serde_json::Value::Null,
            })
        }

        async fn chat_stream(
            &self,
            _request: ChatRequest,
        ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>> {
            let mut events: Vec<Result<StreamEvent>> = self
                .tokens
                .iter()
                .map(|t| Ok(StreamEvent::Message { content: t.to_string() }))
                .collect();
            events.push(Ok(StreamEvent::Done {
                finish_reason: Some("stop".to_string()),
            }));
            Ok(Box::pin(futures::stream::iter(events)))
        }
    }

    fn gateway(answer: &str, tokens: Vec<&'static str>) -> LlmGateway {
        LlmGateway::new(
            Arc::new(CannedClient {
                answer: answer.to_string(),
                tokens,
            }),
            ModelConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_graph_is_extracted_from_fenced_answer() {
        let gateway = gateway(
            "```json\n{\"nodes\": [{\"id\": \"a\", \"name\": \"A\"}], \"links\": []}\n```",
            vec![],
        );
        let value = gateway.generate_graph(vec![Message::human("a")]).await.unwrap();
        assert_eq!(value["nodes"][0]["id"], "a");
    }

    #[tokio::test]
    async fn test_prose_answer_is_schema_error() {
        let gateway = gateway("Sorry, I can't draw graphs.", vec![]);
        let err = gateway.generate_graph(vec![]).await.unwrap_err();
        assert!(matches!(err, TurnError::Schema(SchemaError::NoJson)));
    }

    #[tokio::test]
    async fn test_summary_tokens_survive_reencoding() {
        let gateway = gateway("", vec!["Stoicism is ", "a \"practical\"", "\nphilosophy."]);
        let stream = gateway
            .stream_summary(crate::composer::compose_summary("stoicism"))
            .await
            .unwrap();

        let text = decode_summary_stream(stream, |_| {}).await.unwrap();
        assert_eq!(text, "Stoicism is a \"practical\"\nphilosophy.");
    }
}
