use std::pin::Pin;
use anyhow::Result;
use futures::{Stream, StreamExt};
use reqwest::Response;
use serde::{Deserialize, Serialize};

use crate::buffer_utils::CircularLineBuffer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Message {
        content: String,
    },

    Done {
        #[serde(skip_serializing_if = "Option::is_none")]
        finish_reason: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatStreamChunk {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    pub choices: Vec<StreamChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamChoice {
    pub index: u32,
    pub delta: Delta,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delta {
    pub role: Option<String>,
    pub content: Option<String>,
}

impl ChatStreamChunk {
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.delta.content.as_deref())
    }

    pub fn is_done(&self) -> bool {
        self.choices
            .first()
            .and_then(|c| c.finish_reason.as_ref())
            .is_some()
    }

    pub(crate) fn to_stream_events(&self) -> Vec<StreamEvent> {
        let mut events = Vec::new();

        if let Some(choice) = self.choices.first() {
            if let Some(content) = &choice.delta.content {
                if !content.is_empty() {
                    events.push(StreamEvent::Message {
                        content: content.clone(),
                    });
                }
            }

            if let Some(finish_reason) = &choice.finish_reason {
                events.push(StreamEvent::Done {
                    finish_reason: Some(finish_reason.clone()),
                });
            }
        }

        events
    }
}

/// Parse an OpenAI chat-completions SSE body into stream events
pub fn parse_chat_sse_stream(
    response: Response,
) -> Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>> {
    let stream = response.bytes_stream();

    Box::pin(async_stream::stream! {
        let mut byte_chunks = Box::pin(stream);
        let mut buffer = CircularLineBuffer::with_capacity(8192);
        // Providers send a finish_reason chunk before `[DONE]`; report only one
        let mut finished = false;

        'outer: while let Some(chunk_result) = byte_chunks.next().await {
            match chunk_result {
                Ok(bytes) => {
                    buffer.extend(&bytes);

                    while let Some(line_result) = buffer.next_line() {
                        let line = match line_result {
                            Ok(line) => line,
                            Err(e) => {
                                yield Err(e);
                                continue;
                            }
                        };

                        if line.is_empty() {
                            continue;
                        }

                        if let Some(data) = line.strip_prefix("data:") {
                            let data = data.trim_start();
                            if data == "[DONE]" {
                                if !finished {
                                    yield Ok(StreamEvent::Done { finish_reason: None });
                                }
                                break 'outer;
                            }

                            match serde_json::from_str::<ChatStreamChunk>(data) {
                                Ok(chunk) => {
                                    finished |= chunk.is_done();
                                    for event in chunk.to_stream_events() {
                                        yield Ok(event);
                                    }
                                }
                                Err(e) => yield Err(anyhow::anyhow!("Failed to parse chat chunk: {}", e)),
                            }
                        }
                    }
                }
                Err(e) => yield Err(anyhow::anyhow!("Stream error: {}", e)),
            }
        }
    })
}
