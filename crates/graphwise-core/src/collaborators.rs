//! Narrow interfaces to everything outside the core: the model-serving
//! endpoints, resource lookup and document text extraction.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use graphwise_llm::Message;
use graphwise_types::GraphNode;
use serde_json::Value;

use crate::composer::SummaryRequest;
use crate::error::TurnError;

/// Raw summary stream in the `0:"…"` line protocol
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, TurnError>> + Send>>;

/// Answers a composed message sequence with one JSON graph document
#[async_trait]
pub trait GraphEndpoint: Send + Sync {
    async fn generate_graph(&self, messages: Vec<Message>) -> Result<Value, TurnError>;
}

/// Streams a short summary of the user's topic
#[async_trait]
pub trait SummaryEndpoint: Send + Sync {
    async fn stream_summary(&self, request: SummaryRequest) -> Result<ByteStream, TurnError>;
}

/// Turns a reference (e.g. an article URL) into descriptive text
#[async_trait]
pub trait ResourceResolver: Send + Sync {
    /// Whether `text` should be resolved rather than used verbatim
    fn is_locator(&self, text: &str) -> bool;

    async fn resolve(&self, locator: &str) -> Result<String, TurnError>;
}

/// An uploaded file to be used as the prompt
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, document: &Document) -> Result<String, TurnError>;
}

/// What the user submitted for a turn
#[derive(Debug, Clone, PartialEq)]
pub enum TurnInput {
    Text(String),
    Document(Document),
}

impl TurnInput {
    pub fn text(text: impl Into<String>) -> Self {
        TurnInput::Text(text.into())
    }

    /// Selecting a node in the rendered graph asks about it by name
    pub fn from_node(node: &GraphNode) -> Self {
        TurnInput::Text(node.name.clone())
    }
}

impl From<&str> for TurnInput {
    fn from(text: &str) -> Self {
        TurnInput::text(text)
    }
}

impl From<String> for TurnInput {
    fn from(text: String) -> Self {
        TurnInput::Text(text)
    }
}

/// One submission: who is asking and what
#[derive(Debug, Clone)]
pub struct TurnRequest {
    /// `None` for guests, whose turns are not persisted
    pub user_id: Option<String>,
    pub input: TurnInput,
}

impl TurnRequest {
    pub fn new(input: impl Into<TurnInput>) -> Self {
        Self {
            user_id: None,
            input: input.into(),
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}
