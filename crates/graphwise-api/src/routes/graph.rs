use axum::{extract::State, Json};
use graphwise_core::{compose, validate, validate_prior, GraphDocument, PromptMode};
use graphwise_llm::Message;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Either a ready message sequence or the browser shape
/// (`userPrompt` plus the graph currently on screen)
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum GraphDataRequest {
    Messages {
        messages: Vec<Message>,
    },
    #[serde(rename_all = "camelCase")]
    Prompt {
        user_prompt: String,
        #[serde(default)]
        graph_data: Value,
    },
}

impl GraphDataRequest {
    fn into_messages(self) -> ApiResult<Vec<Message>> {
        match self {
            GraphDataRequest::Messages { messages } if messages.is_empty() => {
                Err(ApiError::BadRequest("messages must not be empty".to_string()))
            }
            GraphDataRequest::Messages { messages } => Ok(messages),
            GraphDataRequest::Prompt {
                user_prompt,
                graph_data,
            } => {
                if user_prompt.trim().is_empty() {
                    return Err(ApiError::BadRequest("userPrompt is required".to_string()));
                }
                let prior = validate_prior(&graph_data)
                    .map_err(|e| ApiError::BadRequest(format!("graphData: {}", e)))?;
                Ok(compose(PromptMode::from(prior.as_ref()), user_prompt.trim()))
            }
        }
    }
}

/// Ask the model for a graph and return it validated
pub async fn get_graph_data(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GraphDataRequest>,
) -> ApiResult<Json<GraphDocument>> {
    let messages = req.into_messages()?;
    tracing::info!(messages = messages.len(), "Graph request received");

    let raw = state.graph_endpoint.generate_graph(messages).await?;
    let graph = validate(&raw)?;

    tracing::info!(
        nodes = graph.nodes.len(),
        links = graph.links.len(),
        "Graph generated"
    );
    Ok(Json(graph))
}
