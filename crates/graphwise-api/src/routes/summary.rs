use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use graphwise_core::{templates::SUMMARY_SYSTEM_PROMPT, SummaryRequest};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryBody {
    pub user_prompt: String,
    #[serde(default)]
    pub system: Option<String>,
}

/// Stream a topic summary in the text data-stream line protocol
pub async fn stream_summary(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SummaryBody>,
) -> ApiResult<Response> {
    if body.user_prompt.trim().is_empty() {
        return Err(ApiError::BadRequest("userPrompt is required".to_string()));
    }

    let request = SummaryRequest {
        system: body
            .system
            .unwrap_or_else(|| SUMMARY_SYSTEM_PROMPT.to_string()),
        user_prompt: body.user_prompt,
    };

    let stream = state.summary_endpoint.stream_summary(request).await?;
    tracing::debug!("Summary stream opened");

    let mut response = Body::from_stream(stream).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert("x-vercel-ai-data-stream", HeaderValue::from_static("v1"));

    Ok(response)
}
