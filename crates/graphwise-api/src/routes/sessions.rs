use axum::{
    extract::{Query, State},
    Json,
};
use graphwise_types::SessionRecord;
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub user_id: String,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Stored sessions of a user, newest first
pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<SessionRecord>>> {
    if query.user_id.trim().is_empty() {
        return Err(ApiError::BadRequest("user_id is required".to_string()));
    }

    let records = state.store.query_history(&query.user_id, query.limit).await?;
    tracing::debug!(user_id = %query.user_id, count = records.len(), "History listed");

    Ok(Json(records))
}
