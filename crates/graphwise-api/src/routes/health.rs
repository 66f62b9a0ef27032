use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: HashMap<String, String>,
}

/// Health check endpoint
///
/// Reports the store as reachable when a trivial history query succeeds
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let mut services = HashMap::new();

    let store_status = match state.store.query_history("_health_check", Some(1)).await {
        Ok(_) => "connected",
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            "disconnected"
        }
    };
    services.insert("store".to_string(), store_status.to_string());
    services.insert("llm".to_string(), state.config.llm.base_url.clone());

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        services,
    })
}
