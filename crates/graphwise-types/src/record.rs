use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted session row, keyed by `(user_id, created_at)`.
///
/// `graph_data` is stored as raw JSON so that an empty `{}` document
/// (no graph yet) survives storage unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub user_id: String,
    pub prompt: String,
    pub generated_summary: String,
    pub graph_data: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(
        user_id: impl Into<String>,
        prompt: impl Into<String>,
        generated_summary: impl Into<String>,
        graph_data: serde_json::Value,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            prompt: prompt.into(),
            generated_summary: generated_summary.into(),
            graph_data,
            created_at,
            updated_at: created_at,
        }
    }
}
