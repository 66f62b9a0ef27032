use async_trait::async_trait;
use chrono::{DateTime, Utc};
use graphwise_types::{GraphDocument, SessionRecord};
use tokio::sync::RwLock;

use crate::error::{PersistError, Result};
use crate::store::SessionStore;

/// Process-local store, used by the CLI and by tests
#[derive(Default)]
pub struct InMemorySessionStore {
    records: RwLock<Vec<SessionRecord>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    async fn modify<F>(&self, user_id: &str, created_at: DateTime<Utc>, apply: F) -> Result<()>
    where
        F: FnOnce(&mut SessionRecord),
    {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.user_id == user_id && r.created_at == created_at)
            .ok_or_else(|| PersistError::SessionNotFound {
                user_id: user_id.to_string(),
                created_at,
            })?;

        apply(record);
        record.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(
        &self,
        user_id: &str,
        prompt: &str,
        summary: &str,
        graph: &GraphDocument,
        created_at: DateTime<Utc>,
    ) -> Result<SessionRecord> {
        let record = SessionRecord::new(
            user_id,
            prompt,
            summary,
            serde_json::to_value(graph)?,
            created_at,
        );

        self.records.write().await.push(record.clone());
        tracing::debug!(user_id, %created_at, "Session inserted");
        Ok(record)
    }

    async fn update(
        &self,
        user_id: &str,
        created_at: DateTime<Utc>,
        graph: &GraphDocument,
    ) -> Result<()> {
        let graph_data = serde_json::to_value(graph)?;
        self.modify(user_id, created_at, |record| record.graph_data = graph_data)
            .await
    }

    async fn update_summary(
        &self,
        user_id: &str,
        created_at: DateTime<Utc>,
        summary: &str,
    ) -> Result<()> {
        self.modify(user_id, created_at, |record| {
            record.generated_summary = summary.to_string()
        })
        .await
    }

    async fn query_history(&self, user_id: &str, limit: Option<i64>) -> Result<Vec<SessionRecord>> {
        let records = self.records.read().await;
        let mut history: Vec<SessionRecord> = records
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();

        history.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = limit {
            history.truncate(limit.max(0) as usize);
        }

        Ok(history)
    }
}
