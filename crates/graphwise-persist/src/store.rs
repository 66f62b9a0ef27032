use async_trait::async_trait;
use chrono::{DateTime, Utc};
use graphwise_types::{GraphDocument, SessionRecord};

use crate::error::Result;

/// Persistence collaborator for session history
///
/// Rows are keyed by `(user_id, created_at)`; `created_at` is fixed when the
/// session is first created and never changes afterwards.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a freshly created session
    async fn insert(
        &self,
        user_id: &str,
        prompt: &str,
        summary: &str,
        graph: &GraphDocument,
        created_at: DateTime<Utc>,
    ) -> Result<SessionRecord>;

    /// Replace the graph of an existing session
    async fn update(
        &self,
        user_id: &str,
        created_at: DateTime<Utc>,
        graph: &GraphDocument,
    ) -> Result<()>;

    /// Replace the summary of an existing session
    async fn update_summary(
        &self,
        user_id: &str,
        created_at: DateTime<Utc>,
        summary: &str,
    ) -> Result<()>;

    /// Past sessions of a user, newest first
    async fn query_history(&self, user_id: &str, limit: Option<i64>) -> Result<Vec<SessionRecord>>;
}
