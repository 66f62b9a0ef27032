use async_trait::async_trait;
use bson::doc;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{Client, Collection};

use graphwise_types::{GraphDocument, SessionRecord};

use crate::dbs::mongo::models::MongoSessionRecord;
use crate::error::{PersistError, Result};
use crate::store::SessionStore;

const COLLECTION: &str = "graph_data";

pub struct MongoSessionStore {
    collection: Collection<MongoSessionRecord>,
}

impl MongoSessionStore {
    /// Connect to MongoDB and create the store
    pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        Ok(Self::new(&client, database))
    }

    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection(COLLECTION);
        Self { collection }
    }

    async fn set_fields(
        &self,
        user_id: &str,
        created_at: DateTime<Utc>,
        mut fields: bson::Document,
    ) -> Result<()> {
        fields.insert("updated_at", bson::DateTime::now());
        let filter = doc! {
            "user_id": user_id,
            "created_at": bson::DateTime::from_chrono(created_at),
        };

        let result = self
            .collection
            .update_one(filter, doc! { "$set": fields })
            .await?;

        if result.matched_count == 0 {
            return Err(PersistError::SessionNotFound {
                user_id: user_id.to_string(),
                created_at,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MongoSessionStore {
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
        let row: MongoSessionRecord = record.into();

        self.collection.insert_one(&row).await?;
        tracing::debug!(user_id, %created_at, "Session inserted into MongoDB");
        Ok(row.into())
    }

    async fn update(
        &self,
        user_id: &str,
        created_at: DateTime<Utc>,
        graph: &GraphDocument,
    ) -> Result<()> {
        let graph_data = bson::to_bson(graph)?;
        self.set_fields(user_id, created_at, doc! { "graph_data": graph_data })
            .await
    }

    async fn update_summary(
        &self,
        user_id: &str,
        created_at: DateTime<Utc>,
        summary: &str,
    ) -> Result<()> {
        self.set_fields(user_id, created_at, doc! { "generated_summary": summary })
            .await
    }

    async fn query_history(&self, user_id: &str, limit: Option<i64>) -> Result<Vec<SessionRecord>> {
        let mut find = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": -1 });

        if let Some(limit) = limit {
            find = find.limit(limit);
        }

        let rows: Vec<MongoSessionRecord> = find.await?.try_collect().await?;
        Ok(rows.into_iter().map(SessionRecord::from).collect())
    }
}
