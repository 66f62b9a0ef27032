use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use graphwise_types::SessionRecord;

/// MongoDB-specific session row (uses ObjectId and BSON dates)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoSessionRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: String,
    pub prompt: String,
    pub generated_summary: String,
    pub graph_data: serde_json::Value,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl From<SessionRecord> for MongoSessionRecord {
    fn from(record: SessionRecord) -> Self {
        Self {
            // Generic records carry a UUID, Mongo rows get their own ObjectId
            id: ObjectId::new(),
            user_id: record.user_id,
            prompt: record.prompt,
            generated_summary: record.generated_summary,
            graph_data: record.graph_data,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl From<MongoSessionRecord> for SessionRecord {
    fn from(record: MongoSessionRecord) -> Self {
        Self {
            id: record.id.to_hex(),
            user_id: record.user_id,
            prompt: record.prompt,
            generated_summary: record.generated_summary,
            graph_data: record.graph_data,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
