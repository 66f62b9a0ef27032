use std::sync::Arc;

use crate::error::{PersistError, Result};
use crate::memory::InMemorySessionStore;
use crate::store::SessionStore;

/// Builds a [`SessionStore`] from a connection URI.
///
/// `memory://` (or no URI) gives a process-local store; `mongodb://` and
/// `mongodb+srv://` need the `mongodb` feature.
pub struct StoreBuilder {
    uri: Option<String>,
    database: Option<String>,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self {
            uri: None,
            database: None,
        }
    }

    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn database(mut self, db: impl Into<String>) -> Self {
        self.database = Some(db.into());
        self
    }

    pub async fn build(self) -> Result<Arc<dyn SessionStore>> {
        let uri = self.uri.unwrap_or_else(|| "memory://".to_string());

        if uri.starts_with("memory://") {
            tracing::info!("Using in-memory session store");
            return Ok(Arc::new(InMemorySessionStore::new()));
        }

        if uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://") {
            let database = self
                .database
                .ok_or_else(|| PersistError::Internal("database is required".to_string()))?;
            return Self::connect_mongo(&uri, &database).await;
        }

        Err(PersistError::Internal(format!("Unsupported store URI: {}", uri)))
    }

    #[cfg(feature = "mongodb")]
    async fn connect_mongo(uri: &str, database: &str) -> Result<Arc<dyn SessionStore>> {
        let store = crate::dbs::mongo::MongoSessionStore::connect(uri, database).await?;
        tracing::info!(database, "Connected to MongoDB session store");
        Ok(Arc::new(store))
    }

    #[cfg(not(feature = "mongodb"))]
    async fn connect_mongo(_uri: &str, _database: &str) -> Result<Arc<dyn SessionStore>> {
        Err(PersistError::Internal(
            "MongoDB support requires the `mongodb` feature".to_string(),
        ))
    }
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
