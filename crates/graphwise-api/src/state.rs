use std::sync::Arc;

use graphwise_core::{GraphEndpoint, SummaryEndpoint};
use graphwise_persist::SessionStore;

use crate::config::Config;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub graph_endpoint: Arc<dyn GraphEndpoint>,
    pub summary_endpoint: Arc<dyn SummaryEndpoint>,
    pub store: Arc<dyn SessionStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        graph_endpoint: Arc<dyn GraphEndpoint>,
        summary_endpoint: Arc<dyn SummaryEndpoint>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            graph_endpoint,
            summary_endpoint,
            store,
        }
    }
}
