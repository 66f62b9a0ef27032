use std::sync::Arc;

use anyhow::{anyhow, Result};
use graphwise_persist::SessionStore;
use graphwise_types::OrchestratorConfig;

use crate::collaborators::{DocumentExtractor, GraphEndpoint, ResourceResolver, SummaryEndpoint};
use crate::orchestrator::Orchestrator;

/// Builder for an [`Orchestrator`] with optional collaborators
pub struct OrchestratorBuilder {
    graph_endpoint: Option<Arc<dyn GraphEndpoint>>,
    summary_endpoint: Option<Arc<dyn SummaryEndpoint>>,
    resolver: Option<Arc<dyn ResourceResolver>>,
    extractor: Option<Arc<dyn DocumentExtractor>>,
    store: Option<Arc<dyn SessionStore>>,
    config: OrchestratorConfig,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            graph_endpoint: None,
            summary_endpoint: None,
            resolver: None,
            extractor: None,
            store: None,
            config: OrchestratorConfig::default(),
        }
    }

    /// Use one gateway for both model endpoints
    pub fn gateway<G>(self, gateway: Arc<G>) -> Self
    where
        G: GraphEndpoint + SummaryEndpoint + 'static,
    {
        self.graph_endpoint(gateway.clone()).summary_endpoint(gateway)
    }

    pub fn graph_endpoint(mut self, endpoint: Arc<dyn GraphEndpoint>) -> Self {
        self.graph_endpoint = Some(endpoint);
        self
    }

    pub fn summary_endpoint(mut self, endpoint: Arc<dyn SummaryEndpoint>) -> Self {
        self.summary_endpoint = Some(endpoint);
        self
    }

    pub fn resolver(mut self, resolver: Arc<dyn ResourceResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn extractor(mut self, extractor: Arc<dyn DocumentExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Enable persistence of signed-in users' sessions
    pub fn store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Orchestrator> {
        let graph_endpoint = self
            .graph_endpoint
            .ok_or_else(|| anyhow!("Graph endpoint is required"))?;
        let summary_endpoint = self
            .summary_endpoint
            .ok_or_else(|| anyhow!("Summary endpoint is required"))?;

        Ok(
            Orchestrator::new(graph_endpoint, summary_endpoint, self.config).with_collaborators(
                self.resolver,
                self.extractor,
                self.store,
            ),
        )
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
