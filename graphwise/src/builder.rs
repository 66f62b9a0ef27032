//! High-level builder API for creating an explorer

use anyhow::{Context, Result};
use graphwise_core::{HttpGateway, LlmGateway, Orchestrator, PlainTextExtractor, WikipediaResolver};
use graphwise_llm::{ClientFactory, ProviderConfig};
use graphwise_persist::StoreBuilder;
use graphwise_types::{ExpansionPolicy, ModelConfig, OrchestratorConfig, SummaryPolicy};
use std::sync::Arc;

/// High-level builder for an [`Orchestrator`] wired to real collaborators
///
/// # Example
///
/// ```rust,no_run
/// use graphwise::prelude::*;
///
/// # #[tokio::main]
/// # async fn main() -> Result<()> {
/// let explorer = ExplorerBuilder::new()
///     .api_key("key")
///     .base_url("https://api.studio.nebius.ai/v1")
///     .summary_policy(SummaryPolicy::EveryTurn)
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct ExplorerBuilder {
    // LLM
    api_key: Option<String>,
    models: ModelConfig,

    // Remote graphwise-api instead of a local client
    remote_url: Option<String>,

    // Store
    store_uri: String,
    database: String,

    wikipedia: bool,
    config: OrchestratorConfig,
}

impl Default for ExplorerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplorerBuilder {
    /// Create a builder with the default models and an in-memory store
    pub fn new() -> Self {
        Self {
            api_key: None,
            models: ModelConfig::default(),
            remote_url: None,
            store_uri: "memory://".to_string(),
            database: "graphwise".to_string(),
            wikipedia: true,
            config: OrchestratorConfig::default(),
        }
    }

    /// API key of the OpenAI-compatible provider
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.models.base_url = base_url.into();
        self
    }

    pub fn models(mut self, models: ModelConfig) -> Self {
        self.models = models;
        self
    }

    /// Talk to a running graphwise-api instead of the provider
    pub fn remote(mut self, url: impl Into<String>) -> Self {
        self.remote_url = Some(url.into());
        self
    }

    /// Session store (`memory://` or a MongoDB URI with the `mongodb` feature)
    pub fn store(mut self, uri: impl Into<String>, database: impl Into<String>) -> Self {
        self.store_uri = uri.into();
        self.database = database.into();
        self
    }

    /// Resolve Wikipedia links pasted as prompts (default: on)
    pub fn wikipedia(mut self, enabled: bool) -> Self {
        self.wikipedia = enabled;
        self
    }

    pub fn summary_policy(mut self, policy: SummaryPolicy) -> Self {
        self.config.summary_policy = policy;
        self
    }

    pub fn expansion_policy(mut self, policy: ExpansionPolicy) -> Self {
        self.config.expansion_policy = policy;
        self
    }

    pub async fn build(self) -> Result<Orchestrator> {
        let mut builder = Orchestrator::builder()
            .config(self.config)
            .extractor(Arc::new(PlainTextExtractor));

        builder = match self.remote_url {
            Some(url) => builder.gateway(Arc::new(HttpGateway::new(url)?)),
            None => {
                let api_key = self
                    .api_key
                    .context("API key is required unless a remote endpoint is set")?;
                let client = ClientFactory::create_chat_client(ProviderConfig::openai_compatible(
                    api_key,
                    self.models.base_url.clone(),
                ))?;
                builder.gateway(Arc::new(LlmGateway::new(client, self.models)))
            }
        };

        if self.wikipedia {
            builder = builder.resolver(Arc::new(WikipediaResolver::new()));
        }

        let store = StoreBuilder::new()
            .uri(self.store_uri)
            .database(self.database)
            .build()
            .await?;

        builder.store(store).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_requires_key_or_remote() {
        assert!(ExplorerBuilder::new().build().await.is_err());
        assert!(ExplorerBuilder::new().api_key("k").build().await.is_ok());
        assert!(ExplorerBuilder::new()
            .remote("http://localhost:8000")
            .build()
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_policies_reach_orchestrator() {
        let explorer = ExplorerBuilder::new()
            .api_key("k")
            .expansion_policy(ExpansionPolicy::RequireSuperset)
            .build()
            .await
            .unwrap();
        assert_eq!(
            explorer.config().expansion_policy,
            ExpansionPolicy::RequireSuperset
        );
    }
}
