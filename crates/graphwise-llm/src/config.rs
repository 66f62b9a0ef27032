// Configuration layer for provider-agnostic LLM client creation

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::openai::{OpenAIClient, OPENAI_API_BASE};
use crate::traits::ChatClient;

/// Configuration for an OpenAI-compatible provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub api_key: String,
    /// Base URL for the API (optional, defaults to https://api.openai.com/v1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Provider-specific configuration details
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAI(OpenAIConfig),
}

impl ProviderConfig {
    /// Create OpenAI provider config
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::OpenAI(OpenAIConfig::new(api_key))
    }

    /// Create config for any OpenAI-compatible endpoint
    pub fn openai_compatible(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::OpenAI(OpenAIConfig::new(api_key).with_base_url(base_url))
    }

    pub fn base_url(&self) -> &str {
        match self {
            Self::OpenAI(config) => config.base_url.as_deref().unwrap_or(OPENAI_API_BASE),
        }
    }
}

/// Factory for creating LLM clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    /// Create a chat client from provider configuration
    pub fn create_chat_client(config: ProviderConfig) -> Result<Arc<dyn ChatClient>> {
        let base_url = config.base_url().to_string();
        match config {
            ProviderConfig::OpenAI(openai_config) => {
                let client = OpenAIClient::with_base_url(openai_config.api_key, base_url)?;
                Ok(Arc::new(client))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_config_default_base() {
        let config = ProviderConfig::openai("test-key");
        assert_eq!(config.base_url(), OPENAI_API_BASE);
    }

    #[test]
    fn test_compatible_base_url() {
        let config = ProviderConfig::openai_compatible("test-key", "https://api.studio.nebius.ai/v1/");
        assert_eq!(config.base_url(), "https://api.studio.nebius.ai/v1/");
        assert!(ClientFactory::create_chat_client(config).is_ok());
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = ProviderConfig::openai_compatible("test-key", "http://localhost:8000/v1");

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"type\":\"openai\""));
        let deserialized: ProviderConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.base_url(), "http://localhost:8000/v1");
    }
}
