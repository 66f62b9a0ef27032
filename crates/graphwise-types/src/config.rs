use serde::{Deserialize, Serialize};

/// When the companion summary is (re)generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryPolicy {
    /// Only on the turn that creates the session
    #[default]
    FirstTurnOnly,
    /// On every turn, replacing the previous summary
    EveryTurn,
}

/// How an expansion answer is checked against the previous graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionPolicy {
    /// The returned document replaces the old one as-is
    #[default]
    TrustModel,
    /// Reject answers that drop any previously known node id
    RequireSuperset,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    #[serde(default)]
    pub summary_policy: SummaryPolicy,
    #[serde(default)]
    pub expansion_policy: ExpansionPolicy,
}

impl OrchestratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_summary_policy(mut self, policy: SummaryPolicy) -> Self {
        self.summary_policy = policy;
        self
    }

    pub fn with_expansion_policy(mut self, policy: ExpansionPolicy) -> Self {
        self.expansion_policy = policy;
        self
    }
}

/// Models used for the two model-serving endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub base_url: String,
    pub graph_model: String,
    pub summary_model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ModelConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            base_url: base_url.into(),
            graph_model: model.clone(),
            summary_model: model,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_graph_model(mut self, model: impl Into<String>) -> Self {
        self.graph_model = model.into();
        self
    }

    pub fn with_summary_model(mut self, model: impl Into<String>) -> Self {
        self.summary_model = model.into();
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.studio.nebius.ai/v1".to_string(),
            graph_model: "meta-llama/Meta-Llama-3.1-405B-Instruct".to_string(),
            summary_model: "meta-llama/Meta-Llama-3.1-70B-Instruct".to_string(),
            temperature: Some(0.7),
            max_tokens: Some(4096),
        }
    }
}
