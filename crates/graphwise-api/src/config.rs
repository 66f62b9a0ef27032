use config::{Config as ConfigLoader, ConfigError, Environment, File};
use graphwise_types::ModelConfig;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub llm: LlmConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub llm_api_key: String,
    #[serde(default)]
    pub mongodb_uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

fn default_timeout() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub base_url: String,
    pub graph_model: String,
    pub summary_model: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl From<&LlmConfig> for ModelConfig {
    fn from(config: &LlmConfig) -> Self {
        let mut models = ModelConfig::new(config.base_url.clone(), config.graph_model.clone())
            .with_summary_model(config.summary_model.clone());
        models.temperature = config.temperature;
        models.max_tokens = config.max_tokens;
        models
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// `memory://` or a MongoDB URI (overridden by `MONGODB_URI`)
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (with SERVER_, LLM_, LOG_, STORE_ prefixes)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false));

        let builder = ["SERVER", "LLM", "LOG", "STORE"]
            .into_iter()
            .fold(builder, |builder, prefix| {
                builder.add_source(
                    Environment::default()
                        .prefix(prefix)
                        .separator("_")
                        .try_parsing(true),
                )
            });

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        // Secrets come from ENV only
        cfg.llm_api_key = std::env::var("LLM_API_KEY").map_err(|_| {
            ConfigError::Message("LLM_API_KEY environment variable is required".to_string())
        })?;
        cfg.mongodb_uri = std::env::var("MONGODB_URI").ok();

        // Prefixed sources land at the root, nested keys are applied here
        let overrides: [(&str, &mut String); 6] = [
            ("LLM_BASE_URL", &mut cfg.llm.base_url),
            ("LLM_GRAPH_MODEL", &mut cfg.llm.graph_model),
            ("LLM_SUMMARY_MODEL", &mut cfg.llm.summary_model),
            ("LOG_LEVEL", &mut cfg.logging.level),
            ("LOG_FORMAT", &mut cfg.logging.format),
            ("STORE_DATABASE", &mut cfg.store.database),
        ];
        for (var, field) in overrides {
            if let Ok(value) = std::env::var(var) {
                *field = value;
            }
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            cfg.server.port = port
                .parse()
                .map_err(|_| ConfigError::Message(format!("invalid SERVER_PORT `{}`", port)))?;
        }

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Store URI, the `MONGODB_URI` secret taking precedence
    pub fn store_uri(&self) -> &str {
        self.mongodb_uri.as_deref().unwrap_or(&self.store.uri)
    }
}
