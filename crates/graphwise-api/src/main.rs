use std::sync::Arc;

use graphwise_api::{build_router, config::Config, state::AppState};
use graphwise_core::LlmGateway;
use graphwise_llm::{ChatClient, ClientFactory, ProviderConfig};
use graphwise_persist::StoreBuilder;
use graphwise_types::ModelConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config =
        Config::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting Graphwise API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    let models = ModelConfig::from(&config.llm);
    tracing::info!(
        base_url = %models.base_url,
        graph_model = %models.graph_model,
        summary_model = %models.summary_model,
        "Initializing LLM client"
    );
    let chat_client: Arc<dyn ChatClient> = ClientFactory::create_chat_client(
        ProviderConfig::openai_compatible(config.llm_api_key.clone(), models.base_url.clone()),
    )?;
    let gateway = Arc::new(LlmGateway::new(chat_client, models));

    let store = StoreBuilder::new()
        .uri(config.store_uri())
        .database(config.store.database.clone())
        .build()
        .await?;

    let state = Arc::new(AppState::new(config.clone(), gateway.clone(), gateway, store));
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
