pub mod builder;
pub mod collaborators;
pub mod composer;
pub mod error;
pub mod extract;
pub mod gateway;
pub mod lookup;
pub mod orchestrator;
pub mod session;
pub mod templates;
pub mod validator;

pub use builder::OrchestratorBuilder;
pub use collaborators::{
    ByteStream, Document, DocumentExtractor, GraphEndpoint, ResourceResolver, SummaryEndpoint,
    TurnInput, TurnRequest,
};
pub use composer::{compose, compose_summary, PromptMode, SummaryRequest};
pub use error::{SchemaError, TurnError};
pub use extract::extract_json;
pub use gateway::{HttpGateway, LlmGateway};
pub use lookup::{PlainTextExtractor, WikipediaResolver};
pub use orchestrator::{EventSender, Orchestrator, TurnOutput};
pub use session::{PersistIntent, Session, SessionState, SharedSession, TurnTicket};
pub use validator::{check_superset, serialize_graph, validate, validate_prior};

// Re-export the data model used across the core API
pub use graphwise_types::{
    ComposeMode, ExpansionPolicy, GraphDocument, GraphLink, GraphNode, OrchestratorConfig,
    PersistIntentKind, SummaryPolicy, TurnEvent,
};
