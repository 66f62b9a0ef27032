pub mod config;
pub mod events;
pub mod graph;
pub mod record;

pub use config::{ExpansionPolicy, ModelConfig, OrchestratorConfig, SummaryPolicy};
pub use events::{ComposeMode, PersistIntentKind, TurnEvent};
pub use graph::{GraphDocument, GraphLink, GraphNode, LinkEndpoint, ROOT_GROUP};
pub use record::SessionRecord;
