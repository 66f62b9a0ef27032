//! # Graphwise
//!
//! Explore a topic as a knowledge graph that grows with every question:
//! - **Fresh / Expand prompting**: the first prompt authors a graph, follow-ups
//!   send it back to the model and ask for a superset
//! - **Validated output**: model JSON is extracted, checked and normalised
//!   before it touches the session
//! - **Streaming summary**: a companion summary decoded token by token
//! - **History**: sessions persisted per user (in memory or MongoDB)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use graphwise::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let explorer = ExplorerBuilder::new()
//!         .api_key(std::env::var("LLM_API_KEY")?)
//!         .build()
//!         .await?;
//!
//!     let session = Session::shared();
//!     let (tx, _rx) = tokio::sync::mpsc::channel(100);
//!     let turn = explorer
//!         .submit(&session, TurnRequest::new("urban traffic congestion"), &tx)
//!         .await?;
//!     println!("{} nodes", turn.graph.nodes.len());
//!
//!     // Follow-ups expand the same graph
//!     explorer
//!         .submit(&session, TurnRequest::new("navigation tools"), &tx)
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **graphwise-types**: graph document, session record, turn events, configs
//! - **graphwise-llm**: OpenAI-compatible client and the summary line protocol
//! - **graphwise-persist**: session store (in memory, MongoDB)
//! - **graphwise-core**: validator, composer, session state machine, orchestrator
//!
//! The HTTP front lives in `graphwise-api`.

pub use graphwise_core as core;
pub use graphwise_llm as llm;
pub use graphwise_persist as persist;
pub use graphwise_types as types;

// Re-export commonly used types
pub use graphwise_core::{
    Orchestrator, SchemaError, Session, SharedSession, TurnError, TurnInput, TurnOutput,
    TurnRequest,
};
pub use graphwise_types::{GraphDocument, GraphLink, GraphNode, TurnEvent};

/// High-level builder for an explorer
pub mod builder;

/// Convenient prelude with commonly used types
pub mod prelude {
    pub use crate::builder::ExplorerBuilder;
    pub use crate::core::{Orchestrator, Session, TurnInput, TurnRequest};
    pub use crate::types::{
        ExpansionPolicy, GraphDocument, GraphNode, SummaryPolicy, TurnEvent,
    };
    pub use anyhow::Result;
}
