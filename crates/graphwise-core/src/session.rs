//! Per-topic session state and its turn transitions.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use graphwise_types::{ComposeMode, GraphDocument, PersistIntentKind, SessionRecord};
use tokio::sync::RwLock;

use crate::error::{SchemaError, TurnError};
use crate::validator::validate_prior;

/// Session shared between the orchestrator (single writer) and renderers
pub type SharedSession = Arc<RwLock<Session>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No graph yet
    Empty,
    /// A graph is held and `created_at` is fixed
    Active,
}

/// Issued by [`Session::begin_turn`]; the turn's result is only applied
/// while its number is still the latest one issued.
#[derive(Debug, Clone)]
pub struct TurnTicket {
    pub turn: u64,
    /// Graph the request is composed against (`None` selects Fresh mode)
    pub prior: Option<GraphDocument>,
    /// No turn of this session has been committed yet
    pub first_turn: bool,
}

impl TurnTicket {
    pub fn mode(&self) -> ComposeMode {
        if self.prior.is_some() {
            ComposeMode::Expand
        } else {
            ComposeMode::Fresh
        }
    }
}

/// Write the store must perform after a committed turn
#[derive(Debug, Clone, PartialEq)]
pub enum PersistIntent {
    Create {
        created_at: DateTime<Utc>,
        prompt: String,
        summary: String,
        graph: GraphDocument,
    },
    Update {
        created_at: DateTime<Utc>,
        graph: GraphDocument,
        /// Set when the turn regenerated the summary
        summary: Option<String>,
    },
}

impl PersistIntent {
    pub fn kind(&self) -> PersistIntentKind {
        match self {
            PersistIntent::Create { .. } => PersistIntentKind::Create,
            PersistIntent::Update { .. } => PersistIntentKind::Update,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            PersistIntent::Create { created_at, .. } | PersistIntent::Update { created_at, .. } => {
                *created_at
            }
        }
    }

    pub fn graph(&self) -> &GraphDocument {
        match self {
            PersistIntent::Create { graph, .. } | PersistIntent::Update { graph, .. } => graph,
        }
    }
}

/// One topic's graph and summary across turns.
///
/// Every transition that replaces state (`begin_turn`, `reset`, `load`)
/// bumps the turn counter, so results of earlier turns are discarded by
/// [`Session::apply`].
///
/// Commits keep asking for a `Create` write until one is confirmed with
/// [`Session::mark_persisted`], so a failed first insert is retried by the
/// next turn under the same `created_at`.
#[derive(Debug, Default)]
pub struct Session {
    created_at: Option<DateTime<Utc>>,
    current_graph: Option<GraphDocument>,
    summary_text: String,
    origin_prompt: Option<String>,
    latest_turn: u64,
    stored: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedSession {
        Arc::new(RwLock::new(Self::new()))
    }

    pub fn state(&self) -> SessionState {
        if self.current_graph.is_some() {
            SessionState::Active
        } else {
            SessionState::Empty
        }
    }

    pub fn mode(&self) -> ComposeMode {
        match self.state() {
            SessionState::Empty => ComposeMode::Fresh,
            SessionState::Active => ComposeMode::Expand,
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn current_graph(&self) -> Option<&GraphDocument> {
        self.current_graph.as_ref()
    }

    pub fn summary_text(&self) -> &str {
        &self.summary_text
    }

    pub fn origin_prompt(&self) -> Option<&str> {
        self.origin_prompt.as_deref()
    }

    pub fn latest_turn(&self) -> u64 {
        self.latest_turn
    }

    /// A row for this session exists in the store
    pub fn is_stored(&self) -> bool {
        self.stored
    }

    pub fn begin_turn(&mut self) -> TurnTicket {
        self.latest_turn += 1;
        TurnTicket {
            turn: self.latest_turn,
            prior: self.current_graph.clone(),
            first_turn: self.created_at.is_none(),
        }
    }

    /// Commit a validated graph produced for `ticket`.
    ///
    /// `summary` replaces the session summary when present. Returns the
    /// store write the commit requires.
    pub fn apply(
        &mut self,
        ticket: &TurnTicket,
        prompt: &str,
        graph: GraphDocument,
        summary: Option<String>,
    ) -> Result<PersistIntent, TurnError> {
        if ticket.turn != self.latest_turn {
            tracing::debug!(
                turn = ticket.turn,
                latest = self.latest_turn,
                "Discarding superseded turn result"
            );
            return Err(TurnError::Superseded { turn: ticket.turn });
        }

        if let Some(summary) = &summary {
            self.summary_text = summary.clone();
        }
        self.current_graph = Some(graph.clone());

        let created_at = match self.created_at {
            Some(created_at) => created_at,
            None => {
                let created_at = Utc::now();
                self.created_at = Some(created_at);
                self.origin_prompt = Some(prompt.to_string());
                created_at
            }
        };

        if self.stored {
            Ok(PersistIntent::Update {
                created_at,
                graph,
                summary,
            })
        } else {
            Ok(PersistIntent::Create {
                created_at,
                prompt: self.origin_prompt.clone().unwrap_or_else(|| prompt.to_string()),
                summary: self.summary_text.clone(),
                graph,
            })
        }
    }

    /// Record that the row keyed by `created_at` was written.
    ///
    /// Ignored when the session was reset or reloaded since that write.
    pub fn mark_persisted(&mut self, created_at: DateTime<Utc>) {
        if self.created_at == Some(created_at) {
            self.stored = true;
        }
    }

    /// Back to `Empty`; in-flight turns become stale
    pub fn reset(&mut self) {
        self.latest_turn += 1;
        self.created_at = None;
        self.stored = false;
        self.current_graph = None;
        self.summary_text.clear();
        self.origin_prompt = None;
    }

    /// Hydrate from a stored record without touching the network
    pub fn load(&mut self, record: &SessionRecord) -> Result<(), SchemaError> {
        let graph = validate_prior(&record.graph_data)?;

        self.latest_turn += 1;
        self.created_at = Some(record.created_at);
        self.stored = true;
        self.current_graph = graph;
        self.summary_text = record.generated_summary.clone();
        self.origin_prompt = Some(record.prompt.clone());
        Ok(())
    }
}
