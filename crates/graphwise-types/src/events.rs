use serde::{Deserialize, Serialize};

/// Which prompt template a turn was composed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComposeMode {
    /// No prior graph: author a new one
    Fresh,
    /// Prior graph sent back as context, answer must be a superset
    Expand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistIntentKind {
    Create,
    Update,
}

/// Progress of one turn, consumed by renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnEvent {
    TurnStarted {
        turn: u64,
        mode: ComposeMode,
    },

    /// Summary text streamed token-by-token
    SummaryDelta {
        content: String,
    },

    /// A validated graph was committed to the session
    GraphUpdated {
        turn: u64,
        nodes: usize,
        links: usize,
    },

    Persisted {
        turn: u64,
        intent: PersistIntentKind,
    },

    TurnFailed {
        turn: u64,
        message: String,
    },

    TurnCompleted {
        turn: u64,
        total_duration_ms: u64,
    },
}
