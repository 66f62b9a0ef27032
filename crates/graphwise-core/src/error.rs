use graphwise_persist::PersistError;
use thiserror::Error;

/// Model output (or stored state) that is not a usable graph document
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemaError {
    #[error("graph document must be a JSON object")]
    NotAnObject,

    #[error("graph document is missing the `{field}` array")]
    MissingArray { field: &'static str },

    #[error("node #{index} is invalid: {reason}")]
    InvalidNode { index: usize, reason: String },

    #[error("duplicate node id `{id}`")]
    DuplicateNode { id: String },

    #[error("link #{index} is invalid: {reason}")]
    InvalidLink { index: usize, reason: String },

    #[error("link #{index} {endpoint} references unknown node `{id}`")]
    DanglingLink {
        index: usize,
        endpoint: &'static str,
        id: String,
    },

    #[error("expanded graph dropped {} previously known node(s): {}", missing.len(), missing.join(", "))]
    NotSuperset { missing: Vec<String> },

    #[error("model response contains no JSON object")]
    NoJson,
}

/// Why a turn did not complete.
///
/// A failed turn never takes the process down and never corrupts the
/// session: the last-known-good graph stays in place.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("invalid graph: {0}")]
    Schema(#[from] SchemaError),

    #[error("model endpoint failed: {0}")]
    Transport(String),

    #[error("resource lookup failed: {0}")]
    Lookup(String),

    #[error("document extraction failed: {0}")]
    Extraction(String),

    #[error("persistence failed: {0}")]
    Persistence(#[from] PersistError),

    #[error("turn {turn} was superseded by a newer request")]
    Superseded { turn: u64 },

    #[error("prompt is empty")]
    EmptyPrompt,
}

impl TurnError {
    /// Every turn failure leaves the session usable; retry is a new submission
    pub fn is_recoverable(&self) -> bool {
        true
    }

    /// True when the session graph was left exactly as before the turn
    pub fn state_unchanged(&self) -> bool {
        !matches!(self, TurnError::Persistence(_))
    }

    pub(crate) fn transport(err: impl std::fmt::Display) -> Self {
        TurnError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TurnError>;
