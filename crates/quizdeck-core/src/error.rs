//! Engine error types.
//!
//! Every variant is recoverable at the caller boundary: the CLI (or any
//! other front end) renders these as user-visible messages. Grading itself
//! never fails; malformed answers degrade to zero credit instead.

use thiserror::Error;

/// Errors surfaced by the session engine and the aggregator.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The selected quiz has zero questions; a session cannot start.
    #[error("quiz has no questions")]
    EmptyQuestionSet,

    /// An answer was recorded against an id not in the active question set.
    #[error("unknown question id: {id}")]
    InvalidQuestion { id: String },

    /// Course or general aggregation yielded zero questions.
    #[error("no questions found for {scope}")]
    AggregationNotFound { scope: String },

    /// A stored document failed minimal shape validation.
    #[error("malformed quiz document: {0}")]
    MalformedDocument(String),
}

impl EngineError {
    /// Returns `true` if the requested content simply does not exist, as
    /// opposed to content that exists but is unusable.
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::AggregationNotFound { .. })
    }
}
