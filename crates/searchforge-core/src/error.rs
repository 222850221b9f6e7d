//! Error types for SearchForge

use std::time::Duration;

use thiserror::Error;

/// Main error type for SearchForge operations.
#[derive(Debug, Error)]
pub enum SolverError {
    /// A phase or acceptor was misconfigured. Raised before any step runs.
    #[error("Configuration error in '{parameter}': {message}")]
    Config { parameter: String, message: String },

    /// The incrementally calculated score disagrees with a from-scratch calculation.
    #[error("Score corruption {context}: expected {expected} but recalculated {actual}")]
    ScoreCorruption {
        expected: String,
        actual: String,
        context: String,
    },

    /// Undoing a tentative move did not restore the score from before the move.
    #[error("Undo corruption after move {move_repr}: score was {before} before the move, {after} after its undo")]
    UndoCorruption {
        before: String,
        after: String,
        move_repr: String,
    },

    /// Move evaluation workers did not stop within the grace period.
    #[error("Move threads did not shut down within {grace:?}")]
    WorkerShutdown { grace: Duration },

    /// A move evaluation worker died or lost its channel.
    #[error("Move thread failed: {0}")]
    WorkerFailed(String),

    /// Invalid operation for the current solver state.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl SolverError {
    /// Builds a configuration error for `parameter`.
    pub fn config(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        SolverError::Config {
            parameter: parameter.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for SearchForge operations
pub type Result<T> = std::result::Result<T, SolverError>;
