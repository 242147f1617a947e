//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, PartialEq)]
pub enum LanderError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),

    /// The replay buffer holds fewer transitions than requested.
    #[error("Requested {requested} transitions, but the buffer holds {available}")]
    InsufficientTransitions {
        /// Number of transitions requested.
        requested: usize,
        /// Number of transitions stored.
        available: usize,
    },

    /// An action outside of `[0, n_actions)`.
    #[error("Invalid action {action}, the number of actions is {n_actions}")]
    InvalidAction {
        /// The given action.
        action: usize,
        /// The number of actions.
        n_actions: usize,
    },

    /// Dimensions of two collaborating objects disagree.
    #[error("Dimension mismatch in {what}: expected {expected}, got {got}")]
    DimensionMismatch {
        /// What was compared.
        what: String,
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        got: usize,
    },

    /// A configuration value is out of its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The regressor produced non-finite values.
    #[error("Training diverged: {0}")]
    TrainingDivergence(String),
}
