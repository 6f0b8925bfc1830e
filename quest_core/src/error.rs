//! Error types for the estimator and the trial session

use thiserror::Error;

/// Errors raised by the QUEST estimator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuestError {
    /// Configuration or call argument out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Normalization constant vanished during an update
    #[error("Posterior degenerated after {trials} trial(s); previous posterior kept")]
    DegeneratePosterior { trials: usize },
}

/// Errors raised by the trial session
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// A response arrived with no stimulus on screen
    #[error("No stimulus is pending a response")]
    NoPendingStimulus,

    /// The trial budget has been used up
    #[error("Session finished after {0} trial(s)")]
    Finished(u32),

    #[error(transparent)]
    Estimator(#[from] QuestError),
}

/// Result type for estimator operations
pub type QuestResult<T> = Result<T, QuestError>;
