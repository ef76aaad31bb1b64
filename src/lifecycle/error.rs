//! Error types for a dispatch run.

use thiserror::Error;

/// Errors that abort a whole run.
///
/// Per-order failures are not errors; they come back as
/// [`OrderOutcome`](crate::model::OrderOutcome) values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// The order data is absent or empty. No workers were started.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The order data is present but not shaped as expected.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// The dispatcher configuration is unusable.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// A worker task panicked or was cancelled.
    #[error("Worker failed: {0}")]
    WorkerFailed(String),
}

impl From<serde_json::Error> for DispatchError {
    fn from(e: serde_json::Error) -> Self {
        DispatchError::MalformedInput(e.to_string())
    }
}

impl From<tokio::task::JoinError> for DispatchError {
    fn from(e: tokio::task::JoinError) -> Self {
        DispatchError::WorkerFailed(e.to_string())
    }
}
