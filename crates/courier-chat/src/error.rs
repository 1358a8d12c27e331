//! Error types for the conversation engine.

use courier_core::error::CourierError;

/// Failures at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error {status}")]
    Status { status: u16 },
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),
}

impl From<TransportError> for CourierError {
    fn from(err: TransportError) -> Self {
        CourierError::Transport(err.to_string())
    }
}

/// Errors raised inside an orchestrated operation.
///
/// These never leave `SessionController`; each is turned into exactly one
/// assistant message at the operation boundary.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("{0}")]
    Transport(#[from] TransportError),
    #[error("could not encode context: {0}")]
    Serialization(#[from] serde_json::Error),
}
