//! Broker error types.

use thiserror::Error;

/// Errors that can occur while publishing or reading messages.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// The event could not be serialized into a message body.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The message log rejected an operation.
    #[error("Message store error: {0}")]
    Store(String),
}

/// Result type for broker operations.
pub type Result<T> = std::result::Result<T, BrokerError>;
