//! Error types for the sync engine.

use mapsync_protocol::ProtocolError;
use thiserror::Error;

/// Result type for engine operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while queueing or executing sync tasks.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The task queue is at capacity.
    #[error("task queue is full (capacity {capacity})")]
    QueueFull {
        /// The fixed queue capacity.
        capacity: usize,
    },

    /// A constructed request URL did not parse.
    #[error("malformed request url: {0}")]
    MalformedUrl(String),

    /// Network or transport error.
    #[error("network error: {0}")]
    Network(String),

    /// Payload or response decoding failed.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl SyncError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }
}
