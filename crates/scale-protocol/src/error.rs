//! Error types for the protocol engine.

use std::time::Duration;

use thiserror::Error;

/// Errors that end a session.
///
/// None of these escape the connection they happened on.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The peer closed the connection (a read returned zero bytes).
    #[error("peer closed the connection")]
    PeerClosed,

    /// A read or write did not complete within the configured deadline.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Transport-level error.
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer declared more elements than the configured limit.
    #[error("vector size {len} exceeds limit {max}")]
    VectorTooLarge { len: u32, max: u32 },

    /// Received bytes could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] scale_core::CoreError),
}

impl ProtocolError {
    /// Whether the peer went away, as opposed to misbehaving.
    pub fn is_disconnect(&self) -> bool {
        match self {
            ProtocolError::PeerClosed => true,
            ProtocolError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::UnexpectedEof
            ),
            _ => false,
        }
    }
}

/// Result type for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
