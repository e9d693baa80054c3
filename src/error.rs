//! Error types for memcdriver
//!
//! Provides a unified error type for the client, the codec and the adapter.

use thiserror::Error;

/// Result type alias using DriverError
pub type Result<T> = std::result::Result<T, DriverError>;

/// Unified error type for memcdriver operations
#[derive(Debug, Error)]
pub enum DriverError {
    // -------------------------------------------------------------------------
    // I/O and Network Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Connection closed by server")]
    ConnectionClosed,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// ERROR, CLIENT_ERROR or SERVER_ERROR reply
    #[error("Server error: {0}")]
    Server(String),

    #[error("Malformed key: {0:?}")]
    MalformedKey(String),

    // -------------------------------------------------------------------------
    // Store Outcomes
    // -------------------------------------------------------------------------
    #[error("Key not found")]
    NotFound,

    #[error("Item not stored")]
    NotStored,

    #[error("Compare-and-swap conflict")]
    CasConflict,

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Decode error: {0}")]
    Decode(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Adapter Errors
    // -------------------------------------------------------------------------
    /// A store error tagged with the adapter operation that hit it
    #[error("{op} err: {source}")]
    Operation {
        op: &'static str,
        source: Box<DriverError>,
    },
}

impl DriverError {
    /// Tag an error with the adapter operation name ("Read", "Insert", ...)
    pub fn operation(op: &'static str, source: DriverError) -> Self {
        DriverError::Operation {
            op,
            source: Box::new(source),
        }
    }

    /// The innermost error, looking through operation tags
    pub fn root(&self) -> &DriverError {
        match self {
            DriverError::Operation { source, .. } => source.root(),
            other => other,
        }
    }

    /// True when the store reported a miss
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), DriverError::NotFound)
    }

    /// True when a create-if-absent write hit an existing key
    pub fn is_not_stored(&self) -> bool {
        matches!(self.root(), DriverError::NotStored)
    }

    /// True when the stored blob could not be decoded
    pub fn is_decode(&self) -> bool {
        matches!(self.root(), DriverError::Decode(_))
    }
}
