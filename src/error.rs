// Error types module

use thiserror::Error;

/// Centralized error type for the SDK
///
/// Synchronous entry points (URL building, signing, construction) return these
/// directly. Asynchronous operations deliver them only through the awaited
/// result or the completion callback, never both.
#[derive(Error, Debug)]
pub enum ImageKitError {
    /// Missing or invalid client options, or mutually exclusive URL options
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed invocation (missing required argument, no runtime for a callback, ...)
    #[error("Usage error: {0}")]
    Usage(String),

    /// The remote service answered with a non-success status
    #[error("Remote error ({status}): {message}")]
    Remote {
        status: u16,
        message: String,
        help: Option<String>,
    },

    /// The request never produced a response (connection, timeout, TLS)
    #[error("Transport error: {0}")]
    Transport(String),

    /// A transformation value cannot be represented in the directive grammar
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// A response body did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ImageKitError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding(message.into())
    }

    /// HTTP status of a remote failure, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, ImageKitError>;
