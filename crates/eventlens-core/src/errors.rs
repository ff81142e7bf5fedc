//! Error type for eventlens core operations

use serde::Serialize;

/// Errors raised while building identifiers or decoding records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum CoreError {
    /// An identifier was empty or otherwise unusable
    #[error("Invalid {kind}: {value:?}")]
    InvalidId {
        /// Identifier kind ("user id", "address id", ...)
        kind: &'static str,
        /// The rejected raw value
        value: String,
    },

    /// A record could not be decoded from its wire form
    #[error("Decode error: {message}")]
    Decode {
        /// Error message describing the decode failure
        message: String,
    },
}

impl CoreError {
    /// Create an invalid identifier error
    pub fn invalid_id(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidId {
            kind,
            value: value.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}

/// Standard Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
