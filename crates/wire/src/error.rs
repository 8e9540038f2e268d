//! Errors for the wire codec

use tenantdb_core::ConversionError;
use thiserror::Error;

/// A document that cannot be written in the wire format
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// A name the wire format uses for itself
    #[error("'{field}' is reserved and cannot be used as a {location} field")]
    ReservedField {
        /// The rejected name
        field: String,
        /// `body` or `metadata`
        location: &'static str,
    },

    /// A value with no JSON form
    #[error(transparent)]
    Value(#[from] ConversionError),
}

/// A response or request body that does not match the wire format
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Body is not valid JSON
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// JSON is valid but has the wrong shape
    #[error("unexpected shape: expected {expected}, got {actual}")]
    UnexpectedShape {
        /// What the codec was looking for
        expected: &'static str,
        /// What it found
        actual: String,
    },

    /// A required member is absent
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    /// An Etag value failed to parse
    #[error("invalid etag: {0}")]
    InvalidEtag(String),

    /// A timestamp failed to parse
    #[error("invalid timestamp '{value}': {reason}")]
    InvalidTimestamp {
        /// Raw text
        value: String,
        /// Parser message
        reason: String,
    },

    /// A put body uses a name owned by the server
    #[error("reserved field '{0}' in request body")]
    ReservedField(String),
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        DecodeError::InvalidJson(e.to_string())
    }
}
