//! Error types for the document model
//!
//! These are the validation and conversion failures that can happen before
//! anything touches the network. We use `thiserror` for automatic `Display`
//! and `Error` trait implementations.

use thiserror::Error;

/// Error when validating a database name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatabaseNameError {
    /// Name is empty
    #[error("database name cannot be empty")]
    Empty,

    /// Name exceeds maximum length
    #[error("database name too long: {length} chars (max {max})")]
    TooLong {
        /// Actual length of the name
        length: usize,
        /// Maximum allowed length
        max: usize,
    },

    /// Name contains invalid character
    #[error(
        "invalid character '{char}' at position {position} (only alphanumeric, dash, underscore, dot allowed)"
    )]
    InvalidChar {
        /// The invalid character
        char: char,
        /// Position of the invalid character
        position: usize,
    },

    /// Name starts with invalid character
    #[error("database name cannot start with '{char}' (must start with alphanumeric or underscore)")]
    InvalidStart {
        /// The invalid starting character
        char: char,
    },

    /// Name is reserved by the server
    #[error("database name '{name}' is reserved")]
    Reserved {
        /// The rejected name
        name: String,
    },
}

/// Error when parsing an Etag from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid etag '{input}': {reason}")]
pub struct EtagParseError {
    /// The text that failed to parse
    pub input: String,
    /// Why it failed
    pub reason: String,
}

/// Error converting between typed values and documents
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The value did not convert to a field map
    #[error("expected an object-shaped value, got {found}")]
    NotAnObject {
        /// Type name of what was produced instead
        found: &'static str,
    },

    /// The typed value refused to serialize
    #[error("serialize failed: {0}")]
    Serialize(String),

    /// The document did not fit the requested type
    #[error("deserialize failed: {0}")]
    Deserialize(String),

    /// NaN or an infinity, which JSON cannot represent
    #[error("non-finite float {value} cannot be stored")]
    NonFiniteFloat {
        /// The offending value as text
        value: String,
    },
}
