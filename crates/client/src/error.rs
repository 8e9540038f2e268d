//! Error types for client operations.
//!
//! Every failure a command can produce is represented by the [`Error`] enum.
//! Variants carry typed fields so callers can branch on the details, and the
//! whole enum is serializable so errors can be logged or forwarded as JSON.
//!
//! A read miss is not an error: `get` and `head` return `Ok(None)`.

use serde::{Deserialize, Serialize};
use std::fmt;
use tenantdb_core::{ConversionError, DatabaseNameError, Etag};
use tenantdb_wire::{DecodeError, EncodeError};

/// What went wrong below the command layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportErrorKind {
    /// The exchange did not finish in time
    Timeout,
    /// The server could not be reached
    Connect,
    /// The connection failed mid-exchange
    Io,
    /// The server answered with something that is not the wire format
    Protocol,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Io => "io",
            TransportErrorKind::Protocol => "protocol",
        };
        f.write_str(name)
    }
}

/// Failure reported by a [`Transport`](crate::Transport)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} failure: {reason}")]
pub struct TransportError {
    /// Failure category
    pub kind: TransportErrorKind,
    /// Human-readable detail
    pub reason: String,
}

impl TransportError {
    /// Build a transport error
    pub fn new(kind: TransportErrorKind, reason: impl Into<String>) -> Self {
        TransportError {
            kind,
            reason: reason.into(),
        }
    }
}

fn etag_or_none(etag: &Option<Etag>) -> String {
    match etag {
        Some(etag) => etag.to_string(),
        None => "none".to_string(),
    }
}

/// Command execution errors.
///
/// # Categories
///
/// | Category | Variants | Description |
/// |----------|----------|-------------|
/// | Concurrency | `ConcurrencyConflict` | Expected Etag did not match |
/// | Routing | `InvalidDatabaseName`, `InvalidKey` | Bad database name or key |
/// | Transport | `TransportFailure` | Timeout, connect, I/O or malformed response |
/// | Server | `ServerError` | Well-formed error answer from the server |
/// | Local | `Conversion`, `Config` | Failed before any request was sent |
///
/// # Example
///
/// ```ignore
/// match db.put("users/1", Some(etag), &doc, &Metadata::new()) {
///     Ok(result) => println!("stored at {}", result.etag),
///     Err(Error::ConcurrencyConflict { actual, .. }) => {
///         println!("someone else wrote {:?} first", actual);
///     }
///     Err(e) => return Err(e),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    // ==================== Concurrency ====================
    /// Conditional write rejected because the stored revision differs
    #[error(
        "concurrency conflict on '{key}': expected {}, actual {}",
        etag_or_none(.expected),
        etag_or_none(.actual)
    )]
    ConcurrencyConflict {
        /// Document key
        key: String,
        /// Etag the write was conditional on
        expected: Option<Etag>,
        /// Etag actually stored, `None` if the document does not exist
        actual: Option<Etag>,
    },

    // ==================== Routing ====================
    /// Database name does not follow the naming rules
    #[error("invalid database name '{name}': {reason}")]
    InvalidDatabaseName {
        /// The rejected name
        name: String,
        /// Which rule it broke
        reason: String,
    },

    /// Document key cannot be addressed on the wire
    #[error("invalid key '{key}': {reason}")]
    InvalidKey {
        /// The rejected key
        key: String,
        /// Which rule it broke
        reason: String,
    },

    // ==================== Transport ====================
    /// Network or protocol level failure
    #[error("transport failure ({kind}): {reason}")]
    TransportFailure {
        /// Failure category
        kind: TransportErrorKind,
        /// Detail from the transport or decoder
        reason: String,
    },

    // ==================== Server ====================
    /// Error response from the server
    #[error("server error {status}: {message}")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// Server message, or the raw body
        message: String,
    },

    // ==================== Local ====================
    /// A document or typed value has no wire form
    #[error("conversion error: {reason}")]
    Conversion {
        /// What could not be converted
        reason: String,
    },

    /// Bad configuration or base address
    #[error("config error: {reason}")]
    Config {
        /// What is wrong
        reason: String,
    },
}

impl Error {
    /// Invalid database name from a validation failure
    pub(crate) fn invalid_database_name(name: &str, err: DatabaseNameError) -> Self {
        Error::InvalidDatabaseName {
            name: name.to_string(),
            reason: err.to_string(),
        }
    }

    /// Malformed response
    pub(crate) fn protocol(reason: impl Into<String>) -> Self {
        Error::TransportFailure {
            kind: TransportErrorKind::Protocol,
            reason: reason.into(),
        }
    }

    /// True for `ConcurrencyConflict`
    pub fn is_concurrency_conflict(&self) -> bool {
        matches!(self, Error::ConcurrencyConflict { .. })
    }

    /// True for `TransportFailure`
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Error::TransportFailure { .. })
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Error::TransportFailure {
            kind: e.kind,
            reason: e.reason,
        }
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Error::protocol(e.to_string())
    }
}

impl From<ConversionError> for Error {
    fn from(e: ConversionError) -> Self {
        Error::Conversion {
            reason: e.to_string(),
        }
    }
}

impl From<EncodeError> for Error {
    fn from(e: EncodeError) -> Self {
        Error::Conversion {
            reason: e.to_string(),
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::Config {
            reason: format!("invalid url: {}", e),
        }
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, Error>;
