//! Command enum defining every document operation.
//!
//! Commands are the instruction set of the client. Each variant is
//! self-contained: it names the database it targets, carries every
//! parameter, and is plain serializable data.
//!
//! # Database field
//!
//! Every command has an optional `database` field. `None` targets the system
//! database. A name is validated when the command is executed, not when it is
//! built.

use serde::{Deserialize, Serialize};
use tenantdb_core::{Document, Etag, Metadata};

/// A self-contained, serializable document operation.
///
/// | Command | Returns |
/// |---------|---------|
/// | `Get` | `Output::MaybeDocument` |
/// | `Head` | `Output::MaybeMetadata` |
/// | `Put` | `Output::Put` |
/// | `Delete` | `Output::Unit` |
/// | `StartsWith` | `Output::Documents` |
/// | `GetDocuments` | `Output::Documents` |
/// | `GetDatabaseNames` | `Output::DatabaseNames` |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Command {
    /// Read a document.
    /// Returns: `Output::MaybeDocument`
    Get {
        /// Target database, `None` for the system database
        #[serde(default, skip_serializing_if = "Option::is_none")]
        database: Option<String>,
        /// Document key
        key: String,
    },

    /// Read a document's metadata without its body.
    /// Returns: `Output::MaybeMetadata`
    Head {
        /// Target database, `None` for the system database
        #[serde(default, skip_serializing_if = "Option::is_none")]
        database: Option<String>,
        /// Document key
        key: String,
    },

    /// Create or replace a document. An empty key asks the server to assign one.
    /// Returns: `Output::Put`
    Put {
        /// Target database, `None` for the system database
        #[serde(default, skip_serializing_if = "Option::is_none")]
        database: Option<String>,
        /// Document key
        key: String,
        /// Expected Etag; `None` makes the operation unconditional
        #[serde(default, skip_serializing_if = "Option::is_none")]
        etag: Option<Etag>,
        /// Document body
        document: Document,
        /// User metadata
        #[serde(default)]
        metadata: Metadata,
    },

    /// Delete a document.
    /// Returns: `Output::Unit`
    Delete {
        /// Target database, `None` for the system database
        #[serde(default, skip_serializing_if = "Option::is_none")]
        database: Option<String>,
        /// Document key
        key: String,
        /// Expected Etag; `None` makes the operation unconditional
        #[serde(default, skip_serializing_if = "Option::is_none")]
        etag: Option<Etag>,
    },

    /// Page through documents whose key starts with `prefix`.
    /// Returns: `Output::Documents`
    StartsWith {
        /// Target database, `None` for the system database
        #[serde(default, skip_serializing_if = "Option::is_none")]
        database: Option<String>,
        /// Key prefix
        prefix: String,
        /// `|`-separated wildcard patterns for the key suffix, empty for none
        #[serde(default)]
        matches: String,
        /// Entries to skip
        start: usize,
        /// Largest number of entries to return
        page_size: usize,
        /// Leave document bodies out
        #[serde(default)]
        metadata_only: bool,
    },

    /// Page through every document in the database.
    /// Returns: `Output::Documents`
    GetDocuments {
        /// Target database, `None` for the system database
        #[serde(default, skip_serializing_if = "Option::is_none")]
        database: Option<String>,
        /// Entries to skip
        start: usize,
        /// Largest number of entries to return
        page_size: usize,
        /// Leave document bodies out
        #[serde(default)]
        metadata_only: bool,
    },

    /// List logical database names. Only meaningful on the system database.
    /// Returns: `Output::DatabaseNames`
    GetDatabaseNames {
        /// Target database, `None` for the system database
        #[serde(default, skip_serializing_if = "Option::is_none")]
        database: Option<String>,
        /// Largest number of entries to return
        page_size: usize,
        /// Entries to skip
        start: usize,
    },
}

impl Command {
    /// Database the command targets, `None` for the system database
    pub fn database(&self) -> Option<&str> {
        match self {
            Command::Get { database, .. }
            | Command::Head { database, .. }
            | Command::Put { database, .. }
            | Command::Delete { database, .. }
            | Command::StartsWith { database, .. }
            | Command::GetDocuments { database, .. }
            | Command::GetDatabaseNames { database, .. } => database.as_deref(),
        }
    }

    /// Short operation name, for logging
    pub fn name(&self) -> &'static str {
        match self {
            Command::Get { .. } => "Get",
            Command::Head { .. } => "Head",
            Command::Put { .. } => "Put",
            Command::Delete { .. } => "Delete",
            Command::StartsWith { .. } => "StartsWith",
            Command::GetDocuments { .. } => "GetDocuments",
            Command::GetDatabaseNames { .. } => "GetDatabaseNames",
        }
    }
}
