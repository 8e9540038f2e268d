//! Output enum for command execution results.
//!
//! Every command produces exactly one output variant. The mapping is fixed,
//! so typed wrappers can match on it and treat anything else as a bug.

use serde::{Deserialize, Serialize};
use tenantdb_core::{JsonDocument, JsonDocumentMetadata, PutResult};

/// Successful command execution results.
///
/// ```text
/// match executor.execute(Command::Get { database: None, key })? {
///     Output::MaybeDocument(Some(doc)) => println!("etag {}", doc.etag),
///     Output::MaybeDocument(None) => println!("absent"),
///     _ => unreachable!("Get always returns MaybeDocument"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// No return value (delete)
    Unit,

    /// Document snapshot, or `None` when the key is absent
    MaybeDocument(Option<JsonDocument>),

    /// Metadata snapshot, or `None` when the key is absent
    MaybeMetadata(Option<JsonDocumentMetadata>),

    /// Result of a put
    Put(PutResult),

    /// One page of documents
    Documents(Vec<JsonDocument>),

    /// One page of database names
    DatabaseNames(Vec<String>),
}
