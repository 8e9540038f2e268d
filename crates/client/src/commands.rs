//! Typed document commands bound to one logical database.
//!
//! [`DatabaseCommands`] wraps the [`Executor`] and the [`Command`]/[`Output`]
//! enums with typed method calls. Each method:
//!
//! 1. Creates the matching [`Command`] with this binding's database
//! 2. Executes it via the [`Executor`]
//! 3. Extracts and returns the typed result
//!
//! # Example
//!
//! ```ignore
//! let db1 = client.for_database("db1");
//!
//! let put = db1.put("users/marcin", None, &person.to_document()?, &Metadata::new())?;
//! let doc = db1.get("users/marcin")?.expect("just written");
//! assert_eq!(doc.etag, put.etag);
//!
//! db1.delete("users/marcin", Some(doc.etag))?;
//! ```

use std::sync::Arc;

use serde::Serialize;
use tenantdb_core::{
    Document, Etag, JsonDocument, JsonDocumentMetadata, Metadata, PutResult, ToDocument,
};

use crate::{Command, Error, Executor, Output, Result};

fn unexpected(op: &str) -> Error {
    Error::protocol(format!("Unexpected output for {}", op))
}

/// Document operations against one logical database.
///
/// Holds nothing but the database name and a shared executor, so it is cheap
/// to clone, safe to share across threads, and needs no explicit close.
#[derive(Debug, Clone)]
pub struct DatabaseCommands {
    executor: Arc<Executor>,
    database: Option<String>,
}

impl DatabaseCommands {
    pub(crate) fn new(executor: Arc<Executor>, database: Option<String>) -> Self {
        Self { executor, database }
    }

    /// Bound database name, `None` for the system database
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// Get the underlying executor.
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    fn db(&self) -> Option<String> {
        self.database.clone()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current snapshot of `key`, or `None` when it does not exist.
    pub fn get(&self, key: &str) -> Result<Option<JsonDocument>> {
        match self.executor.execute(Command::Get {
            database: self.db(),
            key: key.to_string(),
        })? {
            Output::MaybeDocument(doc) => Ok(doc),
            _ => Err(unexpected("Get")),
        }
    }

    /// Metadata of `key` without its body, or `None` when it does not exist.
    pub fn head(&self, key: &str) -> Result<Option<JsonDocumentMetadata>> {
        match self.executor.execute(Command::Head {
            database: self.db(),
            key: key.to_string(),
        })? {
            Output::MaybeMetadata(meta) => Ok(meta),
            _ => Err(unexpected("Head")),
        }
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Create or replace `key`.
    ///
    /// With `etag` set, the write only succeeds while the stored revision
    /// still has that Etag; otherwise it fails with
    /// [`Error::ConcurrencyConflict`]. Without it the write is unconditional.
    /// An empty `key` lets the server assign one, returned in the result.
    pub fn put(
        &self,
        key: &str,
        etag: Option<Etag>,
        document: &Document,
        metadata: &Metadata,
    ) -> Result<PutResult> {
        match self.executor.execute(Command::Put {
            database: self.db(),
            key: key.to_string(),
            etag,
            document: document.clone(),
            metadata: metadata.clone(),
        })? {
            Output::Put(result) => Ok(result),
            _ => Err(unexpected("Put")),
        }
    }

    /// Convert `entity` to a document and put it.
    pub fn put_entity<T: Serialize + ?Sized>(
        &self,
        key: &str,
        etag: Option<Etag>,
        entity: &T,
        metadata: &Metadata,
    ) -> Result<PutResult> {
        let document = entity.to_document()?;
        self.put(key, etag, &document, metadata)
    }

    /// Delete `key`.
    ///
    /// Same Etag rules as [`put`](Self::put). Deleting a missing key without
    /// an Etag succeeds and does nothing.
    pub fn delete(&self, key: &str, etag: Option<Etag>) -> Result<()> {
        match self.executor.execute(Command::Delete {
            database: self.db(),
            key: key.to_string(),
            etag,
        })? {
            Output::Unit => Ok(()),
            _ => Err(unexpected("Delete")),
        }
    }

    // =========================================================================
    // Listing
    // =========================================================================

    /// One page of documents whose key starts with `prefix`, in key order.
    ///
    /// `matches` optionally filters the part of the key after the prefix with
    /// `|`-separated wildcard patterns (`*`, `?`). Pass `""` for no filter.
    pub fn starts_with(
        &self,
        prefix: &str,
        matches: &str,
        start: usize,
        page_size: usize,
        metadata_only: bool,
    ) -> Result<Vec<JsonDocument>> {
        match self.executor.execute(Command::StartsWith {
            database: self.db(),
            prefix: prefix.to_string(),
            matches: matches.to_string(),
            start,
            page_size,
            metadata_only,
        })? {
            Output::Documents(docs) => Ok(docs),
            _ => Err(unexpected("StartsWith")),
        }
    }

    /// One page of every document in the database, most recent first.
    pub fn get_documents(
        &self,
        start: usize,
        page_size: usize,
        metadata_only: bool,
    ) -> Result<Vec<JsonDocument>> {
        match self.executor.execute(Command::GetDocuments {
            database: self.db(),
            start,
            page_size,
            metadata_only,
        })? {
            Output::Documents(docs) => Ok(docs),
            _ => Err(unexpected("GetDocuments")),
        }
    }

    /// One page of logical database names.
    ///
    /// Meant for the system binding. On a tenant binding the request is sent
    /// anyway and whatever the server answers is returned.
    pub fn get_database_names(&self, page_size: usize, start: usize) -> Result<Vec<String>> {
        match self.executor.execute(Command::GetDatabaseNames {
            database: self.db(),
            page_size,
            start,
        })? {
            Output::DatabaseNames(names) => Ok(names),
            _ => Err(unexpected("GetDatabaseNames")),
        }
    }
}
