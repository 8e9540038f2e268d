//! # tenantdb client
//!
//! Client-side command layer for a multi-tenant document database server.
//!
//! - [`ServerClient`] - Connection router; hands out per-database bindings
//! - [`DatabaseCommands`] - Document CRUD, prefix queries and listings
//! - [`Command`]/[`Output`]/[`Executor`] - Low-level command interface
//! - [`Transport`] - The I/O seam, with [`HttpTransport`] and [`MemoryServer`]
//!
//! ## Quick Start
//!
//! ```text
//! use tenantdb_client::{Metadata, ServerClient, ToDocument};
//!
//! let client = ServerClient::new("http://localhost:8080")?;
//! let db1 = client.for_database("db1");
//!
//! let put = db1.put_entity("users/marcin", None, &person, &Metadata::new())?;
//! let doc = db1.get("users/marcin")?;        // Some(JsonDocument)
//! let sys = client.get("users/marcin")?;     // None: different database
//!
//! db1.delete("users/marcin", Some(put.etag))?;
//! ```
//!
//! ## Optimistic concurrency
//!
//! Every stored revision carries an [`Etag`]. Passing `Some(etag)` to `put` or
//! `delete` makes the write conditional on the stored revision still having
//! that Etag; a mismatch fails with [`Error::ConcurrencyConflict`]. Passing
//! `None` writes unconditionally. The client never retries.

#![warn(missing_docs)]

mod command;
mod commands;
pub mod config;
mod error;
mod executor;
mod output;
mod route;
mod router;
pub mod transport;

// Handler modules
mod handlers;

// Test modules
#[cfg(test)]
mod tests;

// =============================================================================
// Public API - Everything users need is re-exported here
// =============================================================================

pub use command::Command;
pub use commands::DatabaseCommands;
pub use config::{ClientConfig, CONFIG_FILE_NAME};
pub use error::{Error, Result, TransportError, TransportErrorKind};
pub use executor::Executor;
pub use output::Output;
pub use router::ServerClient;
pub use transport::{HttpTransport, MemoryServer, Transport};

// Re-export the document model so users don't need tenantdb-core directly
pub use tenantdb_core::{
    DatabaseName, Document, Etag, FromDocument, JsonDocument, JsonDocumentMetadata, Metadata,
    PutResult, ToDocument, Value,
};
