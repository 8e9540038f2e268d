//! tenantdb - Client for multi-tenant document database servers
//!
//! One server hosts many independent logical databases. A [`ServerClient`]
//! routes document commands to the system database or to any named tenant,
//! and every write can be made conditional on the document's [`Etag`].
//!
//! # Quick Start
//!
//! ```ignore
//! use tenantdb::{Metadata, ServerClient};
//!
//! let client = ServerClient::new("http://localhost:8080")?;
//! let db1 = client.for_database("db1");
//!
//! let put = db1.put_entity("users/marcin", None, &person, &Metadata::new())?;
//! let doc = db1.get("users/marcin")?.expect("just written");
//! assert_eq!(doc.etag, put.etag);
//! ```
//!
//! # Architecture
//!
//! All operations go through the [`Executor`], which turns a [`Command`] into
//! one request on a [`Transport`]. [`DatabaseCommands`] is the typed surface
//! on top. [`MemoryServer`] is an in-process server for tests.

// Re-export the public API from tenantdb-client
pub use tenantdb_client::*;
