//! Test modules for the client crate.

pub mod routing;

use std::sync::Arc;

use crate::{Document, MemoryServer, ServerClient};

/// Fresh server with tenant `db1`, plus a router on it
pub(crate) fn create_test_client() -> (Arc<MemoryServer>, ServerClient) {
    let server = Arc::new(MemoryServer::new());
    server.create_database("db1").unwrap();
    let client = server.connect().unwrap();
    (server, client)
}

pub(crate) fn person(first: &str, last: &str) -> Document {
    Document::new()
        .with("firstname", first)
        .with("lastname", last)
}
