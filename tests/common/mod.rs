//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tenantdb::{MemoryServer, ServerClient};

/// Route test logs through the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// In-process server plus a router connected to it
pub struct TestServer {
    pub server: Arc<MemoryServer>,
    pub client: ServerClient,
}

impl TestServer {
    /// Server with only the system database
    pub fn new() -> Self {
        init_tracing();
        let server = Arc::new(MemoryServer::new());
        let client = server.connect().expect("memory server base url is valid");
        TestServer { server, client }
    }

    /// Server with the given tenants already created
    pub fn with_databases(names: &[&str]) -> Self {
        let test = Self::new();
        for name in names {
            test.create_db(name);
        }
        test
    }

    pub fn create_db(&self, name: &str) {
        assert!(
            self.server.create_database(name).expect("valid database name"),
            "database {} already existed",
            name
        );
    }

    pub fn delete_db(&self, name: &str) {
        assert!(self.server.delete_database(name), "database {} did not exist", name);
    }
}

/// The entity used throughout the integration tests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub firstname: String,
    pub lastname: String,
}

impl Person {
    pub fn new(firstname: &str, lastname: &str) -> Self {
        Person {
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
        }
    }
}
