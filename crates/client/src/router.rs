//! Connection router.
//!
//! A [`ServerClient`] owns the server base address and the shared transport.
//! It hands out [`DatabaseCommands`] bound to the system database or to a
//! named tenant. Creating a binding does no I/O; nothing goes over the wire
//! until a command runs.

use std::ops::Deref;
use std::sync::Arc;

use url::Url;

use crate::config::{parse_base_url, ClientConfig};
use crate::transport::{HttpTransport, Transport};
use crate::{DatabaseCommands, Executor, Result};

/// Entry point for talking to one server.
///
/// Cheap to clone; clones share the transport. Dereferences to the system
/// database binding, so `client.get(key)` reads from the system database.
///
/// ```ignore
/// let client = ServerClient::new("http://localhost:8080")?;
///
/// let names = client.get_database_names(20, 0)?;
/// let db1 = client.for_database("db1");
/// db1.put("users/marcin", None, &doc, &Metadata::new())?;
/// ```
#[derive(Debug, Clone)]
pub struct ServerClient {
    executor: Arc<Executor>,
    system: DatabaseCommands,
}

impl ServerClient {
    /// Router over HTTP with default settings
    pub fn new(url: &str) -> Result<Self> {
        Self::from_config(&ClientConfig::new(url))
    }

    /// Router over HTTP configured from `config`
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let base = config.validate()?;
        let transport = Arc::new(HttpTransport::new(config.timeout()));
        let mut executor = Executor::new(base, transport);
        if let Some(agent) = &config.user_agent {
            executor = executor.with_user_agent(agent.clone());
        }
        tracing::debug!(target: "tenantdb::client", url = %config.url, timeout_ms = config.timeout_ms, "Client configured");
        Ok(Self::with_executor(executor))
    }

    /// Router over an arbitrary transport
    pub fn with_transport(base: Url, transport: Arc<dyn Transport>) -> Self {
        Self::with_executor(Executor::new(base, transport))
    }

    /// Router over a transport, parsing and checking `url` first
    pub fn connect(url: &str, transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self::with_transport(parse_base_url(url)?, transport))
    }

    /// Router over a prepared executor
    pub fn with_executor(executor: Executor) -> Self {
        let executor = Arc::new(executor);
        let system = DatabaseCommands::new(executor.clone(), None);
        Self { executor, system }
    }

    /// Server base address
    pub fn url(&self) -> &Url {
        self.executor.base_url()
    }

    /// Binding to the system database.
    ///
    /// Always the same instance for a given router.
    pub fn for_system_database(&self) -> &DatabaseCommands {
        &self.system
    }

    /// Binding to the logical database `name`.
    ///
    /// The name is checked when the binding is first used: every command on
    /// a binding with an invalid name fails with
    /// [`Error::InvalidDatabaseName`](crate::Error::InvalidDatabaseName).
    pub fn for_database(&self, name: &str) -> DatabaseCommands {
        DatabaseCommands::new(self.executor.clone(), Some(name.to_string()))
    }
}

impl Deref for ServerClient {
    type Target = DatabaseCommands;

    fn deref(&self) -> &DatabaseCommands {
        &self.system
    }
}
