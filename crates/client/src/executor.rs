//! The Executor - single entry point to the server.
//!
//! The Executor is a stateless dispatcher: it resolves the command's target
//! database, routes the command to its handler, and returns the handler's
//! output.

use std::sync::Arc;

use url::Url;

use crate::handlers::{self, Context};
use crate::route::Route;
use crate::transport::Transport;
use crate::{Command, Output, Result};

/// The command executor.
///
/// Holds only immutable configuration: the server base address, the
/// transport, and an optional user agent. Cloning is cheap and every clone
/// shares the same transport.
///
/// # Thread Safety
///
/// Executor is `Send + Sync`. No lock is held while a request is in flight.
///
/// # Example
///
/// ```ignore
/// let executor = Executor::new(base, Arc::new(HttpTransport::default()));
///
/// let output = executor.execute(Command::Get {
///     database: Some("db1".into()),
///     key: "users/marcin".into(),
/// })?;
/// ```
#[derive(Clone)]
pub struct Executor {
    base: Url,
    transport: Arc<dyn Transport>,
    user_agent: Option<Arc<str>>,
}

impl Executor {
    /// Create an executor sending through `transport`
    pub fn new(base: Url, transport: Arc<dyn Transport>) -> Self {
        Self {
            base,
            transport,
            user_agent: None,
        }
    }

    /// Send `User-Agent` on every request
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(Arc::from(user_agent.into()));
        self
    }

    /// Server base address
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Execute a single command.
    pub fn execute(&self, cmd: Command) -> Result<Output> {
        let ctx = self.context(cmd.database())?;
        match cmd {
            Command::Get { key, .. } => handlers::documents::get(&ctx, key),
            Command::Head { key, .. } => handlers::documents::head(&ctx, key),
            Command::Put {
                key,
                etag,
                document,
                metadata,
                ..
            } => handlers::documents::put(&ctx, key, etag, document, metadata),
            Command::Delete { key, etag, .. } => handlers::documents::delete(&ctx, key, etag),
            Command::StartsWith {
                prefix,
                matches,
                start,
                page_size,
                metadata_only,
                ..
            } => handlers::documents::starts_with(
                &ctx,
                prefix,
                matches,
                start,
                page_size,
                metadata_only,
            ),
            Command::GetDocuments {
                start,
                page_size,
                metadata_only,
                ..
            } => handlers::documents::get_documents(&ctx, start, page_size, metadata_only),
            Command::GetDatabaseNames {
                page_size, start, ..
            } => handlers::databases::get_database_names(&ctx, page_size, start),
        }
    }

    /// Execute commands in order.
    ///
    /// Each command runs on its own; a failure does not stop the rest.
    pub fn execute_many(&self, cmds: Vec<Command>) -> Vec<Result<Output>> {
        cmds.into_iter().map(|cmd| self.execute(cmd)).collect()
    }

    fn context(&self, database: Option<&str>) -> Result<Context<'_>> {
        let route = Route::resolve(&self.base, database)?;
        Ok(Context::new(
            route,
            self.transport.as_ref(),
            self.user_agent.as_deref(),
        ))
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("base", &self.base.as_str())
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}
