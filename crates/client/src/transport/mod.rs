//! Transport seam
//!
//! A [`Transport`] performs one blocking request/response exchange. The
//! command layer builds the request, so implementations only move bytes:
//!
//! - [`HttpTransport`]: talks to a real server over HTTP
//! - [`MemoryServer`]: an in-process server, for tests and embedding
//!
//! Implementations must not retry. Timeouts belong to the transport and are
//! reported as [`TransportErrorKind::Timeout`](crate::TransportErrorKind).

pub mod http;
pub mod memory;

#[cfg(test)]
pub(crate) mod mock;

use tenantdb_wire::{Request, Response};

use crate::error::TransportError;

pub use http::HttpTransport;
pub use memory::MemoryServer;

/// One blocking request/response exchange
pub trait Transport: Send + Sync {
    /// Send `request` and wait for the answer.
    ///
    /// Any status code is a successful exchange. Only failures to complete
    /// the exchange are errors.
    fn send(&self, request: Request) -> Result<Response, TransportError>;
}
