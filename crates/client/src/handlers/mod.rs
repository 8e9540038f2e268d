//! Command handlers organized by resource.
//!
//! | Module | Commands | Resource |
//! |--------|----------|----------|
//! | `documents` | 6 | `{db}/docs` |
//! | `databases` | 1 | `{db}/databases` |
//!
//! Handlers build a request, send it through the [`Context`], and map the
//! status code onto an [`Output`](crate::Output) or an [`Error`].

pub mod databases;
pub mod documents;

use tenantdb_core::Etag;
use tenantdb_wire::json::decode_error_response;
use tenantdb_wire::{parse_etag_header, Request, Response, HEADER_ETAG, HEADER_USER_AGENT};

use crate::route::Route;
use crate::transport::Transport;
use crate::{Error, Result};

/// Status codes the handlers interpret
pub(crate) mod status {
    pub const NOT_FOUND: u16 = 404;
    pub const CONFLICT: u16 = 409;
}

/// Everything a handler needs for one command
pub(crate) struct Context<'a> {
    pub route: Route,
    transport: &'a dyn Transport,
    user_agent: Option<&'a str>,
}

impl<'a> Context<'a> {
    pub fn new(route: Route, transport: &'a dyn Transport, user_agent: Option<&'a str>) -> Self {
        Context {
            route,
            transport,
            user_agent,
        }
    }

    /// Send one request. Never retries.
    pub fn send(&self, request: Request) -> Result<Response> {
        let request = match self.user_agent {
            Some(agent) => request.with_header(HEADER_USER_AGENT, agent),
            None => request,
        };
        tracing::debug!(
            target: "tenantdb::client",
            method = %request.method,
            url = %request.url,
            database = self.route.database().unwrap_or("<system>"),
            "Sending request"
        );
        let response = self.transport.send(request)?;
        tracing::debug!(target: "tenantdb::client", status = response.status, "Received response");
        Ok(response)
    }
}

/// Map a non-success response onto `ServerError`
pub(crate) fn server_error(response: &Response) -> Error {
    let message = match decode_error_response(&response.body) {
        Some(body) => body.error,
        None if response.body.is_empty() => format!("HTTP {}", response.status),
        None => response.body_text(),
    };
    Error::ServerError {
        status: response.status,
        message,
    }
}

/// Check a single-document response's `ETag` header against its `@etag`
///
/// A missing header is fine. A header that disagrees with the body means
/// the response cannot be trusted.
pub(crate) fn check_etag_header(response: &Response, etag: &Etag) -> Result<()> {
    let Some(header) = response.header(HEADER_ETAG) else {
        return Ok(());
    };
    let sent = parse_etag_header(header)?;
    if sent != *etag {
        return Err(Error::protocol(format!(
            "ETag header {} disagrees with document etag {}",
            sent, etag
        )));
    }
    Ok(())
}

/// Map a 409 onto `ConcurrencyConflict`
///
/// Falls back to the Etag the client sent when the body does not echo it.
pub(crate) fn conflict(key: &str, expected: Option<Etag>, response: &Response) -> Error {
    let body = decode_error_response(&response.body);
    let (expected, actual) = match body {
        Some(body) => (body.expected_etag.or(expected), body.actual_etag),
        None => (expected, None),
    };
    tracing::warn!(
        target: "tenantdb::client",
        key,
        expected = ?expected,
        actual = ?actual,
        "Write rejected by concurrency check"
    );
    Error::ConcurrencyConflict {
        key: key.to_string(),
        expected,
        actual,
    }
}
