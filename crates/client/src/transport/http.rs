//! Blocking HTTP transport over `ureq`

use std::time::Duration;

use tenantdb_wire::{Method, Request, Response};

use super::Transport;
use crate::error::{TransportError, TransportErrorKind};

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP transport backed by a single pooled `ureq::Agent`.
///
/// Status codes are never turned into errors here: a 404 or a 409 is a
/// completed exchange and the command layer decides what it means.
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    /// Transport with the given global timeout
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        HttpTransport {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        HttpTransport::new(DEFAULT_TIMEOUT)
    }
}

fn apply_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn classify(err: ureq::Error) -> TransportError {
    let kind = match &err {
        ureq::Error::Timeout(_) => TransportErrorKind::Timeout,
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => TransportErrorKind::Connect,
        ureq::Error::Io(io) => match io.kind() {
            std::io::ErrorKind::TimedOut => TransportErrorKind::Timeout,
            std::io::ErrorKind::ConnectionRefused => TransportErrorKind::Connect,
            _ => TransportErrorKind::Io,
        },
        _ => {
            let msg = err.to_string();
            if msg.contains("timed out") || msg.contains("Timeout") {
                TransportErrorKind::Timeout
            } else {
                TransportErrorKind::Protocol
            }
        }
    };
    TransportError::new(kind, err.to_string())
}

impl Transport for HttpTransport {
    fn send(&self, request: Request) -> Result<Response, TransportError> {
        let url = request.url.as_str();
        let body = request.body.unwrap_or_default();

        let result = match request.method {
            Method::Get => apply_headers(self.agent.get(url), &request.headers).call(),
            Method::Delete => apply_headers(self.agent.delete(url), &request.headers).call(),
            Method::Put => apply_headers(self.agent.put(url), &request.headers).send(&body[..]),
            Method::Post => apply_headers(self.agent.post(url), &request.headers).send(&body[..]),
        };
        let mut response = result.map_err(classify)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_vec().map_err(|e| {
            let mut err = classify(e);
            if err.kind != TransportErrorKind::Timeout {
                err.kind = TransportErrorKind::Io;
            }
            err
        })?;

        tracing::trace!(target: "tenantdb::transport", status, bytes = body.len(), "HTTP exchange complete");

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}
