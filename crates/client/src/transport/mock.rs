//! Scripted transports for failure-path tests

use parking_lot::Mutex;
use tenantdb_wire::{Request, Response};

use super::Transport;
use crate::error::{TransportError, TransportErrorKind};

/// Transport that always fails with the same kind
pub struct FailingTransport {
    pub kind: TransportErrorKind,
}

impl Transport for FailingTransport {
    fn send(&self, _request: Request) -> Result<Response, TransportError> {
        Err(TransportError::new(self.kind, "scripted failure"))
    }
}

/// Transport that answers every request with a canned response and records
/// what it was sent
pub struct CannedTransport {
    response: Response,
    pub requests: Mutex<Vec<Request>>,
}

impl CannedTransport {
    pub fn new(response: Response) -> Self {
        CannedTransport {
            response,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn last_request(&self) -> Option<Request> {
        self.requests.lock().last().cloned()
    }
}

impl Transport for CannedTransport {
    fn send(&self, request: Request) -> Result<Response, TransportError> {
        self.requests.lock().push(request);
        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenantdb_wire::Method;
    use url::Url;

    #[test]
    fn test_canned_transport_records_requests() {
        let transport = CannedTransport::new(Response::new(204));
        let url = Url::parse("http://localhost/docs/a").unwrap();
        let response = transport.send(Request::new(Method::Delete, url)).unwrap();
        assert_eq!(response.status, 204);
        assert_eq!(transport.last_request().unwrap().method, Method::Delete);
    }

    #[test]
    fn test_failing_transport() {
        let transport = FailingTransport {
            kind: TransportErrorKind::Connect,
        };
        let url = Url::parse("http://localhost/docs/a").unwrap();
        let err = transport.send(Request::new(Method::Get, url)).unwrap_err();
        assert_eq!(err.kind, TransportErrorKind::Connect);
    }
}
