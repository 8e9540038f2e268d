//! Transport-neutral HTTP request/response values
//!
//! The client builds a [`Request`], hands it to whatever transport it was
//! configured with, and interprets the [`Response`]. Nothing here performs
//! I/O.

use std::fmt;
use tenantdb_core::Etag;
use url::Url;

use crate::error::DecodeError;

/// Header carrying the Etag of the returned revision
pub const HEADER_ETAG: &str = "ETag";
/// Header carrying the expected Etag of a conditional write
pub const HEADER_IF_NONE_MATCH: &str = "If-None-Match";
/// Body media type header
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
/// Client identification header
pub const HEADER_USER_AGENT: &str = "User-Agent";

/// Media type of every body the client sends
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// PUT
    Put,
    /// POST
    Post,
    /// DELETE
    Delete,
}

impl Method {
    /// Method token as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Outgoing request
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Method
    pub method: Method,
    /// Absolute target URL, query included
    pub url: Url,
    /// Header pairs, in insertion order
    pub headers: Vec<(String, String)>,
    /// Body bytes, for PUT and POST
    pub body: Option<Vec<u8>>,
}

impl Request {
    /// Create a request with no headers and no body
    pub fn new(method: Method, url: Url) -> Self {
        Request {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Add a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a JSON body
    pub fn with_json_body(mut self, body: Vec<u8>) -> Self {
        self.headers
            .push((HEADER_CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string()));
        self.body = Some(body);
        self
    }

    /// Make the request conditional on `etag` when one is given
    pub fn with_expected_etag(self, etag: Option<Etag>) -> Self {
        match etag {
            Some(etag) => self.with_header(HEADER_IF_NONE_MATCH, format_etag_header(&etag)),
            None => self,
        }
    }

    /// Look up a header, case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Expected Etag carried by `If-None-Match`, if any
    pub fn expected_etag(&self) -> Result<Option<Etag>, DecodeError> {
        self.header(HEADER_IF_NONE_MATCH)
            .map(parse_etag_header)
            .transpose()
    }
}

/// Incoming response
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Status code
    pub status: u16,
    /// Header pairs
    pub headers: Vec<(String, String)>,
    /// Raw body
    pub body: Vec<u8>,
}

impl Response {
    /// Response with a status and nothing else
    pub fn new(status: u16) -> Self {
        Response {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Add a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a JSON body
    pub fn with_json(mut self, body: &serde_json::Value) -> Self {
        self.headers
            .push((HEADER_CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string()));
        // Serializing a serde_json::Value cannot fail.
        self.body = serde_json::to_vec(body).unwrap_or_default();
        self
    }

    /// Look up a header, case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as lossy UTF-8, for diagnostics
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Quote an Etag for use in `ETag` / `If-None-Match`
pub fn format_etag_header(etag: &Etag) -> String {
    format!("\"{}\"", etag)
}

/// Parse an `ETag` / `If-None-Match` value, quoted or bare
pub fn parse_etag_header(value: &str) -> Result<Etag, DecodeError> {
    let trimmed = value.trim();
    let trimmed = trimmed.strip_prefix("W/").unwrap_or(trimmed);
    let unquoted = trimmed.trim_matches('"');
    unquoted
        .parse()
        .map_err(|e: tenantdb_core::EtagParseError| DecodeError::InvalidEtag(e.to_string()))
}
