//! Small response envelopes
//!
//! - Put result: `{"Key": "...", "ETag": "..."}`
//! - Error body: `{"Error": "...", "ExpectedETag": "...", "ActualETag": "..."}`
//! - Database names: `["db1", "db2"]`

use serde::{Deserialize, Serialize};
use tenantdb_core::{Etag, PutResult};

use crate::error::DecodeError;

/// Body of a successful put
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutResponse {
    /// Stored key
    #[serde(rename = "Key")]
    pub key: String,
    /// New revision
    #[serde(rename = "ETag")]
    pub etag: Etag,
}

impl From<PutResponse> for PutResult {
    fn from(r: PutResponse) -> Self {
        PutResult {
            key: r.key,
            etag: r.etag,
        }
    }
}

/// Body of an error response
///
/// Only `Error` is always present. Concurrency conflicts also carry the
/// Etag the client expected and the one the server actually holds (absent
/// when the document does not exist).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message
    #[serde(rename = "Error")]
    pub error: String,
    /// Expected Etag sent by the client
    #[serde(rename = "ExpectedETag", default, skip_serializing_if = "Option::is_none")]
    pub expected_etag: Option<Etag>,
    /// Etag currently stored
    #[serde(rename = "ActualETag", default, skip_serializing_if = "Option::is_none")]
    pub actual_etag: Option<Etag>,
}

impl ErrorResponse {
    /// Plain error message
    pub fn message(error: impl Into<String>) -> Self {
        ErrorResponse {
            error: error.into(),
            expected_etag: None,
            actual_etag: None,
        }
    }

    /// Concurrency conflict description
    pub fn conflict(error: impl Into<String>, expected: Option<Etag>, actual: Option<Etag>) -> Self {
        ErrorResponse {
            error: error.into(),
            expected_etag: expected,
            actual_etag: actual,
        }
    }

    /// As a JSON value, for building responses
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Decode a put response body
pub fn decode_put_response(bytes: &[u8]) -> Result<PutResponse, DecodeError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Decode an error body.
///
/// Returns `None` when the body is not a recognizable error object; callers
/// fall back to the raw text.
pub fn decode_error_response(bytes: &[u8]) -> Option<ErrorResponse> {
    serde_json::from_slice(bytes).ok()
}

/// Decode a database-name listing
pub fn decode_database_names(bytes: &[u8]) -> Result<Vec<String>, DecodeError> {
    Ok(serde_json::from_slice(bytes)?)
}
