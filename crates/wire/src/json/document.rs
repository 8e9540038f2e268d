//! Document JSON encoding
//!
//! A document travels as its body object plus one extra member:
//!
//! ```text
//! {
//!   "firstname": "John",
//!   "lastname": "Smith",
//!   "@metadata": {
//!     "Raven-Entity-Name": "Users",          <- user metadata
//!     "@id": "users/marcin",                 <- added by the server
//!     "@etag": "01000000-0000-0001-0000-000000000001",
//!     "Last-Modified": "2024-01-01T00:00:00.000000Z"
//!   }
//! }
//! ```
//!
//! The three server fields are stripped again on decode, so the metadata a
//! reader sees is exactly what the writer sent. Since they would not survive
//! the trip, a body field named `@metadata` and user metadata named after a
//! server field are rejected by the encoder.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Map;
use tenantdb_core::{
    ConversionError, Document, Etag, JsonDocument, JsonDocumentMetadata, Metadata, Value,
};

use crate::error::{DecodeError, EncodeError};

/// Member holding the metadata inside a document object
pub const METADATA_FIELD: &str = "@metadata";
/// Metadata member holding the document key
pub const META_ID: &str = "@id";
/// Metadata member holding the Etag
pub const META_ETAG: &str = "@etag";
/// Metadata member holding the revision timestamp
pub const META_LAST_MODIFIED: &str = "Last-Modified";

/// Metadata members owned by the server
pub const SERVER_METADATA: [&str; 3] = [META_ID, META_ETAG, META_LAST_MODIFIED];

/// Render a timestamp the way the wire format expects
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a wire timestamp
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DecodeError> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| DecodeError::InvalidTimestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

fn expect_object(
    value: serde_json::Value,
) -> Result<Map<String, serde_json::Value>, DecodeError> {
    match value {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(DecodeError::UnexpectedShape {
            expected: "object",
            actual: json_type(&other).to_string(),
        }),
    }
}

fn to_document(map: Map<String, serde_json::Value>) -> Document {
    map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
}

fn to_json_map(document: &Document) -> Result<Map<String, serde_json::Value>, ConversionError> {
    document
        .iter()
        .map(|(k, v)| serde_json::Value::try_from(v.clone()).map(|v| (k.clone(), v)))
        .collect()
}

fn reserved_metadata(metadata: &Metadata) -> Option<&str> {
    metadata
        .keys()
        .map(String::as_str)
        .find(|k| SERVER_METADATA.contains(k))
}

fn take_string(
    map: &mut Map<String, serde_json::Value>,
    field: &'static str,
) -> Result<String, DecodeError> {
    match map.shift_remove(field) {
        Some(serde_json::Value::String(s)) => Ok(s),
        Some(other) => Err(DecodeError::UnexpectedShape {
            expected: "string",
            actual: json_type(&other).to_string(),
        }),
        None => Err(DecodeError::MissingField(field)),
    }
}

// =============================================================================
// Client side
// =============================================================================

/// Encode a body and its metadata for a put
///
/// # Errors
///
/// - `EncodeError::ReservedField` for a body field named `@metadata` or a
///   metadata entry named `@id`, `@etag` or `Last-Modified`
/// - `EncodeError::Value` for a NaN or infinite float anywhere in either
pub fn encode_document(body: &Document, metadata: &Metadata) -> Result<Vec<u8>, EncodeError> {
    if body.contains_key(METADATA_FIELD) {
        return Err(EncodeError::ReservedField {
            field: METADATA_FIELD.to_string(),
            location: "body",
        });
    }
    if let Some(field) = reserved_metadata(metadata) {
        return Err(EncodeError::ReservedField {
            field: field.to_string(),
            location: "metadata",
        });
    }

    let mut map = to_json_map(body)?;
    map.insert(
        METADATA_FIELD.to_string(),
        serde_json::Value::Object(to_json_map(metadata)?),
    );
    // Serializing a serde_json::Value cannot fail.
    Ok(serde_json::to_vec(&serde_json::Value::Object(map)).unwrap_or_default())
}

/// Decode one document object, as produced by [`render_document`]
pub fn document_from_json(value: serde_json::Value) -> Result<JsonDocument, DecodeError> {
    let mut body = expect_object(value)?;
    let mut metadata = match body.shift_remove(METADATA_FIELD) {
        Some(meta) => expect_object(meta)?,
        None => return Err(DecodeError::MissingField(METADATA_FIELD)),
    };

    let key = take_string(&mut metadata, META_ID)?;
    let etag_text = take_string(&mut metadata, META_ETAG)?;
    let etag: Etag = etag_text
        .parse()
        .map_err(|e: tenantdb_core::EtagParseError| DecodeError::InvalidEtag(e.to_string()))?;
    let last_modified = parse_timestamp(&take_string(&mut metadata, META_LAST_MODIFIED)?)?;

    Ok(JsonDocument {
        key,
        data: to_document(body),
        metadata: to_document(metadata),
        etag,
        last_modified,
    })
}

/// Decode a single-document response body
pub fn decode_document(bytes: &[u8]) -> Result<JsonDocument, DecodeError> {
    document_from_json(serde_json::from_slice(bytes)?)
}

/// Decode a metadata-only single-document response body
pub fn decode_document_metadata(bytes: &[u8]) -> Result<JsonDocumentMetadata, DecodeError> {
    decode_document(bytes).map(JsonDocument::into_metadata)
}

/// Decode a listing response body (JSON array of documents)
pub fn decode_document_list(bytes: &[u8]) -> Result<Vec<JsonDocument>, DecodeError> {
    match serde_json::from_slice(bytes)? {
        serde_json::Value::Array(items) => items.into_iter().map(document_from_json).collect(),
        other => Err(DecodeError::UnexpectedShape {
            expected: "array",
            actual: json_type(&other).to_string(),
        }),
    }
}

// =============================================================================
// Server side
// =============================================================================

/// Split a put body into document body and user metadata
///
/// Metadata naming a server field is refused rather than overwritten.
pub fn split_document(bytes: &[u8]) -> Result<(Document, Metadata), DecodeError> {
    let mut body = expect_object(serde_json::from_slice(bytes)?)?;
    let metadata = match body.shift_remove(METADATA_FIELD) {
        Some(meta) => to_document(expect_object(meta)?),
        None => Document::new(),
    };
    if let Some(field) = reserved_metadata(&metadata) {
        return Err(DecodeError::ReservedField(field.to_string()));
    }
    Ok((to_document(body), metadata))
}

/// Render a stored document for a read response
///
/// `body` is `None` for metadata-only reads.
pub fn render_document(
    key: &str,
    body: Option<&Document>,
    metadata: &Metadata,
    etag: &Etag,
    last_modified: &DateTime<Utc>,
) -> Result<serde_json::Value, ConversionError> {
    let mut map = match body {
        Some(body) => to_json_map(body)?,
        None => Map::new(),
    };

    let mut meta = to_json_map(metadata)?;
    meta.insert(META_ID.to_string(), serde_json::Value::from(key));
    meta.insert(META_ETAG.to_string(), serde_json::Value::from(etag.to_string()));
    meta.insert(
        META_LAST_MODIFIED.to_string(),
        serde_json::Value::from(format_timestamp(last_modified)),
    );
    map.insert(METADATA_FIELD.to_string(), serde_json::Value::Object(meta));

    Ok(serde_json::Value::Object(map))
}
