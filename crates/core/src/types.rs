//! Result types returned by document operations
//!
//! - [`PutResult`]: what a successful put produced
//! - [`JsonDocument`]: a document snapshot read at one point in time
//! - [`JsonDocumentMetadata`]: the same snapshot without the body

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::convert::FromDocument;
use crate::document::{Document, Metadata};
use crate::error::ConversionError;
use crate::etag::Etag;

/// Outcome of a successful put
///
/// `key` is the server-assigned key when the put was issued with an empty key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PutResult {
    /// Key the document is stored under
    pub key: String,
    /// Etag of the revision just written
    pub etag: Etag,
}

/// Snapshot of a stored document
///
/// Stale as soon as the server-side document changes again; hold on to
/// `etag` to make the next write conditional on this snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonDocument {
    /// Document key
    pub key: String,
    /// Document body. Empty when the read asked for metadata only.
    pub data: Document,
    /// User metadata, without server bookkeeping fields
    pub metadata: Metadata,
    /// Revision of this snapshot
    pub etag: Etag,
    /// When the revision was written
    pub last_modified: DateTime<Utc>,
}

impl JsonDocument {
    /// Reconstruct a typed value from the body
    pub fn to_entity<T: DeserializeOwned>(&self) -> Result<T, ConversionError> {
        T::from_document(&self.data)
    }

    /// Drop the body, keeping only the metadata view
    pub fn into_metadata(self) -> JsonDocumentMetadata {
        JsonDocumentMetadata {
            key: self.key,
            metadata: self.metadata,
            etag: self.etag,
            last_modified: self.last_modified,
        }
    }
}

/// Metadata-only snapshot of a stored document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonDocumentMetadata {
    /// Document key
    pub key: String,
    /// User metadata
    pub metadata: Metadata,
    /// Revision of this snapshot
    pub etag: Etag,
    /// When the revision was written
    pub last_modified: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Person {
        firstname: String,
    }

    fn snapshot() -> JsonDocument {
        JsonDocument {
            key: "users/marcin".into(),
            data: Document::new().with("firstname", "John"),
            metadata: Document::new().with("Raven-Entity-Name", "Users"),
            etag: Etag::new(1, 3),
            last_modified: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn test_to_entity() {
        let person: Person = snapshot().to_entity().unwrap();
        assert_eq!(person.firstname, "John");
    }

    #[test]
    fn test_into_metadata_keeps_version_fields() {
        let doc = snapshot();
        let meta = doc.clone().into_metadata();
        assert_eq!(meta.key, doc.key);
        assert_eq!(meta.etag, doc.etag);
        assert_eq!(meta.metadata, doc.metadata);
        assert_eq!(meta.last_modified, doc.last_modified);
    }

    #[test]
    fn test_put_result_serializes_etag_as_text() {
        let result = PutResult {
            key: "users/1".into(),
            etag: Etag::new(0, 1),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["etag"], "00000000-0000-0000-0000-000000000001");
    }
}
