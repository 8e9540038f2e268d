//! Typed value <-> Document conversion
//!
//! [`ToDocument`] is the capability every storable application type has: it
//! turns the value into a generic [`Document`]. The conversion is driven by
//! the type's `serde::Serialize` implementation, which is generated at
//! compile time, so there is no runtime reflection involved:
//!
//! - every serialized field becomes a body entry keyed by its name
//! - nested structs become nested documents
//! - sequences become arrays of converted elements
//! - primitives map onto the matching [`Value`] kind
//!
//! Field order follows the serializer's order (declaration order for derived
//! structs), so converting the same value twice is deterministic.
//!
//! Integers keep their exact value whatever their width, so a `u64` field
//! reads back as the same `u64`.
//!
//! [`FromDocument`] is the best-effort reverse. It matches fields by name
//! and makes no promise beyond that.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::document::Document;
use crate::error::ConversionError;
use crate::value::Value;

/// Convert a typed value into a generic document
pub trait ToDocument {
    /// Produce the document body for this value
    ///
    /// # Errors
    ///
    /// `ConversionError::NotAnObject` if the value is not a field map
    /// (a bare string or number, for instance).
    fn to_document(&self) -> Result<Document, ConversionError>;
}

impl<T: Serialize + ?Sized> ToDocument for T {
    fn to_document(&self) -> Result<Document, ConversionError> {
        let json = serde_json::to_value(self).map_err(|e| ConversionError::Serialize(e.to_string()))?;
        match Value::from(json) {
            Value::Object(doc) => Ok(doc),
            other => Err(ConversionError::NotAnObject {
                found: other.type_name(),
            }),
        }
    }
}

/// Reconstruct a typed value from a document by field-name matching
pub trait FromDocument: Sized {
    /// Build `Self` from `document`
    fn from_document(document: &Document) -> Result<Self, ConversionError>;
}

impl<T: DeserializeOwned> FromDocument for T {
    fn from_document(document: &Document) -> Result<Self, ConversionError> {
        let json = serde_json::Value::try_from(Value::Object(document.clone()))?;
        serde_json::from_value(json).map_err(|e| ConversionError::Deserialize(e.to_string()))
    }
}
