//! Core types for tenantdb
//!
//! This crate defines the document model shared by every layer:
//! - Value: Unified value enum for all field data
//! - Document / Metadata: Ordered field maps for bodies and metadata
//! - Etag: Opaque 16-byte version token used for optimistic concurrency
//! - DatabaseName: Validated logical database identifier
//! - PutResult, JsonDocument, JsonDocumentMetadata: Operation results
//! - ToDocument / FromDocument: Typed value conversion
//! - Error types for validation and conversion

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod convert;
pub mod database_name;
pub mod document;
pub mod error;
pub mod etag;
pub mod types;
pub mod value;

pub use convert::{FromDocument, ToDocument};
pub use database_name::{DatabaseName, MAX_DATABASE_NAME_LENGTH, RESERVED_SYSTEM_NAME};
pub use document::{Document, Metadata};
pub use error::{ConversionError, DatabaseNameError, EtagParseError};
pub use etag::Etag;
pub use types::{JsonDocument, JsonDocumentMetadata, PutResult};
pub use value::Value;
