//! Wire format for tenantdb
//!
//! Two halves:
//! - [`http`]: transport-neutral [`Request`]/[`Response`] values and header names
//! - [`json`]: encoding documents, put results, error bodies and listings
//!
//! Both the client and the in-process server speak through this crate, so
//! there is exactly one definition of what goes over the wire.

#![warn(missing_docs)]

pub mod error;
pub mod http;
pub mod json;

pub use error::{DecodeError, EncodeError};
pub use http::{
    format_etag_header, parse_etag_header, Method, Request, Response, HEADER_CONTENT_TYPE,
    HEADER_ETAG, HEADER_IF_NONE_MATCH, HEADER_USER_AGENT, JSON_CONTENT_TYPE,
};
