//! JSON codec between the document model and the wire format

pub mod document;
pub mod envelope;

pub use document::{
    decode_document, decode_document_list, decode_document_metadata, document_from_json,
    encode_document, format_timestamp, parse_timestamp, render_document, split_document,
    METADATA_FIELD, META_ETAG, META_ID, META_LAST_MODIFIED, SERVER_METADATA,
};
pub use envelope::{
    decode_database_names, decode_error_response, decode_put_response, ErrorResponse, PutResponse,
};
