//! Document command handlers.

use tenantdb_core::{Document, Etag, Metadata, PutResult};
use tenantdb_wire::json::{
    decode_document, decode_document_list, decode_document_metadata, decode_put_response,
    encode_document,
};
use tenantdb_wire::{Method, Request};

use super::{check_etag_header, conflict, server_error, status, Context};
use crate::{Output, Result};

const METADATA_ONLY: &str = "metadata-only";

fn paging(start: usize, page_size: usize, metadata_only: bool) -> Vec<(&'static str, String)> {
    let mut query = vec![("start", start.to_string()), ("pageSize", page_size.to_string())];
    if metadata_only {
        query.push((METADATA_ONLY, "true".to_string()));
    }
    query
}

/// Handle Get command.
pub fn get(ctx: &Context<'_>, key: String) -> Result<Output> {
    let url = ctx.route.document(&key, &[])?;
    let response = ctx.send(Request::new(Method::Get, url))?;
    match response.status {
        status::NOT_FOUND => Ok(Output::MaybeDocument(None)),
        _ if response.is_success() => {
            let doc = decode_document(&response.body)?;
            check_etag_header(&response, &doc.etag)?;
            Ok(Output::MaybeDocument(Some(doc)))
        }
        _ => Err(server_error(&response)),
    }
}

/// Handle Head command.
pub fn head(ctx: &Context<'_>, key: String) -> Result<Output> {
    let url = ctx
        .route
        .document(&key, &[(METADATA_ONLY, "true".to_string())])?;
    let response = ctx.send(Request::new(Method::Get, url))?;
    match response.status {
        status::NOT_FOUND => Ok(Output::MaybeMetadata(None)),
        _ if response.is_success() => {
            let meta = decode_document_metadata(&response.body)?;
            check_etag_header(&response, &meta.etag)?;
            Ok(Output::MaybeMetadata(Some(meta)))
        }
        _ => Err(server_error(&response)),
    }
}

/// Handle Put command.
///
/// An empty key is sent as a POST to the collection, and the server picks
/// the key.
pub fn put(
    ctx: &Context<'_>,
    key: String,
    etag: Option<Etag>,
    document: Document,
    metadata: Metadata,
) -> Result<Output> {
    let body = encode_document(&document, &metadata)?;
    let request = if key.is_empty() {
        Request::new(Method::Post, ctx.route.documents(&[]))
    } else {
        Request::new(Method::Put, ctx.route.document(&key, &[])?)
    };
    let request = request.with_expected_etag(etag).with_json_body(body);

    let response = ctx.send(request)?;
    match response.status {
        status::CONFLICT => Err(conflict(&key, etag, &response)),
        _ if response.is_success() => {
            let result: PutResult = decode_put_response(&response.body)?.into();
            Ok(Output::Put(result))
        }
        _ => Err(server_error(&response)),
    }
}

/// Handle Delete command.
///
/// A 404 is only a success when the delete was unconditional.
pub fn delete(ctx: &Context<'_>, key: String, etag: Option<Etag>) -> Result<Output> {
    let request =
        Request::new(Method::Delete, ctx.route.document(&key, &[])?).with_expected_etag(etag);
    let response = ctx.send(request)?;
    match response.status {
        status::CONFLICT => Err(conflict(&key, etag, &response)),
        status::NOT_FOUND if etag.is_none() => Ok(Output::Unit),
        status::NOT_FOUND => Err(conflict(&key, etag, &response)),
        _ if response.is_success() => Ok(Output::Unit),
        _ => Err(server_error(&response)),
    }
}

/// Handle StartsWith command.
pub fn starts_with(
    ctx: &Context<'_>,
    prefix: String,
    matches: String,
    start: usize,
    page_size: usize,
    metadata_only: bool,
) -> Result<Output> {
    let mut query = vec![("startsWith", prefix)];
    if !matches.is_empty() {
        query.push(("matches", matches));
    }
    query.extend(paging(start, page_size, metadata_only));
    list(ctx, &query)
}

/// Handle GetDocuments command.
pub fn get_documents(
    ctx: &Context<'_>,
    start: usize,
    page_size: usize,
    metadata_only: bool,
) -> Result<Output> {
    list(ctx, &paging(start, page_size, metadata_only))
}

fn list(ctx: &Context<'_>, query: &[(&str, String)]) -> Result<Output> {
    let response = ctx.send(Request::new(Method::Get, ctx.route.documents(query)))?;
    if !response.is_success() {
        return Err(server_error(&response));
    }
    Ok(Output::Documents(decode_document_list(&response.body)?))
}
