//! Database listing handler.

use tenantdb_wire::json::decode_database_names;
use tenantdb_wire::{Method, Request};

use super::{server_error, Context};
use crate::{Output, Result};

/// Handle GetDatabaseNames command.
///
/// Forwarded as-is even on a tenant binding; the server decides what that
/// means.
pub fn get_database_names(ctx: &Context<'_>, page_size: usize, start: usize) -> Result<Output> {
    let url = ctx.route.databases(&[
        ("pageSize", page_size.to_string()),
        ("start", start.to_string()),
    ]);
    let response = ctx.send(Request::new(Method::Get, url))?;
    if !response.is_success() {
        return Err(server_error(&response));
    }
    Ok(Output::DatabaseNames(decode_database_names(&response.body)?))
}
