//! In-process server
//!
//! [`MemoryServer`] answers the same REST dialect a real server speaks, so a
//! [`ServerClient`] can run against it with no network at all. It implements
//! [`Transport`] directly: `send` is a function call.
//!
//! ## Tenants
//!
//! The system database always exists. Tenants are created and dropped with
//! [`create_database`](MemoryServer::create_database) and
//! [`delete_database`](MemoryServer::delete_database); each one is also
//! registered as a `Raven/Databases/{name}` document in the system database,
//! which is what the database-name listing reads.
//!
//! ## Etags
//!
//! Every database has its own counter pair. `restarts` is fixed when the
//! database is created and `changes` goes up by one on every put or delete,
//! so Etags within one database are strictly increasing.
//!
//! ## Routing
//!
//! The server expects to be mounted at the root of its base URL
//! ([`MemoryServer::BASE_URL`]).

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use percent_encoding::percent_decode_str;
use tenantdb_core::{ConversionError, DatabaseName, Document, Etag, Metadata};
use tenantdb_wire::json::{render_document, split_document, ErrorResponse, PutResponse};
use tenantdb_wire::{format_etag_header, Method, Request, Response, HEADER_ETAG};
use uuid::Uuid;

use super::Transport;
use crate::error::TransportError;
use crate::{Error, Result, ServerClient};

/// Largest page a listing returns
pub const MAX_PAGE_SIZE: usize = 1024;

/// Page size when a listing does not ask for one
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Key prefix of tenant registration documents in the system database
pub const DATABASE_DOCUMENT_PREFIX: &str = "Raven/Databases/";

// =============================================================================
// Storage
// =============================================================================

#[derive(Debug, Clone)]
struct StoredDocument {
    data: Document,
    metadata: Metadata,
    etag: Etag,
    last_modified: DateTime<Utc>,
}

/// Rejected conditional write
struct Conflict {
    expected: Option<Etag>,
    actual: Option<Etag>,
}

#[derive(Debug)]
struct Store {
    last_etag: Etag,
    documents: BTreeMap<String, StoredDocument>,
}

impl Store {
    fn new(restarts: u64) -> Self {
        Store {
            last_etag: Etag::new(restarts, 0),
            documents: BTreeMap::new(),
        }
    }

    fn next_etag(&mut self) -> Etag {
        self.last_etag = self.last_etag.increment();
        self.last_etag
    }

    fn check(&self, key: &str, expected: Option<Etag>) -> std::result::Result<(), Conflict> {
        let Some(expected) = expected else {
            return Ok(());
        };
        let actual = self.documents.get(key).map(|doc| doc.etag);
        if actual == Some(expected) {
            Ok(())
        } else {
            Err(Conflict {
                expected: Some(expected),
                actual,
            })
        }
    }

    fn put(
        &mut self,
        key: &str,
        expected: Option<Etag>,
        data: Document,
        metadata: Metadata,
    ) -> std::result::Result<Etag, Conflict> {
        self.check(key, expected)?;
        let etag = self.next_etag();
        self.documents.insert(
            key.to_string(),
            StoredDocument {
                data,
                metadata,
                etag,
                last_modified: Utc::now(),
            },
        );
        Ok(etag)
    }

    fn delete(&mut self, key: &str, expected: Option<Etag>) -> std::result::Result<bool, Conflict> {
        self.check(key, expected)?;
        if self.documents.remove(key).is_some() {
            self.next_etag();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Keys starting with `prefix`, in byte order
    fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a StoredDocument)> + 'a {
        self.documents
            .range::<str, _>((std::ops::Bound::Included(prefix), std::ops::Bound::Unbounded))
            .take_while(move |(key, _)| key.starts_with(prefix))
    }

    /// Every document, most recent first
    fn by_etag_desc(&self) -> Vec<(&String, &StoredDocument)> {
        let mut docs: Vec<_> = self.documents.iter().collect();
        docs.sort_by(|a, b| b.1.etag.cmp(&a.1.etag));
        docs
    }
}

struct ServerState {
    system: Store,
    /// Keyed by lowercased name
    tenants: BTreeMap<String, Store>,
    next_restarts: u64,
}

// =============================================================================
// Wildcards
// =============================================================================

/// Match `text` against a `*`/`?` pattern
fn wildcard_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    let (mut pi, mut ti) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while ti < t.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some((pi, ti));
            pi += 1;
        } else if let Some((sp, st)) = star {
            pi = sp + 1;
            ti = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }
    p[pi..].iter().all(|c| *c == '*')
}

/// Match `text` against `|`-separated patterns. An empty set matches all.
fn matches_any(patterns: &str, text: &str) -> bool {
    if patterns.is_empty() {
        return true;
    }
    patterns
        .split('|')
        .filter(|p| !p.is_empty())
        .any(|p| wildcard_match(p, text))
}

// =============================================================================
// Request parsing
// =============================================================================

enum Target {
    Collection,
    Document(String),
    DatabaseNames,
}

struct Route {
    database: Option<String>,
    target: Target,
}

fn decode_segment(raw: &str) -> std::result::Result<String, Response> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|_| bad_request("path is not valid UTF-8"))
}

fn parse_route(path: &str) -> std::result::Result<Route, Response> {
    let path = path.trim_start_matches('/');
    if path == "databases" {
        return Ok(Route {
            database: None,
            target: Target::DatabaseNames,
        });
    }

    let (database, rest) = match path.strip_prefix("databases/") {
        Some(tail) => match tail.split_once('/') {
            Some((name, rest)) => (Some(decode_segment(name)?), rest),
            None => return Err(bad_request(format!("no route for '/{}'", path))),
        },
        None => (None, path),
    };

    let target = match rest {
        "docs" => Target::Collection,
        "databases" => Target::DatabaseNames,
        _ => match rest.strip_prefix("docs/") {
            Some(key) => Target::Document(decode_segment(key)?),
            None => return Err(bad_request(format!("no route for '/{}'", path))),
        },
    };
    Ok(Route { database, target })
}

fn query_param(request: &Request, name: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

fn usize_param(
    request: &Request,
    name: &str,
    default: usize,
) -> std::result::Result<usize, Response> {
    match query_param(request, name) {
        Some(raw) => raw
            .parse()
            .map_err(|_| bad_request(format!("query parameter '{}' is not a number: {}", name, raw))),
        None => Ok(default),
    }
}

fn flag_param(request: &Request, name: &str) -> bool {
    query_param(request, name).is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

fn paging(request: &Request) -> std::result::Result<(usize, usize), Response> {
    let start = usize_param(request, "start", 0)?;
    let page_size = usize_param(request, "pageSize", DEFAULT_PAGE_SIZE)?.min(MAX_PAGE_SIZE);
    Ok((start, page_size))
}

// =============================================================================
// Responses
// =============================================================================

fn error_response(status: u16, message: impl Into<String>) -> Response {
    Response::new(status).with_json(&ErrorResponse::message(message).to_json())
}

fn bad_request(message: impl Into<String>) -> Response {
    error_response(400, message)
}

fn conflict_response(key: &str, conflict: Conflict) -> Response {
    let message = match conflict.actual {
        Some(_) => format!("Etag mismatch for document '{}'", key),
        None => format!("Document '{}' does not exist", key),
    };
    Response::new(409).with_json(
        &ErrorResponse::conflict(message, conflict.expected, conflict.actual).to_json(),
    )
}

fn render(
    key: &str,
    doc: &StoredDocument,
    metadata_only: bool,
) -> std::result::Result<serde_json::Value, ConversionError> {
    let body = if metadata_only { None } else { Some(&doc.data) };
    render_document(key, body, &doc.metadata, &doc.etag, &doc.last_modified)
}

fn render_failed(e: ConversionError) -> Response {
    error_response(500, e.to_string())
}

fn list_response<'a>(
    docs: impl Iterator<Item = (&'a String, &'a StoredDocument)>,
    metadata_only: bool,
) -> Response {
    let items = docs
        .map(|(key, doc)| render(key, doc, metadata_only))
        .collect::<std::result::Result<Vec<_>, _>>();
    match items {
        Ok(items) => Response::new(200).with_json(&serde_json::Value::Array(items)),
        Err(e) => render_failed(e),
    }
}

// =============================================================================
// Server
// =============================================================================

/// In-process document server with multi-tenant routing
pub struct MemoryServer {
    state: RwLock<ServerState>,
}

impl Default for MemoryServer {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryServer {
    /// Base address clients should use
    pub const BASE_URL: &'static str = "http://tenantdb.memory/";

    /// Server holding only an empty system database
    pub fn new() -> Self {
        MemoryServer {
            state: RwLock::new(ServerState {
                system: Store::new(0),
                tenants: BTreeMap::new(),
                next_restarts: 1,
            }),
        }
    }

    /// Router talking to this server
    pub fn connect(self: &Arc<Self>) -> Result<ServerClient> {
        ServerClient::connect(Self::BASE_URL, self.clone())
    }

    /// Create the tenant `name`.
    ///
    /// Returns `false` when it already exists.
    pub fn create_database(&self, name: &str) -> Result<bool> {
        let name = DatabaseName::new(name).map_err(|e| Error::invalid_database_name(name, e))?;
        let mut state = self.state.write();
        let id = name.as_str().to_ascii_lowercase();
        if state.tenants.contains_key(&id) {
            return Ok(false);
        }

        let restarts = state.next_restarts;
        state.next_restarts += 1;
        state.tenants.insert(id, Store::new(restarts));

        let settings = Document::new().with(
            "Settings",
            Document::new().with("Raven/DataDir", format!("~/Tenants/{}", name)),
        );
        let key = format!("{}{}", DATABASE_DOCUMENT_PREFIX, name);
        // Unconditional put cannot conflict.
        let _ = state.system.put(&key, None, settings, Metadata::new());

        tracing::debug!(target: "tenantdb::memory", database = %name, restarts, "Database created");
        Ok(true)
    }

    /// Drop the tenant `name` and every document in it.
    ///
    /// Returns `false` when it did not exist.
    pub fn delete_database(&self, name: &str) -> bool {
        let mut state = self.state.write();
        if state.tenants.remove(&name.to_ascii_lowercase()).is_none() {
            return false;
        }
        let registered: Vec<String> = state
            .system
            .with_prefix(DATABASE_DOCUMENT_PREFIX)
            .filter(|(key, _)| key[DATABASE_DOCUMENT_PREFIX.len()..].eq_ignore_ascii_case(name))
            .map(|(key, _)| key.clone())
            .collect();
        for key in registered {
            let _ = state.system.delete(&key, None);
        }
        tracing::debug!(target: "tenantdb::memory", database = name, "Database deleted");
        true
    }

    /// Whether the tenant `name` exists
    pub fn database_exists(&self, name: &str) -> bool {
        self.state
            .read()
            .tenants
            .contains_key(&name.to_ascii_lowercase())
    }

    /// Number of documents in a database, `None` for an unknown tenant
    pub fn document_count(&self, database: Option<&str>) -> Option<usize> {
        let state = self.state.read();
        match database {
            None => Some(state.system.documents.len()),
            Some(name) => state
                .tenants
                .get(&name.to_ascii_lowercase())
                .map(|store| store.documents.len()),
        }
    }

    /// Answer one request
    pub fn handle(&self, request: &Request) -> Response {
        let route = match parse_route(request.url.path()) {
            Ok(route) => route,
            Err(response) => return response,
        };
        tracing::trace!(
            target: "tenantdb::memory",
            method = %request.method,
            path = request.url.path(),
            "Handling request"
        );

        let is_write = matches!(request.method, Method::Put | Method::Post | Method::Delete);
        if is_write {
            let mut state = self.state.write();
            match store_mut(&mut state, route.database.as_deref()) {
                Ok(store) => handle_write(store, route, request),
                Err(response) => response,
            }
        } else {
            let state = self.state.read();
            match store_ref(&state, route.database.as_deref()) {
                Ok(store) => handle_read(store, route, request),
                Err(response) => response,
            }
        }
    }
}

fn unknown_database(name: &str) -> Response {
    error_response(503, format!("Could not find a database named: {}", name))
}

fn store_ref<'a>(
    state: &'a ServerState,
    database: Option<&str>,
) -> std::result::Result<&'a Store, Response> {
    match database {
        None => Ok(&state.system),
        Some(name) => state
            .tenants
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| unknown_database(name)),
    }
}

fn store_mut<'a>(
    state: &'a mut ServerState,
    database: Option<&str>,
) -> std::result::Result<&'a mut Store, Response> {
    match database {
        None => Ok(&mut state.system),
        Some(name) => state
            .tenants
            .get_mut(&name.to_ascii_lowercase())
            .ok_or_else(|| unknown_database(name)),
    }
}

fn handle_read(store: &Store, route: Route, request: &Request) -> Response {
    if request.method != Method::Get {
        return error_response(405, format!("{} not allowed here", request.method));
    }
    match route.target {
        Target::Document(key) if key.is_empty() => bad_request("document key cannot be empty"),
        Target::Document(key) => match store.documents.get(&key) {
            Some(doc) => match render(&key, doc, flag_param(request, "metadata-only")) {
                Ok(json) => Response::new(200)
                    .with_header(HEADER_ETAG, format_etag_header(&doc.etag))
                    .with_json(&json),
                Err(e) => render_failed(e),
            },
            None => Response::new(404),
        },
        Target::Collection => {
            let (start, page_size) = match paging(request) {
                Ok(p) => p,
                Err(response) => return response,
            };
            let metadata_only = flag_param(request, "metadata-only");
            match query_param(request, "startsWith") {
                Some(prefix) => {
                    let matches = query_param(request, "matches").unwrap_or_default();
                    let docs = store
                        .with_prefix(&prefix)
                        .filter(|(key, _)| matches_any(&matches, &key[prefix.len()..]))
                        .skip(start)
                        .take(page_size);
                    list_response(docs, metadata_only)
                }
                None => list_response(
                    store.by_etag_desc().into_iter().skip(start).take(page_size),
                    metadata_only,
                ),
            }
        }
        Target::DatabaseNames if route.database.is_some() => {
            bad_request("database names are only available on the system database")
        }
        Target::DatabaseNames => {
            let (start, page_size) = match paging(request) {
                Ok(p) => p,
                Err(response) => return response,
            };
            let names: Vec<serde_json::Value> = store
                .with_prefix(DATABASE_DOCUMENT_PREFIX)
                .skip(start)
                .take(page_size)
                .map(|(key, _)| serde_json::Value::from(&key[DATABASE_DOCUMENT_PREFIX.len()..]))
                .collect();
            Response::new(200).with_json(&serde_json::Value::Array(names))
        }
    }
}

fn handle_write(store: &mut Store, route: Route, request: &Request) -> Response {
    let expected = match request.expected_etag() {
        Ok(etag) => etag,
        Err(e) => return bad_request(e.to_string()),
    };

    let key = match (request.method, route.target) {
        (Method::Post, Target::Collection) => Uuid::new_v4().to_string(),
        (Method::Put | Method::Delete, Target::Document(key)) if !key.is_empty() => key,
        (_, Target::Document(_)) => return bad_request("document key cannot be empty"),
        (method, _) => return error_response(405, format!("{} not allowed here", method)),
    };

    if request.method == Method::Delete {
        return match store.delete(&key, expected) {
            Ok(existed) => {
                tracing::trace!(target: "tenantdb::memory", key = %key, existed, "Document deleted");
                Response::new(204)
            }
            Err(conflict) => conflict_response(&key, conflict),
        };
    }

    let (data, metadata) = match request.body.as_deref().map(split_document) {
        Some(Ok(parts)) => parts,
        Some(Err(e)) => return bad_request(e.to_string()),
        None => return bad_request("missing request body"),
    };
    match store.put(&key, expected, data, metadata) {
        Ok(etag) => {
            tracing::trace!(target: "tenantdb::memory", key = %key, etag = %etag, "Document stored");
            let body = PutResponse { key, etag };
            Response::new(201).with_json(&serde_json::to_value(&body).unwrap_or(serde_json::Value::Null))
        }
        Err(conflict) => conflict_response(&key, conflict),
    }
}

impl Transport for MemoryServer {
    fn send(&self, request: Request) -> std::result::Result<Response, TransportError> {
        Ok(self.handle(&request))
    }
}

impl std::fmt::Debug for MemoryServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("MemoryServer")
            .field("system_documents", &state.system.documents.len())
            .field("tenants", &state.tenants.keys().collect::<Vec<_>>())
            .finish()
    }
}
