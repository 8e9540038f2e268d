//! Routing tests: bindings reach the database they name and no other.

use std::sync::Arc;

use super::{create_test_client, person};
use crate::transport::mock::CannedTransport;
use crate::{Command, Error, Executor, Metadata, ServerClient};
use tenantdb_wire::{Method, Response};
use url::Url;

#[test]
fn test_system_binding_is_stable() {
    let (_server, client) = create_test_client();
    let a = client.for_system_database() as *const _;
    let b = client.for_system_database() as *const _;
    assert_eq!(a, b);
    assert!(std::ptr::eq(client.for_system_database(), &*client));
    assert_eq!(client.database(), None);
}

#[test]
fn test_tenant_binding_names_its_database() {
    let (_server, client) = create_test_client();
    assert_eq!(client.for_database("db1").database(), Some("db1"));
}

#[test]
fn test_documents_are_isolated_per_database() {
    let (server, client) = create_test_client();
    server.create_database("db2").unwrap();
    let db1 = client.for_database("db1");
    let db2 = client.for_database("db2");

    db1.put("users/marcin", None, &person("John", "Smith"), &Metadata::new())
        .unwrap();

    assert!(client.get("users/marcin").unwrap().is_none());
    assert!(db2.get("users/marcin").unwrap().is_none());
    assert!(db1.get("users/marcin").unwrap().is_some());
}

#[test]
fn test_same_key_in_two_databases() {
    let (server, client) = create_test_client();
    server.create_database("db2").unwrap();
    let db1 = client.for_database("db1");
    let db2 = client.for_database("db2");

    db1.put("k", None, &person("A", "A"), &Metadata::new()).unwrap();
    db2.put("k", None, &person("B", "B"), &Metadata::new()).unwrap();

    let a = db1.get("k").unwrap().unwrap();
    let b = db2.get("k").unwrap().unwrap();
    assert_eq!(a.data.get("firstname").and_then(|v| v.as_str()), Some("A"));
    assert_eq!(b.data.get("firstname").and_then(|v| v.as_str()), Some("B"));
}

#[test]
fn test_invalid_name_fails_lazily() {
    let (server, client) = create_test_client();
    // Building the binding never fails
    let bad = client.for_database("");
    let err = bad.get("k").unwrap_err();
    assert!(matches!(err, Error::InvalidDatabaseName { .. }));

    let err = client
        .for_database("no/slashes")
        .put("k", None, &person("A", "B"), &Metadata::new())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidDatabaseName { .. }));

    // Nothing reached the server
    assert_eq!(server.document_count(None), Some(1));
}

#[test]
fn test_invalid_name_sends_no_request() {
    let transport = Arc::new(CannedTransport::new(Response::new(200)));
    let client = ServerClient::with_transport(
        Url::parse("http://localhost:8080").unwrap(),
        transport.clone(),
    );
    assert!(client.for_database("system").get("k").is_err());
    assert!(transport.last_request().is_none());
}

#[test]
fn test_unknown_tenant_is_server_error() {
    let (_server, client) = create_test_client();
    let err = client.for_database("missing").get("k").unwrap_err();
    assert!(matches!(err, Error::ServerError { status: 503, .. }));
}

#[test]
fn test_requests_carry_database_segment() {
    let transport = Arc::new(CannedTransport::new(Response::new(404)));
    let client = ServerClient::with_transport(
        Url::parse("http://localhost:8080").unwrap(),
        transport.clone(),
    );

    client.get("users/1").unwrap();
    let request = transport.last_request().unwrap();
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.url.path(), "/docs/users/1");

    client.for_database("db1").get("users/1").unwrap();
    let request = transport.last_request().unwrap();
    assert_eq!(request.url.path(), "/databases/db1/docs/users/1");
}

#[test]
fn test_empty_key_put_posts_to_collection() {
    let (_server, client) = create_test_client();
    let db1 = client.for_database("db1");
    let result = db1
        .put("", None, &person("Anon", "Ymous"), &Metadata::new())
        .unwrap();
    assert!(!result.key.is_empty());
    assert!(db1.get(&result.key).unwrap().is_some());
}

#[test]
fn test_user_agent_header() {
    let transport = Arc::new(CannedTransport::new(Response::new(404)));
    let executor = Executor::new(Url::parse("http://localhost:8080").unwrap(), transport.clone())
        .with_user_agent("tests/1.0");
    executor
        .execute(Command::Get {
            database: None,
            key: "k".into(),
        })
        .unwrap();
    let request = transport.last_request().unwrap();
    assert_eq!(request.header("user-agent"), Some("tests/1.0"));
}

#[test]
fn test_database_names_on_tenant_is_forwarded() {
    let (_server, client) = create_test_client();
    let err = client.for_database("db1").get_database_names(10, 0).unwrap_err();
    assert!(matches!(err, Error::ServerError { status: 400, .. }));
}

#[test]
fn test_dot_segment_keys_never_reach_the_server() {
    let (server, client) = create_test_client();
    let db1 = client.for_database("db1");

    for key in ["a/../b", "users/.", "./x", ".."] {
        let err = db1
            .put(key, None, &person("John", "Smith"), &Metadata::new())
            .unwrap_err();
        assert!(
            matches!(err, Error::InvalidKey { key: ref k, .. } if k == key),
            "{}: {:?}",
            key,
            err
        );
        assert!(matches!(db1.get(key), Err(Error::InvalidKey { .. })));
        assert!(matches!(db1.head(key), Err(Error::InvalidKey { .. })));
        assert!(matches!(db1.delete(key, None), Err(Error::InvalidKey { .. })));
    }
    assert_eq!(server.document_count(Some("db1")), Some(0));
}

#[test]
fn test_dotted_keys_round_trip_exactly() {
    let (_server, client) = create_test_client();
    let db1 = client.for_database("db1");

    for key in ["a/.b", "files/report.v2..txt", "a/%2e%2e/b"] {
        let put = db1
            .put(key, None, &person("John", "Smith"), &Metadata::new())
            .unwrap();
        assert_eq!(put.key, key);
        assert_eq!(db1.get(key).unwrap().unwrap().key, key);
    }
    let page = db1.starts_with("a/", "", 0, 10, false).unwrap();
    let keys: Vec<&str> = page.iter().map(|d| d.key.as_str()).collect();
    assert_eq!(keys, vec!["a/%2e%2e/b", "a/.b"]);
}

#[test]
fn test_invalid_key_is_refused_before_sending() {
    let transport = Arc::new(CannedTransport::new(Response::new(201)));
    let client = ServerClient::with_transport(
        Url::parse("http://localhost:8080").unwrap(),
        transport.clone(),
    );
    let err = client
        .put("a/../b", None, &person("A", "B"), &Metadata::new())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidKey { .. }));
    assert!(transport.last_request().is_none());
}
