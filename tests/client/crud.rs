//! Document CRUD through the public API

use tenantdb::{Document, Error, Etag, Metadata, Value};

use crate::common::{Person, TestServer};

fn body(n: i64) -> Document {
    Document::new()
        .with("n", n)
        .with("tags", vec![Value::from("a"), Value::from("b")])
        .with("nested", Document::new().with("ok", true).with("none", ()))
}

#[test]
fn unwritten_keys_are_absent() {
    let test = TestServer::with_databases(&["db1"]);
    let db = test.client.for_database("db1");
    for key in ["a", "users/1", "deep/nested/key", "with space"] {
        assert!(db.get(key).unwrap().is_none());
        assert!(db.head(key).unwrap().is_none());
    }
}

#[test]
fn put_then_get_returns_body_metadata_and_etag() {
    let test = TestServer::with_databases(&["db1"]);
    let db = test.client.for_database("db1");
    let meta = Metadata::new()
        .with("Raven-Entity-Name", "Things")
        .with("Raven-Clr-Type", "Thing");

    let put = db.put("things/1", None, &body(1), &meta).unwrap();
    let doc = db.get("things/1").unwrap().unwrap();

    assert_eq!(doc.key, "things/1");
    assert_eq!(doc.data, body(1));
    assert_eq!(doc.metadata, meta);
    assert_eq!(doc.etag, put.etag);
}

#[test]
fn keys_with_reserved_characters_round_trip() {
    let test = TestServer::with_databases(&["db1"]);
    let db = test.client.for_database("db1");
    for key in ["a b", "q?x=1", "hash#tag", "pct%20", "plus+sign", "ünïcode/ключ"] {
        db.put(key, None, &body(0), &Metadata::new()).unwrap();
        let doc = db.get(key).unwrap().unwrap();
        assert_eq!(doc.key, key);
    }
}

#[test]
fn etag_rules_for_put() {
    let test = TestServer::with_databases(&["db1"]);
    let db = test.client.for_database("db1");

    let e1 = db.put("k", None, &body(1), &Metadata::new()).unwrap().etag;

    let wrong = Etag::random();
    assert!(db
        .put("k", Some(wrong), &body(2), &Metadata::new())
        .unwrap_err()
        .is_concurrency_conflict());

    let e3 = db.put("k", Some(e1), &body(3), &Metadata::new()).unwrap().etag;
    assert_ne!(e3, e1);
    assert_eq!(db.get("k").unwrap().unwrap().data, body(3));
}

#[test]
fn delete_then_get_is_absent() {
    let test = TestServer::with_databases(&["db1"]);
    let db = test.client.for_database("db1");
    let put = db.put("k", None, &body(1), &Metadata::new()).unwrap();

    db.delete("k", Some(put.etag)).unwrap();
    assert!(db.get("k").unwrap().is_none());

    // Recreating after a delete starts a fresh revision
    let again = db.put("k", None, &body(2), &Metadata::new()).unwrap();
    assert!(again.etag > put.etag);
}

#[test]
fn delete_absent_without_etag_is_noop() {
    let test = TestServer::with_databases(&["db1"]);
    let db = test.client.for_database("db1");
    db.delete("ghost", None).unwrap();
    assert_eq!(test.server.document_count(Some("db1")), Some(0));
}

#[test]
fn typed_round_trip() {
    let test = TestServer::with_databases(&["db1"]);
    let db = test.client.for_database("db1");
    let ada = Person::new("Ada", "Lovelace");

    db.put_entity("people/ada", None, &ada, &Metadata::new()).unwrap();
    let back: Person = db.get("people/ada").unwrap().unwrap().to_entity().unwrap();
    assert_eq!(back, ada);
}

#[test]
fn wide_integers_round_trip_exactly() {
    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Counter {
        hits: u64,
        floor: i64,
    }

    let test = TestServer::with_databases(&["db1"]);
    let db = test.client.for_database("db1");
    let counter = Counter {
        hits: u64::MAX - 1,
        floor: i64::MIN,
    };

    db.put_entity("counters/1", None, &counter, &Metadata::new())
        .unwrap();
    let doc = db.get("counters/1").unwrap().unwrap();
    assert_eq!(doc.data.get("hits"), Some(&Value::UInt(u64::MAX - 1)));
    assert_eq!(doc.to_entity::<Counter>().unwrap(), counter);
}

#[test]
fn reserved_names_are_refused_not_dropped() {
    let test = TestServer::with_databases(&["db1"]);
    let db = test.client.for_database("db1");

    let err = db
        .put("k", None, &body(1).with("@metadata", 1), &Metadata::new())
        .unwrap_err();
    assert!(matches!(err, Error::Conversion { .. }));

    let err = db
        .put("k", None, &body(1), &Metadata::new().with("@id", "other"))
        .unwrap_err();
    assert!(matches!(err, Error::Conversion { .. }));
    assert!(db.get("k").unwrap().is_none());
}

#[test]
fn system_database_is_a_normal_document_space() {
    let test = TestServer::new();
    let put = test
        .client
        .put("settings/global", None, &body(7), &Metadata::new())
        .unwrap();
    let doc = test.client.get("settings/global").unwrap().unwrap();
    assert_eq!(doc.etag, put.etag);
}

#[test]
fn server_assigned_keys_are_unique() {
    let test = TestServer::with_databases(&["db1"]);
    let db = test.client.for_database("db1");
    let a = db.put("", None, &body(1), &Metadata::new()).unwrap();
    let b = db.put("", None, &body(2), &Metadata::new()).unwrap();
    assert_ne!(a.key, b.key);
    assert_eq!(db.get(&a.key).unwrap().unwrap().data, body(1));
}

#[test]
fn reserved_database_name_is_rejected_on_use() {
    let test = TestServer::new();
    let err = test.client.for_database("system").get("k").unwrap_err();
    match err {
        Error::InvalidDatabaseName { name, reason } => {
            assert_eq!(name, "system");
            assert!(reason.contains("reserved"));
        }
        other => panic!("expected InvalidDatabaseName, got {:?}", other),
    }
}
