//! Prefix queries, full listings and database names

use tenantdb::{DatabaseCommands, Metadata};

use crate::common::{Person, TestServer};

fn seed(db: &DatabaseCommands, count: usize) {
    for i in 0..count {
        db.put_entity(
            &format!("users/{:03}", i),
            None,
            &Person::new(&format!("user{}", i), "x"),
            &Metadata::new(),
        )
        .unwrap();
    }
    db.put_entity("orders/1", None, &Person::new("o", "o"), &Metadata::new())
        .unwrap();
}

#[test]
fn starts_with_pages_in_key_order() {
    let test = TestServer::with_databases(&["db1"]);
    let db = test.client.for_database("db1");
    seed(&db, 25);

    let first = db.starts_with("users", "", 0, 10, false).unwrap();
    let second = db.starts_with("users", "", 10, 10, false).unwrap();
    let third = db.starts_with("users", "", 20, 10, false).unwrap();

    assert_eq!(first.len(), 10);
    assert_eq!(second.len(), 10);
    assert_eq!(third.len(), 5);

    let all: Vec<String> = first
        .iter()
        .chain(&second)
        .chain(&third)
        .map(|d| d.key.clone())
        .collect();
    let expected: Vec<String> = (0..25).map(|i| format!("users/{:03}", i)).collect();
    assert_eq!(all, expected);
}

#[test]
fn get_documents_covers_every_document() {
    let test = TestServer::with_databases(&["db1"]);
    let db = test.client.for_database("db1");
    seed(&db, 5);

    let docs = db.get_documents(0, 100, false).unwrap();
    assert_eq!(docs.len(), 6);
    assert_eq!(docs[0].key, "orders/1");

    let metadata_only = db.get_documents(0, 100, true).unwrap();
    assert_eq!(metadata_only.len(), 6);
    assert!(metadata_only.iter().all(|d| d.data.is_empty()));
    let etags: Vec<_> = docs.iter().map(|d| d.etag).collect();
    let meta_etags: Vec<_> = metadata_only.iter().map(|d| d.etag).collect();
    assert_eq!(etags, meta_etags);
}

#[test]
fn listings_do_not_cross_databases() {
    let test = TestServer::with_databases(&["db1", "db2"]);
    seed(&test.client.for_database("db1"), 3);

    let db2 = test.client.for_database("db2");
    assert!(db2.get_documents(0, 10, false).unwrap().is_empty());
    assert!(db2.starts_with("users", "", 0, 10, false).unwrap().is_empty());

    // The system database only holds tenant registrations
    let system = test.client.get_documents(0, 10, false).unwrap();
    assert_eq!(system.len(), 2);
    assert!(system.iter().all(|d| d.key.starts_with("Raven/Databases/")));
}

#[test]
fn database_names_follow_creation_and_deletion() {
    let test = TestServer::with_databases(&["alpha", "beta", "gamma"]);
    assert_eq!(
        test.client.get_database_names(10, 0).unwrap(),
        vec!["alpha", "beta", "gamma"]
    );
    test.delete_db("beta");
    assert_eq!(
        test.client.get_database_names(10, 0).unwrap(),
        vec!["alpha", "gamma"]
    );
}
