//! The multi-tenant walkthrough: create a tenant, write into it, check that
//! the system database stays untouched, list, and delete with Etags.

use tenantdb::{Error, Etag, JsonDocument, Metadata, ToDocument, Value};

use crate::common::{Person, TestServer};

#[test]
fn database_changes_walkthrough() {
    let test = TestServer::new();
    let client = &test.client;
    let system = client.for_system_database();
    assert!(std::ptr::eq(system, &**client));

    test.create_db("db1");
    let names = system.get_database_names(20, 0).unwrap();
    assert_eq!(names, vec!["db1".to_string()]);

    let db1 = client.for_database("db1");
    let marcin = Person::new("John", "Smith").to_document().unwrap();
    let put = db1
        .put("users/marcin", None, &marcin, &Metadata::new())
        .unwrap();
    assert_ne!(put.etag, Etag::EMPTY);

    assert!(
        client.get("users/marcin").unwrap().is_none(),
        "Object was created in different db!"
    );
    let doc: JsonDocument = db1.get("users/marcin").unwrap().unwrap();
    assert_eq!(doc.etag, put.etag);
    assert_eq!(doc.data.get("firstname"), Some(&Value::from("John")));
    assert_eq!(doc.to_entity::<Person>().unwrap(), Person::new("John", "Smith"));

    let albert = db1
        .put_entity(
            "users/albert",
            None,
            &Person::new("Albert", "Einstein"),
            &Metadata::new(),
        )
        .unwrap();

    let users = db1.starts_with("users", "", 0, 10, false).unwrap();
    assert_eq!(users.len(), 2);

    let documents = db1.get_documents(0, 20, false).unwrap();
    assert_eq!(documents.len(), 2);
    for doc in &documents {
        assert!(doc.key.starts_with("users/"));
        assert!(doc.data.contains_key("firstname"));
        assert!(doc.data.contains_key("lastname"));
    }

    db1.delete("users/albert", Some(albert.etag)).unwrap();
    let err = db1.delete("users/albert", Some(Etag::random())).unwrap_err();
    assert!(matches!(err, Error::ConcurrencyConflict { .. }));

    assert_eq!(db1.get_documents(0, 20, false).unwrap().len(), 1);

    test.delete_db("db1");
    assert!(system.get_database_names(20, 0).unwrap().is_empty());
    assert!(matches!(
        db1.get("users/marcin").unwrap_err(),
        Error::ServerError { status: 503, .. }
    ));
}

