//! Building routers from configuration

use tenantdb::{ClientConfig, Error, ServerClient, CONFIG_FILE_NAME};

#[test]
fn router_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(
        &path,
        "url = \"http://db.internal:8080/raven\"\ntimeout_ms = 2500\nuser_agent = \"tests\"\n",
    )
    .unwrap();

    let config = ClientConfig::from_file(&path).unwrap();
    assert_eq!(config.timeout_ms, 2500);

    // No I/O happens until a command runs
    let client = ServerClient::from_config(&config).unwrap();
    assert_eq!(client.url().as_str(), "http://db.internal:8080/raven");
    assert_eq!(client.for_database("db1").database(), Some("db1"));
}

#[test]
fn default_config_file_is_usable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    ClientConfig::write_default_if_missing(&path).unwrap();

    let config = ClientConfig::from_file(&path).unwrap();
    let client = ServerClient::from_config(&config).unwrap();
    assert_eq!(client.url().as_str(), "http://localhost:8080/");
}

#[test]
fn bad_base_address_is_config_error() {
    for url in ["", "localhost", "mailto:someone@example.com", "ftp://host/"] {
        let err = ServerClient::new(url).unwrap_err();
        assert!(matches!(err, Error::Config { .. }), "{:?} accepted", url);
    }
}
