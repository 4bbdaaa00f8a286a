//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::net::TcpListener;
use std::path::Path;

/// Self-signed P-256 client identity
pub const CLIENT_KEY: &str = include_str!("../fixtures/client.key");
pub const CLIENT_CERT: &str = include_str!("../fixtures/client.crt");

/// Valid P-256 key that does not belong to `CLIENT_CERT`
pub const OTHER_KEY: &str = include_str!("../fixtures/other.key");

/// HTTPS URL on a local port nothing listens on
pub fn refused_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("https://127.0.0.1:{}/api", port)
}

/// Number of entries left in a staging directory
pub fn staged_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

pub fn params(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}
