//! Ping Example
//!
//! Calls one method on a mutual-TLS JSON-RPC endpoint.
//!
//! # Usage
//!
//! ```bash
//! MTLS_RPC_URL=https://rpc.example.com/api \
//! MTLS_RPC_CLIENT_KEY="$(cat client.key)" \
//! MTLS_RPC_CLIENT_CERT="$(cat client.crt)" \
//!     cargo run --package mtls-rpc-sdk --example ping
//! ```

use std::time::Duration;

use mtls_rpc_sdk::{connect_with_timeout, ClientConfig};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("mtls_rpc=debug")
        .with_writer(std::io::stderr)
        .init();

    let url = std::env::var("MTLS_RPC_URL")?;
    let key = std::env::var("MTLS_RPC_CLIENT_KEY")?;
    let cert = std::env::var("MTLS_RPC_CLIENT_CERT")?;

    let client = connect_with_timeout(ClientConfig::new(url, key, cert), Duration::from_secs(30));

    println!("Calling ping...");
    let response = client.send_value("ping", json!({"id": 1}))?;

    if response.get("error").is_some() {
        println!("✗ Server returned an error:");
    } else {
        println!("✓ Response:");
    }
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
