//! mtls-rpc SDK - HTTPS adapter for the mutual-TLS JSON-RPC client
//!
//! Wires [`HttpsTransport`] into [`SecureRpcClient`].
//!
//! # Example
//!
//! ```no_run
//! use mtls_rpc_sdk::{connect, ClientConfig};
//! use serde_json::json;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let key = std::fs::read_to_string("client.key")?;
//!     let cert = std::fs::read_to_string("client.crt")?;
//!
//!     let client = connect(ClientConfig::new("https://rpc.example.com/api", key, cert));
//!     let response = client.send_value("auth.check", json!({"id": 1}))?;
//!
//!     println!("{}", serde_json::to_string_pretty(&response)?);
//!     Ok(())
//! }
//! ```

mod error;
mod https_transport;

use std::time::Duration;

pub use https_transport::HttpsTransport;
pub use mtls_rpc_core::{
    ClientConfig, ClientError, CredentialStaging, ErrorKind, ParamsLayout, Result, RpcResponse,
    SecureRpcClient,
};

/// Client over HTTPS
pub type HttpsRpcClient = SecureRpcClient<HttpsTransport>;

/// Create an HTTPS client without an I/O deadline
pub fn connect(config: ClientConfig) -> HttpsRpcClient {
    SecureRpcClient::new(config, HttpsTransport::new())
}

/// Create an HTTPS client whose calls give up after `timeout`
pub fn connect_with_timeout(config: ClientConfig, timeout: Duration) -> HttpsRpcClient {
    SecureRpcClient::new(config, HttpsTransport::new().with_timeout(timeout))
}
