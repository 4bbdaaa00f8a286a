//! HTTPS transport implementation
//!
//! reqwest blocking client over rustls, verifying the server against the
//! platform's native trust roots and presenting the caller's certificate.

use std::time::Duration;

use mtls_rpc_core::port::{IdentitySource, SecureTransport};
use mtls_rpc_core::{ClientError, Result, RpcResponse};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Identity, StatusCode};
use tracing::debug;

use crate::error::describe;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Mutual-TLS HTTPS transport
///
/// Builds a fresh client for every call; nothing is pooled across calls.
#[derive(Debug, Clone, Default)]
pub struct HttpsTransport {
    timeout: Option<Duration>,
}

impl HttpsTransport {
    /// Transport without an I/O deadline
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound connect, handshake and response read by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl SecureTransport for HttpsTransport {
    type Context = Client;

    fn build_context(&self, identity: IdentitySource<'_>) -> Result<Client> {
        let pem = identity.read_pem()?;

        let identity = Identity::from_pem(&pem).map_err(|e| {
            ClientError::tls_context("Failed to load client certificate and key", e)
        })?;

        Client::builder()
            .use_rustls_tls()
            .identity(identity)
            .https_only(true)
            .timeout(self.timeout)
            .build()
            .map_err(|e| ClientError::tls_context("Failed to create TLS context", e))
    }

    fn transmit(&self, client: &Client, endpoint: &str, body: &[u8]) -> Result<RpcResponse> {
        let response = client
            .post(endpoint)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body.to_vec())
            .send()
            .map_err(|e| {
                ClientError::transport(format!("{} to url={}", describe(&e), endpoint), e)
            })?;

        let status = response.status();
        debug!(endpoint = %endpoint, status = %status, "Request sent");
        check_status(endpoint, status)?;

        let bytes = response.bytes().map_err(|e| {
            ClientError::transport(format!("{} from url={}", describe(&e), endpoint), e)
        })?;

        decode_body(endpoint, &bytes)
    }
}

/// Any status outside 2xx fails the call
fn check_status(endpoint: &str, status: StatusCode) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }
    Err(ClientError::transport(
        format!("Server at url={} returned {}", endpoint, status),
        format!("HTTP status {}", status),
    ))
}

/// Response body must be UTF-8 text holding a JSON document
fn decode_body(endpoint: &str, bytes: &[u8]) -> Result<RpcResponse> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        ClientError::transport(
            format!("Response from url={} is not valid UTF-8", endpoint),
            e,
        )
    })?;

    serde_json::from_str(text).map_err(|e| {
        ClientError::transport(
            format!("Response from url={} is not valid JSON", endpoint),
            e,
        )
    })
}
