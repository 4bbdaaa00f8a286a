// Secure RPC Client - the one caller-facing use case
//
// Per call: build body -> stage credentials -> build TLS context -> transmit
// -> remove staged files. Calls share nothing but the immutable config.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, error, info, info_span};

use crate::credentials::StagedCredentials;
use crate::domain::{ClientConfig, CredentialStaging, RpcRequest, RpcResponse};
use crate::error::{ClientError, Result};
use crate::port::{CallIdProvider, IdentitySource, SecureTransport, UuidProvider};

/// JSON-RPC client authenticating with a client certificate
///
/// # Example
///
/// ```
/// use mtls_rpc_core::port::secure_transport::mocks::RecordingTransport;
/// use mtls_rpc_core::{ClientConfig, SecureRpcClient};
/// use serde_json::json;
///
/// let response = json!({"jsonrpc": "2.0", "result": {"ok": true}, "id": null});
/// let transport = RecordingTransport::responding(response);
/// let config = ClientConfig::new("https://rpc.example.com/api", "KEY PEM", "CERT PEM");
/// let client = SecureRpcClient::new(config, transport);
///
/// let response = client.send_value("ping", json!({"id": 1})).unwrap();
/// assert_eq!(response["result"]["ok"], json!(true));
/// ```
pub struct SecureRpcClient<T: SecureTransport> {
    config: ClientConfig,
    transport: T,
    id_provider: Arc<dyn CallIdProvider>,
}

impl<T: SecureTransport> SecureRpcClient<T> {
    /// Create a client. No I/O and no validation happen here.
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            id_provider: Arc::new(UuidProvider),
        }
    }

    /// Replace the call id generator (deterministic ids in tests)
    pub fn with_id_provider(mut self, id_provider: Arc<dyn CallIdProvider>) -> Self {
        self.id_provider = id_provider;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Call `method` with `params` merged into the request object
    ///
    /// Returns the decoded response body unexamined; a JSON-RPC `error`
    /// member is the caller's to interpret.
    ///
    /// # Errors
    /// - ClientError::InvalidArgument if `params` is empty (nothing staged or sent)
    /// - ClientError::CredentialStaging if the key/certificate files cannot be written
    /// - ClientError::TlsContext if the client identity is rejected
    /// - ClientError::Transport on connection, HTTP or decode failure
    pub fn send(&self, method: &str, params: &Map<String, Value>) -> Result<RpcResponse> {
        // 1. Build body (fails before any I/O on empty params)
        let request = match RpcRequest::new(method, params.clone(), self.config.params_layout()) {
            Ok(request) => request,
            Err(e) => {
                error!(method, error = %e, "Rejected call with invalid parameters");
                return Err(e);
            }
        };
        let body = request.to_bytes()?;

        let call_id = self.id_provider.generate_id();
        let span = info_span!("rpc_call", call_id = %call_id, method);
        let _enter = span.enter();

        let result = match self.config.staging() {
            CredentialStaging::TempFiles { dir } => {
                // 2. Stage credentials; files are removed when `staged` drops
                let mut staged = StagedCredentials::stage(
                    dir.as_deref(),
                    &call_id,
                    self.config.client_key_pem(),
                    self.config.client_cert_pem(),
                )
                .inspect_err(|e| error!(error = %e, "Credential staging failed"))?;

                // 3-4. Context + transmit
                let result = self.dispatch(IdentitySource::Staged(&staged), &body);

                // 5. Cleanup, on every outcome
                staged.cleanup();
                result
            }
            CredentialStaging::InMemory => self.dispatch(
                IdentitySource::InMemory {
                    key_pem: self.config.client_key_pem(),
                    cert_pem: self.config.client_cert_pem(),
                },
                &body,
            ),
        };

        match &result {
            Ok(_) => info!(endpoint = %self.config.endpoint_url(), "RPC call completed"),
            Err(e) => error!(
                endpoint = %self.config.endpoint_url(),
                error = %e.detailed_message(),
                "RPC call failed"
            ),
        }

        result
    }

    /// Like [`send`](Self::send), for params held as a JSON value
    ///
    /// # Errors
    /// - ClientError::InvalidArgument if `params` is null or not a JSON object
    pub fn send_value(&self, method: &str, params: Value) -> Result<RpcResponse> {
        match params {
            Value::Object(map) => self.send(method, &map),
            Value::Null => Err(ClientError::invalid_argument(
                "Parameters cannot be empty",
            )),
            other => Err(ClientError::invalid_argument(format!(
                "Parameters must be a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    fn dispatch(&self, identity: IdentitySource<'_>, body: &[u8]) -> Result<RpcResponse> {
        let context = self.transport.build_context(identity)?;
        debug!("TLS context created");

        let endpoint = self.config.endpoint_url();
        let response = self.transport.transmit(&context, endpoint, body)?;
        debug!(endpoint = %endpoint, "Response received");

        Ok(response)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
