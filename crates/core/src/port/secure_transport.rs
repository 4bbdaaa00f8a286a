// Secure Transport Port
// Abstraction over the mutual-TLS stack: build a context bound to a client
// identity, then use it to deliver one request body.

use std::path::Path;

use crate::credentials::StagedCredentials;
use crate::domain::RpcResponse;
use crate::error::{ClientError, Result};

/// Client identity handed to the context builder
#[derive(Debug, Clone, Copy)]
pub enum IdentitySource<'a> {
    /// Key and certificate staged on disk for the current call
    Staged(&'a StagedCredentials),
    /// PEM strings straight from the client configuration
    InMemory { key_pem: &'a str, cert_pem: &'a str },
}

impl IdentitySource<'_> {
    /// Certificate chain followed by the private key, as one PEM buffer.
    ///
    /// # Errors
    /// - ClientError::TlsContext if a staged file cannot be read
    pub fn read_pem(&self) -> Result<Vec<u8>> {
        match self {
            IdentitySource::Staged(staged) => {
                let mut pem = read_staged(staged.cert_path(), "certificate")?;
                ensure_trailing_newline(&mut pem);
                pem.extend(read_staged(staged.key_path(), "key")?);
                Ok(pem)
            }
            IdentitySource::InMemory { key_pem, cert_pem } => {
                let mut pem = cert_pem.as_bytes().to_vec();
                ensure_trailing_newline(&mut pem);
                pem.extend_from_slice(key_pem.as_bytes());
                Ok(pem)
            }
        }
    }
}

fn read_staged(path: &Path, label: &str) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        ClientError::tls_context(
            format!("Failed to read staged client {} {}", label, path.display()),
            e,
        )
    })
}

fn ensure_trailing_newline(pem: &mut Vec<u8>) {
    if !pem.is_empty() && !pem.ends_with(b"\n") {
        pem.push(b'\n');
    }
}

/// Secure transport trait
///
/// Implementations:
/// - HttpsTransport (sdk crate): reqwest blocking client over rustls
/// - mocks::RecordingTransport: in-process double for tests
pub trait SecureTransport: Send + Sync {
    /// Ready-to-use client bound to one identity
    type Context;

    /// Build a TLS context presenting `identity` for mutual authentication
    ///
    /// # Errors
    /// - ClientError::TlsContext on malformed PEM, mismatched pair or unreadable file
    fn build_context(&self, identity: IdentitySource<'_>) -> Result<Self::Context>;

    /// POST `body` to `endpoint` and decode the JSON response
    ///
    /// # Errors
    /// - ClientError::Transport on connection, handshake, HTTP status or decode failure
    fn transmit(&self, context: &Self::Context, endpoint: &str, body: &[u8])
        -> Result<RpcResponse>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Mock transport behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Return this response from transmit
        Respond(serde_json::Value),
        /// Fail in build_context
        FailContext(String),
        /// Fail in transmit
        FailTransport(String),
    }

    /// What the transport saw during one call
    #[derive(Debug, Clone, Default)]
    pub struct ObservedCall {
        pub endpoint: String,
        pub body: Vec<u8>,
        /// PEM buffer produced by `IdentitySource::read_pem`
        pub identity_pem: Vec<u8>,
        /// (key, cert) paths when the identity was staged
        pub staged_paths: Option<(PathBuf, PathBuf)>,
        /// Whether both staged files existed while the request was in flight
        pub files_present_during_transmit: bool,
    }

    /// Context produced by the mock: carries observations to transmit
    #[derive(Debug, Clone)]
    pub struct MockContext {
        identity_pem: Vec<u8>,
        staged_paths: Option<(PathBuf, PathBuf)>,
    }

    /// Transport double that records every call
    pub struct RecordingTransport {
        behavior: MockBehavior,
        contexts_built: Mutex<usize>,
        calls: Mutex<Vec<ObservedCall>>,
    }

    impl RecordingTransport {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior,
                contexts_built: Mutex::new(0),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn responding(response: serde_json::Value) -> Self {
            Self::new(MockBehavior::Respond(response))
        }

        pub fn contexts_built(&self) -> usize {
            *self.contexts_built.lock().unwrap()
        }

        pub fn calls(&self) -> Vec<ObservedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl SecureTransport for RecordingTransport {
        type Context = MockContext;

        fn build_context(&self, identity: IdentitySource<'_>) -> Result<MockContext> {
            *self.contexts_built.lock().unwrap() += 1;

            let identity_pem = identity.read_pem()?;
            let staged_paths = match identity {
                IdentitySource::Staged(staged) => Some((
                    staged.key_path().to_path_buf(),
                    staged.cert_path().to_path_buf(),
                )),
                IdentitySource::InMemory { .. } => None,
            };

            if let MockBehavior::FailContext(msg) = &self.behavior {
                return Err(ClientError::tls_context(
                    "Failed to create TLS context",
                    msg.clone(),
                ));
            }

            Ok(MockContext {
                identity_pem,
                staged_paths,
            })
        }

        fn transmit(
            &self,
            context: &MockContext,
            endpoint: &str,
            body: &[u8],
        ) -> Result<RpcResponse> {
            let files_present_during_transmit = context
                .staged_paths
                .as_ref()
                .map(|(key, cert)| key.exists() && cert.exists())
                .unwrap_or(false);

            self.calls.lock().unwrap().push(ObservedCall {
                endpoint: endpoint.to_string(),
                body: body.to_vec(),
                identity_pem: context.identity_pem.clone(),
                staged_paths: context.staged_paths.clone(),
                files_present_during_transmit,
            });

            match &self.behavior {
                MockBehavior::Respond(response) => Ok(response.clone()),
                MockBehavior::FailTransport(msg) => Err(ClientError::transport(
                    format!("Request to {} failed", endpoint),
                    msg.clone(),
                )),
                MockBehavior::FailContext(_) => unreachable!("context build fails first"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use uuid::Uuid;

    #[test]
    fn test_in_memory_pem_order() {
        let identity = IdentitySource::InMemory {
            key_pem: "KEY\n",
            cert_pem: "CERT",
        };

        assert_eq!(identity.read_pem().unwrap(), b"CERT\nKEY\n".to_vec());
    }

    #[test]
    fn test_staged_pem_reads_files() {
        let temp_dir = TempDir::new().unwrap();
        let call_id = Uuid::new_v4().to_string();
        let staged =
            StagedCredentials::stage(Some(temp_dir.path()), &call_id, "KEY\n", "CERT\n").unwrap();

        let pem = IdentitySource::Staged(&staged).read_pem().unwrap();
        assert_eq!(pem, b"CERT\nKEY\n".to_vec());
    }

    #[test]
    fn test_staged_pem_unreadable_file() {
        let temp_dir = TempDir::new().unwrap();
        let call_id = Uuid::new_v4().to_string();
        let staged =
            StagedCredentials::stage(Some(temp_dir.path()), &call_id, "KEY", "CERT").unwrap();
        std::fs::remove_file(staged.key_path()).unwrap();

        let err = IdentitySource::Staged(&staged).read_pem().unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::TlsContext);
        assert!(err.to_string().contains("client key"));
    }
}
