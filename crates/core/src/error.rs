// Central Error Type for the Client
//
// Every failure of a call surfaces as one ClientError carrying a message and,
// except for argument errors, the underlying cause.

use thiserror::Error;

/// Boxed underlying cause (reqwest, io, serde_json, ...)
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure category of a client call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Empty or missing params; nothing was staged or sent
    InvalidArgument,
    /// Writing the ephemeral key/certificate files failed
    CredentialStaging,
    /// Building the mutual-TLS context failed
    TlsContext,
    /// Network, HTTP, handshake or response decoding failed
    Transport,
}

/// Client-level error type
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Credential staging error: {message}")]
    CredentialStaging {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TLS context error: {message}")]
    TlsContext {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: BoxError,
    },
}

impl ClientError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ClientError::InvalidArgument(message.into())
    }

    pub fn credential_staging(message: impl Into<String>, source: std::io::Error) -> Self {
        ClientError::CredentialStaging {
            message: message.into(),
            source,
        }
    }

    pub fn tls_context(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        ClientError::TlsContext {
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn transport(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        ClientError::Transport {
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            ClientError::CredentialStaging { .. } => ErrorKind::CredentialStaging,
            ClientError::TlsContext { .. } => ErrorKind::TlsContext,
            ClientError::Transport { .. } => ErrorKind::Transport,
        }
    }

    /// Message followed by the chain of underlying causes, for display to users
    pub fn detailed_message(&self) -> String {
        let mut message = self.to_string();
        let mut cause = std::error::Error::source(self);
        while let Some(err) = cause {
            message.push_str(": ");
            message.push_str(&err.to_string());
            cause = err.source();
        }
        message
    }
}

/// Result type alias using ClientError
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(
            ClientError::invalid_argument("empty").kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            ClientError::credential_staging("write", io::Error::other("disk full")).kind(),
            ErrorKind::CredentialStaging
        );
        assert_eq!(
            ClientError::tls_context("bad pem", "no private key").kind(),
            ErrorKind::TlsContext
        );
        assert_eq!(
            ClientError::transport("refused", io::Error::from(io::ErrorKind::ConnectionRefused))
                .kind(),
            ErrorKind::Transport
        );
    }

    #[test]
    fn test_source_is_preserved() {
        let err = ClientError::credential_staging(
            "failed to write client key",
            io::Error::new(io::ErrorKind::PermissionDenied, "read-only directory"),
        );
        let source = std::error::Error::source(&err).expect("source");
        assert!(source.to_string().contains("read-only directory"));
    }

    #[test]
    fn test_detailed_message_includes_cause() {
        let err = ClientError::transport("request to https://example.invalid failed", "timed out");
        let message = err.detailed_message();
        assert!(message.starts_with("Transport error: request to https://example.invalid failed"));
        assert!(message.ends_with(": timed out"));
    }
}
