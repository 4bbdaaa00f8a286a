// Port Layer - Interfaces for external dependencies

pub mod id_provider; // For deterministic testing
pub mod secure_transport;

// Re-exports
pub use id_provider::{CallIdProvider, UuidProvider};
pub use secure_transport::{IdentitySource, SecureTransport};
