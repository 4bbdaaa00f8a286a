// Domain Layer - Request/response shapes and client configuration

pub mod config;
pub mod request;

// Re-exports
pub use config::{ClientConfig, CredentialStaging, ParamsLayout};
pub use request::{RpcRequest, RpcResponse, JSONRPC_VERSION};
