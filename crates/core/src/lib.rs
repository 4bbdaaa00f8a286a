// mtls-rpc Core - Domain Logic & Ports
// NO network dependencies: transports plug in through port::SecureTransport

pub mod application;
pub mod credentials;
pub mod domain;
pub mod error;
pub mod port;

pub use application::SecureRpcClient;
pub use domain::{ClientConfig, CredentialStaging, ParamsLayout, RpcRequest, RpcResponse};
pub use error::{ClientError, ErrorKind, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
