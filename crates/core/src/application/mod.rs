// Application Layer - Use Cases

pub mod client;

// Re-exports
pub use client::SecureRpcClient;
