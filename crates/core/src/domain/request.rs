// JSON-RPC Request Body
//
// Built fresh for every call and never reused.

use serde_json::{Map, Value};

use super::config::ParamsLayout;
use crate::error::{ClientError, Result};

pub const JSONRPC_VERSION: &str = "2.0";

/// Request id used by the nested layout (each call is independent)
pub const NESTED_REQUEST_ID: u64 = 1;

/// Decoded response body, returned to the caller verbatim
pub type RpcResponse = Value;

/// A single JSON-RPC call
#[derive(Debug, Clone, PartialEq)]
pub struct RpcRequest {
    method: String,
    params: Map<String, Value>,
    layout: ParamsLayout,
}

impl RpcRequest {
    /// Create a request, rejecting empty params
    pub fn new(
        method: impl Into<String>,
        params: Map<String, Value>,
        layout: ParamsLayout,
    ) -> Result<Self> {
        if params.is_empty() {
            return Err(ClientError::invalid_argument(
                "Parameters cannot be empty",
            ));
        }

        Ok(Self {
            method: method.into(),
            params,
            layout,
        })
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    /// Request object as sent on the wire.
    ///
    /// In the flat layout params are inserted after `jsonrpc`/`method`, so a
    /// colliding param key replaces the envelope value.
    pub fn to_body(&self) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("jsonrpc".to_string(), Value::from(JSONRPC_VERSION));
        body.insert("method".to_string(), Value::from(self.method.clone()));

        match self.layout {
            ParamsLayout::Flat => {
                for (key, value) in &self.params {
                    body.insert(key.clone(), value.clone());
                }
            }
            ParamsLayout::Nested => {
                body.insert("params".to_string(), Value::Object(self.params.clone()));
                body.insert("id".to_string(), Value::from(NESTED_REQUEST_ID));
            }
        }

        body
    }

    /// Compact UTF-8 JSON, keys in sorted order
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(&self.to_body()).map_err(|e| {
            ClientError::invalid_argument(format!("Request body could not be serialized: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn test_empty_params_rejected() {
        let result = RpcRequest::new("auth.check", Map::new(), ParamsLayout::Flat);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_flat_body_keys() {
        let request = RpcRequest::new(
            "auth.check",
            params(json!({"id": 1, "user": "alice"})),
            ParamsLayout::Flat,
        )
        .unwrap();

        let body = request.to_body();
        let mut keys: Vec<&str> = body.keys().map(String::as_str).collect();
        keys.sort_unstable();

        assert_eq!(keys, vec!["id", "jsonrpc", "method", "user"]);
        assert_eq!(body["jsonrpc"], json!("2.0"));
        assert_eq!(body["method"], json!("auth.check"));
        assert_eq!(body["id"], json!(1));
    }

    #[test]
    fn test_flat_params_win_on_collision() {
        let request = RpcRequest::new(
            "auth.check",
            params(json!({"method": "override", "jsonrpc": "1.0", "id": 7})),
            ParamsLayout::Flat,
        )
        .unwrap();

        let body = request.to_body();
        assert_eq!(body.len(), 3);
        assert_eq!(body["method"], json!("override"));
        assert_eq!(body["jsonrpc"], json!("1.0"));
    }

    #[test]
    fn test_nested_layout() {
        let request = RpcRequest::new(
            "auth.check",
            params(json!({"method": "inner"})),
            ParamsLayout::Nested,
        )
        .unwrap();

        let body = Value::Object(request.to_body());
        assert_eq!(
            body,
            json!({
                "jsonrpc": "2.0",
                "method": "auth.check",
                "params": {"method": "inner"},
                "id": 1
            })
        );
    }

    #[test]
    fn test_bytes_are_canonical() {
        let request = RpcRequest::new(
            "ping",
            params(json!({"zeta": true, "alpha": "ü"})),
            ParamsLayout::Flat,
        )
        .unwrap();

        let bytes = request.to_bytes().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            r#"{"alpha":"ü","jsonrpc":"2.0","method":"ping","zeta":true}"#
        );
    }
}
