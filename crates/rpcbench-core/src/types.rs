//! Outgoing JSON-RPC 2.0 envelopes.
//!
//! Replies are never deserialized into a typed envelope: adapters keep the raw body as a
//! [`serde_json::Value`] so that a provider answering with a malformed or partial envelope can
//! still be scored instead of rejected.

use serde::Serialize;
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

/// A single call. Batches serialize as a JSON array of these.
///
/// ```
/// use rpcbench_core::types::JsonRpcRequest;
/// use serde_json::json;
///
/// let request = JsonRpcRequest::new("eth_chainId", json!([]), 3);
/// let wire = serde_json::to_string(&request).unwrap();
///
/// assert_eq!(wire, r#"{"jsonrpc":"2.0","method":"eth_chainId","params":[],"id":3}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub method: String,
    pub params: Value,
    pub id: u64,
}

impl JsonRpcRequest {
    #[must_use]
    pub fn new(method: impl Into<String>, params: Value, id: u64) -> Self {
        Self { jsonrpc: JSONRPC_VERSION, method: method.into(), params, id }
    }

    /// `count` identical calls numbered from 1.
    #[must_use]
    pub fn batch(method: &str, params: &Value, count: usize) -> Vec<Self> {
        (1..=count as u64).map(|id| Self::new(method, params.clone(), id)).collect()
    }
}
