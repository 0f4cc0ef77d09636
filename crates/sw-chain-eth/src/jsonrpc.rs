//! JSON-RPC 2.0 envelopes shared by every transport.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("rpc error {code}: {message}")]
    Remote { code: i64, message: String },
    #[error("malformed rpc response to {method}: {detail}")]
    Malformed { method: String, detail: String },
    #[error("transaction {tx_hash} reverted")]
    Reverted { tx_hash: String },
}

#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

impl<'a> JsonRpcRequest<'a> {
    pub fn new(id: u64, method: &'a str, params: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcErrorObject>,
}

impl JsonRpcResponse {
    /// Unwrap the envelope; an absent or `null` result becomes `Value::Null`.
    pub fn into_result(self) -> Result<Value, RpcError> {
        if let Some(err) = self.error {
            return Err(RpcError::Remote {
                code: err.code,
                message: err.message,
            });
        }
        Ok(self.result.unwrap_or(Value::Null))
    }
}

/// Decode a raw response body for `method`.
pub fn decode_response(method: &str, body: &str) -> Result<Value, RpcError> {
    let response: JsonRpcResponse =
        serde_json::from_str(body).map_err(|err| RpcError::Malformed {
            method: method.to_owned(),
            detail: err.to_string(),
        })?;
    response.into_result()
}
