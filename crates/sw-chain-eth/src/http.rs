use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use sw_chain_client::RpcTransport;

use crate::jsonrpc::{JsonRpcRequest, decode_response};

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// JSON-RPC over HTTP POST to a node.
///
/// Reads `SIMPLEWALLET_RPC_URL` from environment at construction time
/// (default: `http://127.0.0.1:8545`).
pub struct HttpTransport {
    endpoint: String,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl HttpTransport {
    pub fn new(endpoint: Option<String>) -> Self {
        let endpoint = endpoint
            .or_else(|| std::env::var("SIMPLEWALLET_RPC_URL").ok())
            .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait(?Send)]
impl RpcTransport for HttpTransport {
    async fn request(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = JsonRpcRequest::new(id, method, params);

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("{method} transport"))?;

        let status = response.status();
        let text = response.text().await.with_context(|| format!("{method} body"))?;
        if !status.is_success() {
            anyhow::bail!("{method} HTTP {status}: {text}");
        }

        Ok(decode_response(method, &text)?)
    }

    async fn delay(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
