//! JSON-RPC transports available in the browser.
//!
//! An injected EIP-1193 provider (`window.ethereum`) is preferred; without one
//! requests go straight to a node over `fetch`.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use js_sys::{Function, Object, Promise, Reflect};
use serde::Serialize;
use serde_json::Value;
use std::cell::Cell;
use std::time::Duration;
use sw_chain_client::RpcTransport;
use sw_chain_eth::RpcError;
use sw_chain_eth::jsonrpc::{JsonRpcRequest, decode_response};
use tracing::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::dom;

/// Wallet-injected provider object.
pub struct InjectedTransport {
    ethereum: JsValue,
}

impl InjectedTransport {
    pub fn detect() -> Option<Self> {
        let window = dom::window().ok()?;
        let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        if ethereum.is_undefined() || ethereum.is_null() {
            return None;
        }
        Some(Self { ethereum })
    }

    /// Ask the wallet to expose its accounts to this page.
    pub async fn connect(&self) -> Result<()> {
        self.request("eth_requestAccounts", Value::Array(Vec::new()))
            .await
            .map(|_| ())
    }
}

fn provider_error(method: &str, err: JsValue) -> anyhow::Error {
    let code = Reflect::get(&err, &JsValue::from_str("code"))
        .ok()
        .and_then(|v| v.as_f64());
    let message = Reflect::get(&err, &JsValue::from_str("message"))
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    match code {
        Some(code) => anyhow::Error::new(RpcError::Remote {
            code: code as i64,
            message,
        })
        .context(method.to_owned()),
        None => anyhow!("{method}: {message}"),
    }
}

#[async_trait(?Send)]
impl RpcTransport for InjectedTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let args = Object::new();
        let js_params = params
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| anyhow!("{method} params: {e}"))?;
        Reflect::set(&args, &JsValue::from_str("method"), &JsValue::from_str(method))
            .map_err(|e| provider_error(method, e))?;
        Reflect::set(&args, &JsValue::from_str("params"), &js_params)
            .map_err(|e| provider_error(method, e))?;

        let request_fn: Function = Reflect::get(&self.ethereum, &JsValue::from_str("request"))
            .map_err(|e| provider_error(method, e))?
            .dyn_into()
            .map_err(|_| anyhow!("injected provider has no request()"))?;
        let promise: Promise = request_fn
            .call1(&self.ethereum, &args)
            .map_err(|e| provider_error(method, e))?
            .dyn_into()
            .map_err(|_| anyhow!("{method}: request() did not return a promise"))?;

        let result = JsFuture::from(promise)
            .await
            .map_err(|e| provider_error(method, e))?;
        if result.is_undefined() || result.is_null() {
            return Ok(Value::Null);
        }
        serde_wasm_bindgen::from_value(result).map_err(|e| anyhow!("{method} result: {e}"))
    }

    async fn delay(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}

/// JSON-RPC 2.0 over `fetch` to a node endpoint.
pub struct FetchTransport {
    endpoint: String,
    next_id: Cell<u64>,
}

impl FetchTransport {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            next_id: Cell::new(1),
        }
    }
}

#[async_trait(?Send)]
impl RpcTransport for FetchTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let body = JsonRpcRequest::new(id, method, params);

        let response = gloo_net::http::Request::post(&self.endpoint)
            .json(&body)
            .with_context(|| format!("{method} encode"))?
            .send()
            .await
            .with_context(|| format!("{method} transport"))?;

        let status = response.status();
        let text = response.text().await.with_context(|| format!("{method} body"))?;
        if !response.ok() {
            anyhow::bail!("{method} HTTP {status}: {text}");
        }

        Ok(decode_response(method, &text)?)
    }

    async fn delay(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}

pub enum BrowserTransport {
    Injected(InjectedTransport),
    Fetch(FetchTransport),
}

impl BrowserTransport {
    /// Prefer the injected provider; otherwise fall back to `fallback_url`.
    pub async fn resolve(fallback_url: &str) -> Self {
        match InjectedTransport::detect() {
            Some(injected) => {
                info!("using injected provider; if no accounts appear, check the wallet extension is unlocked");
                if let Err(err) = injected.connect().await {
                    warn!("account access request was not granted: {err:#}");
                }
                BrowserTransport::Injected(injected)
            }
            None => {
                warn!(
                    "no injected provider detected; falling back to {fallback_url}. \
                     This fallback is for local development only"
                );
                BrowserTransport::Fetch(FetchTransport::new(fallback_url))
            }
        }
    }
}

#[async_trait(?Send)]
impl RpcTransport for BrowserTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        match self {
            BrowserTransport::Injected(t) => t.request(method, params).await,
            BrowserTransport::Fetch(t) => t.request(method, params).await,
        }
    }

    async fn delay(&self, duration: Duration) {
        match self {
            BrowserTransport::Injected(t) => t.delay(duration).await,
            BrowserTransport::Fetch(t) => t.delay(duration).await,
        }
    }
}
