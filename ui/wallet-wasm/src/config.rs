//! Page-level configuration.
//!
//! Priority for each value: user-supplied input → built-in default.

use crate::dom::{self, Elements};

/// Node used when the browser has no injected provider.
pub const FALLBACK_RPC_URL: &str = "http://127.0.0.1:8545";

/// Truffle build output served next to the page.
pub const DEFAULT_ARTIFACT_URL: &str = "contracts/SimpleWallet.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    pub rpc_url: String,
    pub artifact_url: String,
}

impl BrowserConfig {
    pub fn from_elements(els: &Elements) -> Self {
        let rpc = els.rpc_url.as_ref().map(dom::get_input_value);
        let artifact = els.artifact_url.as_ref().map(dom::get_input_value);
        Self::resolve(rpc.as_deref(), artifact.as_deref())
    }

    pub fn resolve(rpc_url: Option<&str>, artifact_url: Option<&str>) -> Self {
        let rpc_url = rpc_url
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|| FALLBACK_RPC_URL.to_string());
        let artifact_url = artifact_url
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_ARTIFACT_URL)
            .to_string();
        Self {
            rpc_url,
            artifact_url,
        }
    }
}
