//! Truffle build artifacts and deployed-instance lookup.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::HashMap;
use sw_api_types::AccountAddress;

use crate::abi;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    pub contract_name: String,
    #[serde(default)]
    pub abi: Vec<serde_json::Value>,
    #[serde(default)]
    pub networks: HashMap<String, NetworkDeployment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkDeployment {
    pub address: String,
}

impl ContractArtifact {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parse contract artifact")
    }

    /// Address of the instance deployed on `network_id`, if any.
    pub fn address_for(&self, network_id: &str) -> Option<AccountAddress> {
        self.networks
            .get(network_id)
            .map(|deployment| AccountAddress(deployment.address.clone()))
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.abi.iter().any(|entry| {
            entry.get("type").and_then(|t| t.as_str()) == Some("function")
                && entry.get("name").and_then(|n| n.as_str()) == Some(name)
        })
    }

    /// Fail unless the ABI declares every function the wallet calls.
    pub fn ensure_wallet_functions(&self) -> Result<()> {
        let missing: Vec<&str> = abi::WALLET_FUNCTIONS
            .iter()
            .map(|signature| abi::function_name(signature))
            .filter(|name| !self.has_function(name))
            .collect();
        if !missing.is_empty() {
            bail!(
                "{} artifact is missing functions: {}",
                self.contract_name,
                missing.join(", ")
            );
        }
        Ok(())
    }
}
