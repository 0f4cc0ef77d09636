use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use sw_api_types::{AccountAddress, ContractHandle, TxReceipt, Wei};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOptions {
    pub from: AccountAddress,
    pub value: Option<Wei>,
    pub gas: Option<u64>,
}

impl TxOptions {
    pub fn sender(account: &AccountAddress) -> Self {
        Self {
            from: account.clone(),
            value: None,
            gas: None,
        }
    }

    pub fn with_value(mut self, value: Wei) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }
}

/// Account discovery, contract resolution, and the wallet contract's
/// read queries and write calls.
///
/// Futures are `?Send`: the browser runs everything on one cooperative
/// thread and the injected provider hands back non-`Send` JS promises.
#[async_trait(?Send)]
pub trait WalletProvider {
    async fn accounts(&self) -> Result<Vec<AccountAddress>>;
    async fn deployed(&self) -> Result<ContractHandle>;
    async fn balance_of(&self, address: &AccountAddress) -> Result<Wei>;
    async fn is_allowed_to_send(
        &self,
        contract: &ContractHandle,
        account: &AccountAddress,
        from: &AccountAddress,
    ) -> Result<bool>;
    async fn allow_address_to_send(
        &self,
        contract: &ContractHandle,
        receiver: &AccountAddress,
        opts: &TxOptions,
    ) -> Result<TxReceipt>;
    async fn deposit(&self, contract: &ContractHandle, opts: &TxOptions) -> Result<TxReceipt>;
    async fn send_funds(
        &self,
        contract: &ContractHandle,
        amount: Wei,
        destination: &AccountAddress,
        opts: &TxOptions,
    ) -> Result<TxReceipt>;
}

/// Raw JSON-RPC channel to a node or an injected wallet.
#[async_trait(?Send)]
pub trait RpcTransport {
    async fn request(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value>;

    /// Suspend the caller between receipt polls.
    async fn delay(&self, duration: Duration);
}
