//! Ethereum JSON-RPC implementation of [`WalletProvider`] for the
//! SimpleWallet contract.

pub mod abi;
pub mod artifact;
#[cfg(feature = "http")]
pub mod http;
pub mod jsonrpc;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use sw_api_types::{AccountAddress, ContractHandle, TxReceipt, Wei};
use sw_chain_client::{RpcTransport, TxOptions, WalletProvider};
use tracing::{debug, info, warn};

pub use artifact::ContractArtifact;
#[cfg(feature = "http")]
pub use http::{DEFAULT_RPC_URL, HttpTransport};
pub use jsonrpc::RpcError;

use abi::Token;

/// How writes wait for their receipt.
#[derive(Debug, Clone, Copy)]
pub struct ReceiptPolling {
    pub interval: Duration,
    /// `None` polls until the node reports a receipt.
    pub max_attempts: Option<u32>,
}

impl Default for ReceiptPolling {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            max_attempts: None,
        }
    }
}

pub struct EthProvider<T> {
    transport: T,
    artifact: ContractArtifact,
    address_override: Option<AccountAddress>,
    polling: ReceiptPolling,
}

impl<T: RpcTransport> EthProvider<T> {
    pub fn new(transport: T, artifact: ContractArtifact) -> Self {
        Self {
            transport,
            artifact,
            address_override: None,
            polling: ReceiptPolling::default(),
        }
    }

    /// Skip the artifact lookup and always use `address`.
    pub fn with_contract_address(mut self, address: AccountAddress) -> Self {
        self.address_override = Some(address);
        self
    }

    pub fn with_receipt_polling(mut self, polling: ReceiptPolling) -> Self {
        self.polling = polling;
        self
    }

    async fn call_str(&self, method: &str, params: Value) -> Result<String> {
        let value = self.transport.request(method, params).await?;
        value.as_str().map(str::to_owned).ok_or_else(|| {
            RpcError::Malformed {
                method: method.to_owned(),
                detail: format!("expected a string result, got {value}"),
            }
            .into()
        })
    }

    async fn send_transaction(&self, tx: Value) -> Result<TxReceipt> {
        let tx_hash = self
            .call_str("eth_sendTransaction", json!([tx]))
            .await
            .context("eth_sendTransaction")?;
        info!(%tx_hash, "transaction submitted");
        self.wait_for_receipt(&tx_hash).await
    }

    async fn wait_for_receipt(&self, tx_hash: &str) -> Result<TxReceipt> {
        let mut attempts: u32 = 0;
        loop {
            let value = self
                .transport
                .request("eth_getTransactionReceipt", json!([tx_hash]))
                .await
                .context("eth_getTransactionReceipt")?;

            if !value.is_null() {
                let raw: RawReceipt = serde_json::from_value(value).map_err(|err| RpcError::Malformed {
                    method: "eth_getTransactionReceipt".to_owned(),
                    detail: err.to_string(),
                })?;
                return raw.into_receipt(tx_hash);
            }

            attempts += 1;
            if let Some(max) = self.polling.max_attempts {
                if attempts >= max {
                    return Err(anyhow!("no receipt for {tx_hash} after {attempts} polls"));
                }
            }
            debug!(%tx_hash, attempts, "receipt pending");
            self.transport.delay(self.polling.interval).await;
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    block_number: Option<String>,
    #[serde(default)]
    gas_used: Option<String>,
}

impl RawReceipt {
    fn into_receipt(self, tx_hash: &str) -> Result<TxReceipt> {
        if let Some(status) = self.status.as_deref() {
            if quantity_u64(status) == Some(0) {
                return Err(RpcError::Reverted {
                    tx_hash: tx_hash.to_owned(),
                }
                .into());
            }
        }
        Ok(TxReceipt {
            tx_hash: tx_hash.to_owned(),
            block_number: self.block_number.as_deref().and_then(quantity_u64),
            gas_used: self.gas_used.as_deref().and_then(quantity_u64),
        })
    }
}

fn quantity_u64(text: &str) -> Option<u64> {
    let digits = text.strip_prefix("0x")?;
    u64::from_str_radix(digits, 16).ok()
}

fn transaction_object(opts: &TxOptions, to: &AccountAddress, data: Option<String>) -> Value {
    let mut tx = json!({
        "from": opts.from.as_str(),
        "to": to.as_str(),
    });
    if let Some(value) = opts.value {
        tx["value"] = Value::String(value.to_hex_quantity());
    }
    if let Some(gas) = opts.gas {
        tx["gas"] = Value::String(format!("{gas:#x}"));
    }
    if let Some(data) = data {
        tx["data"] = Value::String(data);
    }
    tx
}

#[async_trait(?Send)]
impl<T: RpcTransport> WalletProvider for EthProvider<T> {
    async fn accounts(&self) -> Result<Vec<AccountAddress>> {
        let value = self
            .transport
            .request("eth_accounts", json!([]))
            .await
            .context("eth_accounts")?;
        let accounts: Vec<String> = serde_json::from_value(value).map_err(|err| RpcError::Malformed {
            method: "eth_accounts".to_owned(),
            detail: err.to_string(),
        })?;
        Ok(accounts.into_iter().map(AccountAddress).collect())
    }

    async fn deployed(&self) -> Result<ContractHandle> {
        let network_id = self
            .call_str("net_version", json!([]))
            .await
            .context("net_version")?;

        if let Some(address) = &self.address_override {
            return Ok(ContractHandle {
                address: address.clone(),
                network_id,
            });
        }

        let Some(address) = self.artifact.address_for(&network_id) else {
            warn!(%network_id, "artifact has no deployment for this network");
            return Err(anyhow!(
                "{} has not been deployed to detected network (network/artifact mismatch)",
                self.artifact.contract_name
            ));
        };
        Ok(ContractHandle { address, network_id })
    }

    async fn balance_of(&self, address: &AccountAddress) -> Result<Wei> {
        let quantity = self
            .call_str("eth_getBalance", json!([address.as_str(), "latest"]))
            .await
            .context("eth_getBalance")?;
        Ok(Wei::from_hex_quantity(&quantity)?)
    }

    async fn is_allowed_to_send(
        &self,
        contract: &ContractHandle,
        account: &AccountAddress,
        from: &AccountAddress,
    ) -> Result<bool> {
        let data = abi::encode_call(abi::IS_ALLOWED_TO_SEND, &[Token::Address(account)])?;
        let call = json!({
            "from": from.as_str(),
            "to": contract.address.as_str(),
            "data": data,
        });
        let result = self
            .call_str("eth_call", json!([call, "latest"]))
            .await
            .context("eth_call isAllowedToSend")?;
        abi::decode_bool(&result)
    }

    async fn allow_address_to_send(
        &self,
        contract: &ContractHandle,
        receiver: &AccountAddress,
        opts: &TxOptions,
    ) -> Result<TxReceipt> {
        let data = abi::encode_call(abi::ALLOW_ADDRESS_TO_SEND_MONEY, &[Token::Address(receiver)])?;
        self.send_transaction(transaction_object(opts, &contract.address, Some(data)))
            .await
    }

    async fn deposit(&self, contract: &ContractHandle, opts: &TxOptions) -> Result<TxReceipt> {
        self.send_transaction(transaction_object(opts, &contract.address, None))
            .await
    }

    async fn send_funds(
        &self,
        contract: &ContractHandle,
        amount: Wei,
        destination: &AccountAddress,
        opts: &TxOptions,
    ) -> Result<TxReceipt> {
        let data = abi::encode_call(
            abi::SEND_FUNDS,
            &[Token::Uint(amount), Token::Address(destination)],
        )?;
        self.send_transaction(transaction_object(opts, &contract.address, Some(data)))
            .await
    }
}

#[cfg(all(test, feature = "http"))]
mod tests {
    use super::*;
    use serde_json::json;
    use sw_api_types::WEI_PER_ETHER;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CONTRACT: &str = "0x345ca3e014aaf5dca488057592ee47305d9b3e10";
    const OWNER: &str = "0x627306090abab3a6e1400e9345bc60c78a8bef57";
    const TX_HASH: &str = "0x8a3c5b1e7f0d9a2b4c6e8f0a1b3d5c7e9f1a2b4c6d8e0f1a3b5c7d9e1f2a3b4c";

    fn artifact() -> ContractArtifact {
        ContractArtifact::from_json(&format!(
            r#"{{"contractName":"SimpleWallet","networks":{{"5777":{{"address":"{CONTRACT}"}}}}}}"#
        ))
        .unwrap()
    }

    fn rpc_ok(result: Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": result}))
    }

    async fn mock_method(server: &MockServer, rpc_method: &str, result: Value) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": rpc_method})))
            .respond_with(rpc_ok(result))
            .mount(server)
            .await;
    }

    async fn setup() -> (MockServer, EthProvider<HttpTransport>) {
        let server = MockServer::start().await;
        mock_method(&server, "net_version", json!("5777")).await;
        let provider = EthProvider::new(HttpTransport::new(Some(server.uri())), artifact())
            .with_receipt_polling(ReceiptPolling {
                interval: Duration::from_millis(5),
                max_attempts: Some(20),
            });
        (server, provider)
    }

    fn sent_transaction(requests: &[wiremock::Request]) -> Value {
        requests
            .iter()
            .filter_map(|r| serde_json::from_slice::<Value>(&r.body).ok())
            .find(|body| body["method"] == "eth_sendTransaction")
            .map(|body| body["params"][0].clone())
            .expect("eth_sendTransaction should have been called")
    }

    #[tokio::test]
    async fn discovers_accounts_in_order() {
        let (server, provider) = setup().await;
        mock_method(&server, "eth_accounts", json!([OWNER, CONTRACT])).await;

        let accounts = provider.accounts().await.unwrap();
        assert_eq!(
            accounts,
            vec![AccountAddress(OWNER.to_owned()), AccountAddress(CONTRACT.to_owned())]
        );
    }

    #[tokio::test]
    async fn resolves_deployed_instance_from_artifact() {
        let (_server, provider) = setup().await;
        let handle = provider.deployed().await.unwrap();
        assert_eq!(handle.address.as_str(), CONTRACT);
        assert_eq!(handle.network_id, "5777");
    }

    #[tokio::test]
    async fn deployed_fails_on_unknown_network() {
        let server = MockServer::start().await;
        mock_method(&server, "net_version", json!("1")).await;
        let provider = EthProvider::new(HttpTransport::new(Some(server.uri())), artifact());

        let err = provider.deployed().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "SimpleWallet has not been deployed to detected network (network/artifact mismatch)"
        );
    }

    #[tokio::test]
    async fn reads_balance_as_wei() {
        let (server, provider) = setup().await;
        mock_method(&server, "eth_getBalance", json!("0x1bc16d674ec80000")).await;

        let balance = provider
            .balance_of(&AccountAddress(CONTRACT.to_owned()))
            .await
            .unwrap();
        assert_eq!(balance, Wei::from(2 * WEI_PER_ETHER));
    }

    #[tokio::test]
    async fn http_error_status_carries_response_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("upstream node offline"))
            .mount(&server)
            .await;
        let transport = HttpTransport::new(Some(server.uri()));

        let err = transport.request("eth_accounts", json!([])).await.unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("eth_accounts HTTP 502"));
        assert!(message.contains("upstream node offline"));
    }

    #[tokio::test]
    async fn reads_balance_wider_than_u128() {
        let (server, provider) = setup().await;
        mock_method(&server, "eth_getBalance", json!("0x100000000000000000000000000000000")).await;

        let balance = provider
            .balance_of(&AccountAddress(CONTRACT.to_owned()))
            .await
            .unwrap();
        assert_eq!(balance.to_ether_string(), "340282366920938463463.374607431768211456");
    }

    #[tokio::test]
    async fn queries_permission_with_caller_context() {
        let (server, provider) = setup().await;
        mock_method(&server, "eth_call", json!(format!("0x{}1", "0".repeat(63)))).await;

        let handle = provider.deployed().await.unwrap();
        let owner = AccountAddress(OWNER.to_owned());
        assert!(provider.is_allowed_to_send(&handle, &owner, &owner).await.unwrap());

        let requests = server.received_requests().await.unwrap();
        let call = requests
            .iter()
            .filter_map(|r| serde_json::from_slice::<Value>(&r.body).ok())
            .find(|body| body["method"] == "eth_call")
            .unwrap();
        assert_eq!(call["params"][0]["from"], OWNER);
        assert_eq!(call["params"][0]["to"], CONTRACT);
        assert_eq!(call["params"][1], "latest");
    }

    #[tokio::test]
    async fn send_funds_waits_for_receipt_and_carries_gas() {
        let (server, provider) = setup().await;
        mock_method(&server, "eth_sendTransaction", json!(TX_HASH)).await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "eth_getTransactionReceipt"})))
            .respond_with(rpc_ok(Value::Null))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;
        mock_method(
            &server,
            "eth_getTransactionReceipt",
            json!({"transactionHash": TX_HASH, "status": "0x1", "blockNumber": "0x10", "gasUsed": "0x5208"}),
        )
        .await;

        let handle = provider.deployed().await.unwrap();
        let opts = TxOptions::sender(&AccountAddress(OWNER.to_owned())).with_gas(1_000_000);
        let receipt = provider
            .send_funds(&handle, Wei::from(WEI_PER_ETHER), &AccountAddress(OWNER.to_owned()), &opts)
            .await
            .unwrap();

        assert_eq!(receipt.tx_hash, TX_HASH);
        assert_eq!(receipt.block_number, Some(16));
        assert_eq!(receipt.gas_used, Some(21_000));

        let requests = server.received_requests().await.unwrap();
        let tx = sent_transaction(&requests);
        assert_eq!(tx["gas"], "0xf4240");
        assert_eq!(tx["to"], CONTRACT);
        assert!(tx.get("value").is_none());
        assert!(tx["data"]
            .as_str()
            .unwrap()
            .starts_with(&format!("0x{}", hex::encode(abi::selector(abi::SEND_FUNDS)))));
    }

    #[tokio::test]
    async fn deposit_is_plain_value_transfer() {
        let (server, provider) = setup().await;
        mock_method(&server, "eth_sendTransaction", json!(TX_HASH)).await;
        mock_method(&server, "eth_getTransactionReceipt", json!({"status": "0x1"})).await;

        let handle = provider.deployed().await.unwrap();
        let opts = TxOptions::sender(&AccountAddress(OWNER.to_owned()))
            .with_value(Wei::from(1_500_000_000_000_000_000));
        provider.deposit(&handle, &opts).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let tx = sent_transaction(&requests);
        assert_eq!(tx["value"], "0x14d1120d7b160000");
        assert!(tx.get("data").is_none());
    }

    #[tokio::test]
    async fn reverted_receipt_is_an_error() {
        let (server, provider) = setup().await;
        mock_method(&server, "eth_sendTransaction", json!(TX_HASH)).await;
        mock_method(&server, "eth_getTransactionReceipt", json!({"status": "0x0"})).await;

        let handle = provider.deployed().await.unwrap();
        let opts = TxOptions::sender(&AccountAddress(OWNER.to_owned()));
        let err = provider
            .allow_address_to_send(&handle, &AccountAddress(OWNER.to_owned()), &opts)
            .await
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<RpcError>(), Some(RpcError::Reverted { .. })));
    }

    #[tokio::test]
    async fn remote_error_surfaces_without_receipt_polling() {
        let (server, provider) = setup().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "eth_sendTransaction"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": {"code": -32000, "message": "sender account not recognized"}
            })))
            .mount(&server)
            .await;

        let handle = provider.deployed().await.unwrap();
        let opts = TxOptions::sender(&AccountAddress(OWNER.to_owned()));
        let err = provider.deposit(&handle, &opts).await.unwrap_err();
        assert!(format!("{err:#}").contains("sender account not recognized"));

        let requests = server.received_requests().await.unwrap();
        assert!(!requests.iter().any(|r| {
            serde_json::from_slice::<Value>(&r.body)
                .map(|b| b["method"] == "eth_getTransactionReceipt")
                .unwrap_or(false)
        }));
    }

    #[tokio::test]
    async fn malformed_receiver_never_reaches_the_node() {
        let (server, provider) = setup().await;
        let handle = provider.deployed().await.unwrap();
        let opts = TxOptions::sender(&AccountAddress(OWNER.to_owned()));

        let result = provider
            .allow_address_to_send(&handle, &AccountAddress("bob".to_owned()), &opts)
            .await;
        assert!(result.is_err());

        let requests = server.received_requests().await.unwrap();
        assert!(requests.iter().all(|r| {
            serde_json::from_slice::<Value>(&r.body)
                .map(|b| b["method"] != "eth_sendTransaction")
                .unwrap_or(true)
        }));
    }
}
