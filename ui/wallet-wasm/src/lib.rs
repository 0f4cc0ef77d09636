//! SimpleWallet WASM Frontend
//!
//! Binds the wallet page to the client controller: resolves the provider,
//! loads the contract artifact, bootstraps the session and wires actions.

pub mod api;
pub mod config;
pub mod dom;
pub mod events;
pub mod logging;
pub mod presenter;
pub mod state;
pub mod transport;

use std::rc::Rc;

use sw_chain_eth::{ContractArtifact, EthProvider};
use sw_wallet_core::{ControllerConfig, WalletController};
use tracing::error;
use wasm_bindgen::prelude::*;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();
    logging::init();

    init().await
}

/// Main initialisation sequence.
async fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;
    let config = config::BrowserConfig::from_elements(&els);

    let artifact_text = api::fetch_text(&config.artifact_url).await.map_err(|e| {
        error!("could not load contract artifact from {}: {e}", config.artifact_url);
        JsValue::from_str(&e)
    })?;
    let artifact = ContractArtifact::from_json(&artifact_text)
        .and_then(|artifact| artifact.ensure_wallet_functions().map(|()| artifact))
        .map_err(|e| {
            error!("invalid contract artifact: {e:#}");
            JsValue::from_str(&format!("{e:#}"))
        })?;

    let transport = transport::BrowserTransport::resolve(&config.rpc_url).await;
    let controller = Rc::new(WalletController::new(
        EthProvider::new(transport, artifact),
        presenter::DomPresenter::new(els.clone()),
        ControllerConfig::default(),
    ));
    state::set_controller(Rc::clone(&controller));

    events::bind_events(&els)?;

    // Failures are already alerted and logged by the controller.
    let _ = controller.bootstrap().await;
    Ok(())
}

// ── Page-facing actions (callable from inline handlers) ──

#[wasm_bindgen(js_name = refreshBalance)]
pub fn refresh_balance() {
    state::spawn("refresh_balance", |c| async move {
        let _ = c.refresh_balance().await;
    });
}

#[wasm_bindgen(js_name = updateAddressAllowedToSend)]
pub fn update_address_allowed_to_send() {
    state::spawn("update_allowed_to_send", |c| async move {
        let _ = c.update_allowed_to_send().await;
    });
}

#[wasm_bindgen(js_name = allowSender)]
pub fn allow_sender() {
    state::spawn("allow_sender", |c| async move {
        let _ = c.allow_sender().await;
    });
}

#[wasm_bindgen(js_name = depositEther)]
pub fn deposit_ether() {
    state::spawn("deposit", |c| async move {
        let _ = c.deposit().await;
    });
}

#[wasm_bindgen(js_name = withdrawalEther)]
pub fn withdrawal_ether() {
    state::spawn("withdraw", |c| async move {
        let _ = c.withdraw().await;
    });
}
