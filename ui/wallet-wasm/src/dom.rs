//! DOM element bindings.
//!
//! Display slots and inputs are resolved once at startup. Action buttons and
//! the endpoint overrides are optional so pages that drive the exported
//! `App`-style functions from inline handlers keep working.

use sw_api_types::{DisplaySlot, InputField};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

// ── Helpers ──

fn doc() -> Option<Document> {
    web_sys::window()?.document()
}

pub fn by_id(id: &str) -> Option<Element> {
    doc()?.get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn set_inner_html(el: &Element, html: &str) {
    el.set_inner_html(html);
}

pub fn set_input_value(el: &HtmlInputElement, val: &str) {
    el.set_value(val);
}

pub fn get_input_value(el: &HtmlInputElement) -> String {
    el.value().trim().to_string()
}

pub fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

// ── Elements struct ──

/// All DOM element references used by the wallet page.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    // Display slots
    pub current_account: Element,
    pub wallet_balance: Element,
    pub allowed_to_send: Element,
    pub status: Element,

    // Inputs
    pub address_allow_sender: HtmlInputElement,
    pub amount_deposit: HtmlInputElement,
    pub amount_withdrawal: HtmlInputElement,
    pub address_withdrawal: HtmlInputElement,

    // Actions
    pub allow_sender_btn: Option<HtmlElement>,
    pub deposit_btn: Option<HtmlElement>,
    pub withdraw_btn: Option<HtmlElement>,
    pub refresh_balance_btn: Option<HtmlElement>,

    // Config
    pub rpc_url: Option<HtmlInputElement>,
    pub artifact_url: Option<HtmlInputElement>,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_input {
    ($id:expr) => {
        by_id_typed::<HtmlInputElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing input #{}", $id)))?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after the page has loaded.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            current_account: get_el!(DisplaySlot::CurrentAccount.element_id()),
            wallet_balance: get_el!(DisplaySlot::WalletBalance.element_id()),
            allowed_to_send: get_el!(DisplaySlot::AllowedToSend.element_id()),
            status: get_el!(DisplaySlot::Status.element_id()),

            address_allow_sender: get_input!(InputField::AddressAllowSender.element_id()),
            amount_deposit: get_input!(InputField::AmountDeposit.element_id()),
            amount_withdrawal: get_input!(InputField::AmountWithdrawal.element_id()),
            address_withdrawal: get_input!(InputField::AddressWithdrawal.element_id()),

            allow_sender_btn: by_id_typed("allowSenderBtn"),
            deposit_btn: by_id_typed("depositBtn"),
            withdraw_btn: by_id_typed("withdrawBtn"),
            refresh_balance_btn: by_id_typed("refreshBalanceBtn"),

            rpc_url: by_id_typed("rpcUrl"),
            artifact_url: by_id_typed("artifactUrl"),
        })
    }

    pub fn slot(&self, slot: DisplaySlot) -> &Element {
        match slot {
            DisplaySlot::CurrentAccount => &self.current_account,
            DisplaySlot::WalletBalance => &self.wallet_balance,
            DisplaySlot::AllowedToSend => &self.allowed_to_send,
            DisplaySlot::Status => &self.status,
        }
    }

    pub fn input(&self, field: InputField) -> &HtmlInputElement {
        match field {
            InputField::AddressAllowSender => &self.address_allow_sender,
            InputField::AmountDeposit => &self.amount_deposit,
            InputField::AmountWithdrawal => &self.amount_withdrawal,
            InputField::AddressWithdrawal => &self.address_withdrawal,
        }
    }
}
