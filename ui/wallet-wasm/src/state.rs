//! Global application state.
//!
//! Uses `RefCell`-wrapped `thread_local!` storage (WASM is single-threaded).
//! Holds the one controller so exported functions and DOM listeners share it.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use sw_chain_eth::EthProvider;
use sw_wallet_core::WalletController;
use tracing::warn;

use crate::presenter::DomPresenter;
use crate::transport::BrowserTransport;

pub type BrowserController = WalletController<EthProvider<BrowserTransport>, DomPresenter>;

// ── Thread-local singleton ──

thread_local! {
    static CONTROLLER: RefCell<Option<Rc<BrowserController>>> = const { RefCell::new(None) };
}

pub fn controller() -> Option<Rc<BrowserController>> {
    CONTROLLER.with(|c| c.borrow().clone())
}

pub fn set_controller(controller: Rc<BrowserController>) {
    CONTROLLER.with(|c| *c.borrow_mut() = Some(controller));
}

/// Run `op` against the controller on the local executor.
///
/// Operations are fire-and-forget; each one reports through the page itself.
pub fn spawn<F, Fut>(operation: &'static str, op: F)
where
    F: FnOnce(Rc<BrowserController>) -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
{
    match controller() {
        Some(c) => wasm_bindgen_futures::spawn_local(op(c)),
        None => warn!(operation, "wallet controller is not initialised yet"),
    }
}
