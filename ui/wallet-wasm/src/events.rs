//! Event binding.
//!
//! Wires the optional action buttons to controller operations. Each click
//! spawns an independent task via `wasm_bindgen_futures::spawn_local`.

use crate::dom::Elements;
use crate::state;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Helper: attach an async click handler that runs one controller operation.
macro_rules! on_click_op {
    ($el:expr, $op:ident) => {{
        if let Some(el) = &$el {
            let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
                state::spawn(stringify!($op), |c| async move {
                    let _ = c.$op().await;
                });
            }) as Box<dyn FnMut(_)>);
            el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
            cb.forget();
        }
    }};
}

/// Bind all UI event listeners. Call once after the controller is stored.
pub fn bind_events(els: &Elements) -> Result<(), JsValue> {
    on_click_op!(els.allow_sender_btn, allow_sender);
    on_click_op!(els.deposit_btn, deposit);
    on_click_op!(els.withdraw_btn, withdraw);
    on_click_op!(els.refresh_balance_btn, refresh_balance);
    Ok(())
}
