use sw_api_types::{DisplaySlot, InputField};
use sw_wallet_core::Presenter;
use tracing::warn;

use crate::dom::{self, Elements};

/// Writes display slots into the page and reads the wallet form inputs.
pub struct DomPresenter {
    els: Elements,
}

impl DomPresenter {
    pub fn new(els: Elements) -> Self {
        Self { els }
    }
}

impl Presenter for DomPresenter {
    fn input(&self, field: InputField) -> String {
        dom::get_input_value(self.els.input(field))
    }

    fn clear_input(&self, field: InputField) {
        dom::set_input_value(self.els.input(field), "");
    }

    fn render(&self, slot: DisplaySlot, content: &str) {
        dom::set_inner_html(self.els.slot(slot), content);
    }

    fn alert(&self, message: &str) {
        let shown = dom::window().and_then(|w| w.alert_with_message(message));
        if let Err(err) = shown {
            warn!("alert could not be shown ({err:?}): {message}");
        }
    }
}
