//! Presentation seam: named inputs in, named display slots and alerts out.

use std::cell::RefCell;
use std::collections::HashMap;
use sw_api_types::{DisplaySlot, InputField};

/// Implementations use interior mutability; the controller only holds `&self`.
pub trait Presenter {
    /// Current raw value of an input, unvalidated.
    fn input(&self, field: InputField) -> String;
    fn clear_input(&self, field: InputField);
    fn render(&self, slot: DisplaySlot, content: &str);
    /// Blocking user-facing dialog.
    fn alert(&self, message: &str);
}

/// Presenter that keeps everything in memory, for headless use and tests.
#[derive(Debug, Default)]
pub struct InMemoryPresenter {
    inputs: RefCell<HashMap<InputField, String>>,
    slots: RefCell<HashMap<DisplaySlot, String>>,
    writes: RefCell<Vec<(DisplaySlot, String)>>,
    alerts: RefCell<Vec<String>>,
}

impl InMemoryPresenter {
    pub fn set_input(&self, field: InputField, value: &str) {
        self.inputs.borrow_mut().insert(field, value.to_owned());
    }

    pub fn input_value(&self, field: InputField) -> String {
        self.inputs.borrow().get(&field).cloned().unwrap_or_default()
    }

    pub fn slot(&self, slot: DisplaySlot) -> Option<String> {
        self.slots.borrow().get(&slot).cloned()
    }

    /// Seed a slot without recording a write.
    pub fn preset_slot(&self, slot: DisplaySlot, content: &str) {
        self.slots.borrow_mut().insert(slot, content.to_owned());
    }

    /// Every content written to `slot`, oldest first.
    pub fn writes_to(&self, slot: DisplaySlot) -> Vec<String> {
        self.writes
            .borrow()
            .iter()
            .filter(|(s, _)| *s == slot)
            .map(|(_, content)| content.clone())
            .collect()
    }

    /// Forget recorded writes; slot contents stay as they are.
    pub fn clear_writes(&self) {
        self.writes.borrow_mut().clear();
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl Presenter for InMemoryPresenter {
    fn input(&self, field: InputField) -> String {
        self.input_value(field)
    }

    fn clear_input(&self, field: InputField) {
        self.inputs.borrow_mut().insert(field, String::new());
    }

    fn render(&self, slot: DisplaySlot, content: &str) {
        self.slots.borrow_mut().insert(slot, content.to_owned());
        self.writes.borrow_mut().push((slot, content.to_owned()));
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_owned());
    }
}
