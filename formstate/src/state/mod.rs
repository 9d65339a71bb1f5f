//! Validation state and its observable store.

mod snapshot;
mod store;

pub use snapshot::FormSnapshot;
pub use store::{StateStore, Subscription};

use std::collections::BTreeMap;

use serde::Serialize;

use crate::event::Event;
use crate::value::Value;

/// Errors keyed by field name, one map per event.
///
/// A missing key means "no error" for that (event, field). Clearing an
/// error removes the key; nothing ever stores an empty placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventErrors {
    pub change: BTreeMap<String, String>,
    pub blur: BTreeMap<String, String>,
    pub submit: BTreeMap<String, String>,
}

impl EventErrors {
    /// Errors recorded for `event`.
    pub fn for_event(&self, event: Event) -> &BTreeMap<String, String> {
        match event {
            Event::Change => &self.change,
            Event::Blur => &self.blur,
            Event::Submit => &self.submit,
        }
    }

    fn for_event_mut(&mut self, event: Event) -> &mut BTreeMap<String, String> {
        match event {
            Event::Change => &mut self.change,
            Event::Blur => &mut self.blur,
            Event::Submit => &mut self.submit,
        }
    }

    /// Error recorded for `field` on `event`.
    pub fn get(&self, event: Event, field: &str) -> Option<&str> {
        self.for_event(event).get(field).map(String::as_str)
    }

    /// Record or clear the error for `field` on `event`.
    pub fn set(&mut self, event: Event, field: &str, error: Option<String>) {
        let errors = self.for_event_mut(event);
        match error {
            Some(error) => {
                errors.insert(field.to_string(), error);
            }
            None => {
                errors.remove(field);
            }
        }
    }

    /// Whether no event has any error.
    pub fn is_empty(&self) -> bool {
        Event::ALL.iter().all(|&event| self.for_event(event).is_empty())
    }
}

/// First error for `field`, scanning events in declaration order.
///
/// Returns an empty string when the field has no error.
pub fn field_error(errors: &EventErrors, field: &str) -> String {
    Event::ALL
        .iter()
        .find_map(|&event| errors.get(event, field))
        .map(str::to_string)
        .unwrap_or_default()
}

/// Mutable state of one form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationState {
    /// Current field values. Written by the input side, read by validators.
    pub values: BTreeMap<String, Value>,
    /// Errors per event.
    pub errors: EventErrors,
    /// Fields awaiting a pending validator, one entry per pending run.
    pub validating: Vec<String>,
    /// Registered fields in registration order.
    pub fields: Vec<String>,
}

impl ValidationState {
    /// Current value of `field` (`Value::Empty` if unset).
    pub fn value(&self, field: &str) -> Value {
        self.values.get(field).cloned().unwrap_or_default()
    }

    /// Whether at least one run for `field` is awaiting a validator.
    pub fn is_field_validating(&self, field: &str) -> bool {
        self.validating.iter().any(|f| f == field)
    }

    /// Whether `field` is registered.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    pub(crate) fn start_validating(&mut self, field: &str) {
        self.validating.push(field.to_string());
    }

    pub(crate) fn finish_validating(&mut self, field: &str) {
        if let Some(index) = self.validating.iter().position(|f| f == field) {
            self.validating.remove(index);
        }
    }
}
