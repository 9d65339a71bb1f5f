//! Derived, read-only view of the form state handed to observers.

use std::ops::Deref;

use serde::Serialize;

use super::{ValidationState, field_error};

/// Read-only view of a form: its state plus derived flags.
///
/// Built by the store after every update; nothing else computes the flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormSnapshot {
    #[serde(flatten)]
    pub state: ValidationState,
    /// At least one field is awaiting a pending validator.
    pub is_validating: bool,
    /// At least one event has at least one error.
    pub in_error: bool,
}

impl FormSnapshot {
    pub(crate) fn derive(state: ValidationState) -> Self {
        let is_validating = !state.validating.is_empty();
        let in_error = !state.errors.is_empty();
        Self {
            state,
            is_validating,
            in_error,
        }
    }

    /// The error to display for `field`, or an empty string.
    pub fn field_error(&self, field: &str) -> String {
        field_error(&self.state.errors, field)
    }
}

impl Deref for FormSnapshot {
    type Target = ValidationState;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}
