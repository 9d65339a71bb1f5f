//! Registry of live validators and per-field run generations.
//!
//! The registry tracks:
//! - All registered validators, in registration order
//! - The latest run generation of every field (including `"form"`)
//!
//! Field names themselves live in [`ValidationState::fields`] so that
//! subscribers see them; the engine keeps the two in step.
//!
//! [`ValidationState::fields`]: crate::state::ValidationState::fields

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use crate::FORM_FIELD;
use crate::engine::{FormInner, FormState};
use crate::event::Event;
use crate::validator::{ValidatorDescriptor, ValidatorId};

/// Validators and run generations of one form.
#[derive(Debug)]
pub struct Registry {
    /// Active validators in registration order.
    validators: Vec<Arc<ValidatorDescriptor>>,

    /// Latest run generation per field.
    runs: HashMap<String, RunSlot>,

    /// Source of run generations. Shared by all fields so that a field
    /// which is unregistered and registered again never reuses a token
    /// still held by a run from its previous life.
    generation: u64,
}

/// Run bookkeeping of one field name.
#[derive(Debug, Clone, Copy)]
struct RunSlot {
    latest: u64,
    /// Registered fields (and the form) keep their slot until unregistered;
    /// other names only while some validator targets them.
    registered: bool,
}

impl RunSlot {
    fn registered() -> Self {
        Self {
            latest: 0,
            registered: true,
        }
    }
}

impl Registry {
    /// Create a registry that knows only the form field.
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
            runs: HashMap::from([(FORM_FIELD.to_string(), RunSlot::registered())]),
            generation: 0,
        }
    }

    /// Start tracking runs for `field`.
    pub fn track_field(&mut self, field: &str) {
        self.runs.insert(field.to_string(), RunSlot::registered());
    }

    /// Stop tracking runs for `field`. Pending runs for it become stale.
    pub fn forget_field(&mut self, field: &str) {
        self.runs.remove(field);
    }

    /// Append a validator.
    pub fn add_validator(&mut self, validator: Arc<ValidatorDescriptor>) {
        self.validators.push(validator);
    }

    /// Remove the first validator with this identity.
    ///
    /// When the last validator of an unregistered name goes, so does that
    /// name's run slot; pending runs for it become stale.
    pub fn remove_validator(&mut self, id: ValidatorId) -> bool {
        let Some(index) = self.validators.iter().position(|v| v.id() == id) else {
            return false;
        };
        let removed = self.validators.remove(index);
        let field = removed.field();
        let orphaned = self.runs.get(field).is_some_and(|slot| !slot.registered)
            && !self.validators.iter().any(|v| v.field() == field);
        if orphaned {
            self.runs.remove(field);
        }
        true
    }

    /// Validators bound to exactly this event and field, in registration order.
    pub fn matching(&self, event: Event, field: &str) -> Vec<Arc<ValidatorDescriptor>> {
        self.validators
            .iter()
            .filter(|v| v.matches(event, field))
            .cloned()
            .collect()
    }

    /// Number of registered validators.
    pub fn validator_count(&self) -> usize {
        self.validators.len()
    }

    /// Start a new run for `field` and return its token.
    ///
    /// Names that are not registered fields (validators may target any
    /// name) get a slot on their first run, which lives as long as their
    /// validators do.
    pub fn begin_run(&mut self, field: &str) -> u64 {
        self.generation += 1;
        let slot = self.runs.entry(field.to_string()).or_insert(RunSlot {
            latest: 0,
            registered: false,
        });
        slot.latest = self.generation;
        self.generation
    }

    /// Whether `token` still identifies the latest run of `field`.
    pub fn is_current(&self, field: &str, token: u64) -> bool {
        self.runs.get(field).is_some_and(|slot| slot.latest == token)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle returned by [`FormState::register_field`].
#[derive(Debug)]
pub struct FieldRegistration {
    form: Weak<FormInner>,
    name: String,
}

impl FieldRegistration {
    pub(crate) fn new(form: &FormState, name: String) -> Self {
        Self {
            form: form.downgrade(),
            name,
        }
    }

    /// Name of the registered field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Remove the field and its run generation. A no-op if the form is gone.
    pub fn unregister(self) {
        if let Some(form) = FormState::upgrade(&self.form) {
            form.unregister_field(&self.name);
        }
    }
}

/// Handle returned by [`FormState::register_validator`].
#[derive(Debug)]
pub struct ValidatorRegistration {
    form: Weak<FormInner>,
    id: ValidatorId,
}

impl ValidatorRegistration {
    pub(crate) fn new(form: &FormState, id: ValidatorId) -> Self {
        Self {
            form: form.downgrade(),
            id,
        }
    }

    /// Identity of the registered validator.
    pub fn id(&self) -> ValidatorId {
        self.id
    }

    /// Remove exactly this validator. A no-op if the form is gone.
    pub fn unregister(self) {
        if let Some(form) = FormState::upgrade(&self.form) {
            form.unregister_validator(self.id);
        }
    }
}
