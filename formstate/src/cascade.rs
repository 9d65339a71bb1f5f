//! Event cascade and multi-field validation.

use futures::future::join_all;
use log::debug;

use crate::FORM_FIELD;
use crate::engine::FormState;
use crate::event::Trigger;
use crate::result::{FieldError, ValidationResult};
use crate::runner::RunOutcome;

impl FormState {
    /// Validate one field for `trigger` and every event below it.
    ///
    /// Events run lowest first (change, then blur, then submit). The first
    /// event that fails stops the cascade and its error is returned.
    pub async fn run_field_validation(
        &self,
        trigger: impl Into<Trigger>,
        field: &str,
    ) -> Option<String> {
        for &event in trigger.into().cascade() {
            if let RunOutcome::Invalid(error) = self.run_validation(event, field).await {
                return Some(error);
            }
        }
        None
    }

    /// Run the whole-form validators for `trigger`.
    pub async fn run_form_validation(&self, trigger: impl Into<Trigger>) -> Option<String> {
        self.run_field_validation(trigger, FORM_FIELD).await
    }

    /// Validate several fields at once, then the form itself.
    ///
    /// With an empty `fields` slice every registered field is validated;
    /// otherwise only the registered ones among `fields`, in registration
    /// order. Fields are validated concurrently. The form pass runs only if
    /// no field failed.
    pub async fn validate(&self, trigger: impl Into<Trigger>, fields: &[&str]) -> ValidationResult {
        let trigger = trigger.into();
        let selected: Vec<String> = self.inner.store.read(|state| {
            state
                .fields
                .iter()
                .filter(|field| fields.is_empty() || fields.contains(&field.as_str()))
                .cloned()
                .collect()
        });
        debug!(
            "[{}] validating {} field(s) for {}",
            self.name(),
            selected.len(),
            trigger
        );

        let results = join_all(selected.iter().map(|field| async move {
            let error = self.run_field_validation(trigger, field).await;
            error.map(|message| FieldError::new(field.as_str(), message))
        }))
        .await;

        let mut errors: Vec<FieldError> = results.into_iter().flatten().collect();
        if errors.is_empty() {
            if let Some(message) = self.run_form_validation(trigger).await {
                errors.push(FieldError::new(FORM_FIELD, message));
            }
        }

        ValidationResult::from_errors(errors)
    }
}
