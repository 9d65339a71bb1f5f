//! Fluent construction of validator descriptors.

use std::sync::Arc;

use super::{Validation, ValidatorDescriptor, ValidatorFn, ValidatorProps};
use crate::FORM_FIELD;
use crate::error::ConfigurationError;
use crate::event::Event;

/// Builder for a [`ValidatorDescriptor`].
///
/// Every part is required; [`build`](Self::build) reports the first one
/// that is missing.
///
/// # Example
///
/// ```ignore
/// let validator = ValidatorDescriptor::builder()
///     .field("email")
///     .event(Event::Blur)
///     .func(rules::email("Please enter a valid email"))
///     .build()?;
/// ```
#[derive(Default)]
pub struct ValidatorBuilder {
    func: Option<ValidatorFn>,
    field: Option<String>,
    event: Option<Event>,
}

impl ValidatorBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the validated field.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Validate the whole form instead of a single field.
    pub fn form(self) -> Self {
        self.field(FORM_FIELD)
    }

    /// Set the trigger event.
    pub fn event(mut self, event: Event) -> Self {
        self.event = Some(event);
        self
    }

    /// Set the validation function.
    pub fn func<F>(mut self, func: F) -> Self
    where
        F: Fn(ValidatorProps) -> Validation + Send + Sync + 'static,
    {
        self.func = Some(Arc::new(func));
        self
    }

    /// Finish the descriptor.
    pub fn build(self) -> Result<ValidatorDescriptor, ConfigurationError> {
        let func = self.func.ok_or(ConfigurationError::MissingFunction)?;
        let event = self.event.ok_or(ConfigurationError::MissingEvent)?;
        let field = self
            .field
            .filter(|field| !field.trim().is_empty())
            .ok_or(ConfigurationError::MissingField)?;

        Ok(ValidatorDescriptor::from_parts(func, field, event))
    }
}
