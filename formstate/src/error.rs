//! Error types for engine configuration.

use std::any::Any;

use thiserror::Error;

/// Errors raised when a field or validator is set up incorrectly.
///
/// These are programmer errors: they are returned at the call site of the
/// offending registration and never stored in form state. Validation
/// failures are plain data (`String` messages) and never show up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The field name is reserved for whole-form validation.
    #[error("'{0}' is a reserved field name")]
    ReservedFieldName(String),

    /// A field with this name is already registered.
    #[error("Field '{0}' has already been registered. Can not have duplicate fields.")]
    DuplicateField(String),

    /// A validator was built without a validation function.
    #[error("Validator function is required")]
    MissingFunction,

    /// A validator was built without a trigger event.
    #[error("Validator event is required")]
    MissingEvent,

    /// A validator was built without a field, or with a blank one.
    #[error("Validator field is required")]
    MissingField,

    /// An event name could not be parsed.
    #[error("Unknown validation event '{0}'")]
    UnknownEvent(String),
}

/// Message carried by a panic payload (`panic!` with a literal or a
/// formatted string), or a placeholder for any other payload.
pub fn extract_panic_message(panic: &(dyn Any + Send)) -> String {
    match panic.downcast_ref::<&str>() {
        Some(message) => (*message).to_string(),
        None => panic
            .downcast_ref::<String>()
            .cloned()
            .unwrap_or_else(|| "validator panicked".to_string()),
    }
}
