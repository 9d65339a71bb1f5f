//! Outcome of validating several fields at once.

/// One failing field, as reported by [`FormState::validate`](crate::FormState::validate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name, or `"form"` for the whole-form pass.
    pub field: String,
    /// Error message.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.field)
    }
}

/// Result of one [`validate`](crate::FormState::validate) call.
///
/// Only covers what this call produced; the form's stored errors may hold
/// more (for example from earlier events).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ValidationResult {
    /// All selected fields and the form pass succeeded.
    #[default]
    Valid,
    /// One or more fields, or the form pass, failed.
    Invalid(Vec<FieldError>),
}

impl ValidationResult {
    pub(crate) fn from_errors(errors: Vec<FieldError>) -> Self {
        if errors.is_empty() {
            Self::Valid
        } else {
            Self::Invalid(errors)
        }
    }

    /// No field and no form validator failed.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// Failing fields in registration order, the form last.
    pub fn errors(&self) -> &[FieldError] {
        match self {
            Self::Valid => &[],
            Self::Invalid(errors) => errors.as_slice(),
        }
    }

    pub fn first_error(&self) -> Option<&FieldError> {
        self.errors().first()
    }

    /// Message reported for `field` by this call.
    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors()
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}
