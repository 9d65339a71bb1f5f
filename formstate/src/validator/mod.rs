//! Validator descriptors.
//!
//! A [`ValidatorDescriptor`] binds a validation function to one field and one
//! trigger event. The function inspects the field's value (and, if it needs
//! to, every other value in the form) and either answers immediately or
//! hands back a future.
//!
//! # Example
//!
//! ```ignore
//! use formstate::prelude::*;
//!
//! let username = ValidatorDescriptor::new("username", Event::Change, |props| {
//!     if props.value.is_empty() {
//!         Validation::error("Username is required")
//!     } else {
//!         Validation::valid()
//!     }
//! })?;
//!
//! let available = ValidatorDescriptor::new("username", Event::Blur, |props| {
//!     let name = props.value.as_text().unwrap_or_default().to_string();
//!     Validation::pending(async move {
//!         if lookup_taken(&name).await { Some("Username is taken".into()) } else { None }
//!     })
//! })?;
//! ```

mod builder;

pub use builder::ValidatorBuilder;

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use uuid::Uuid;

use crate::FORM_FIELD;
use crate::error::ConfigurationError;
use crate::event::Event;
use crate::value::Value;

/// Type alias for boxed futures used in async validation.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Shared validation function.
pub type ValidatorFn = Arc<dyn Fn(ValidatorProps) -> Validation + Send + Sync>;

/// Everything a validator gets to look at.
#[derive(Debug, Clone)]
pub struct ValidatorProps {
    /// Current value of the validated field.
    pub value: Value,
    /// Name of the validated field.
    pub field: String,
    /// Event this validator is bound to.
    pub event: Event,
    /// All current form values.
    pub state: BTreeMap<String, Value>,
}

/// Answer of a validation function.
pub enum Validation {
    /// Decided immediately. `None` means valid.
    Ready(Option<String>),
    /// Decided later. The field is marked as validating while it is awaited.
    Pending(BoxFuture<'static, Option<String>>),
}

impl Validation {
    /// The value is valid.
    pub fn valid() -> Self {
        Validation::Ready(None)
    }

    /// The value is invalid.
    pub fn error(message: impl Into<String>) -> Self {
        Validation::Ready(Some(message.into()))
    }

    /// Defer the decision to a future.
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Option<String>> + Send + 'static,
    {
        Validation::Pending(Box::pin(future))
    }

    /// Whether the answer is deferred.
    pub fn is_pending(&self) -> bool {
        matches!(self, Validation::Pending(_))
    }
}

impl From<Option<String>> for Validation {
    fn from(error: Option<String>) -> Self {
        Validation::Ready(error)
    }
}

impl From<Result<(), String>> for Validation {
    fn from(result: Result<(), String>) -> Self {
        Validation::Ready(result.err())
    }
}

impl fmt::Debug for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validation::Ready(error) => f.debug_tuple("Ready").field(error).finish(),
            Validation::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// Unique identity of a validator descriptor.
///
/// Two descriptors built from the same function are still different
/// validators; unregistering one never removes the other.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ValidatorId(Uuid);

impl ValidatorId {
    /// Create a new unique validator ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ValidatorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ValidatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validation function bound to a field and a trigger event.
///
/// Descriptors are immutable once built. Cloning keeps the identity, so a
/// clone and its original count as the same validator.
#[derive(Clone)]
pub struct ValidatorDescriptor {
    id: ValidatorId,
    func: ValidatorFn,
    field: String,
    event: Event,
}

impl ValidatorDescriptor {
    /// Create a validator for `field` on `event`.
    ///
    /// Fails with [`ConfigurationError::MissingField`] if the field name is blank.
    pub fn new<F>(
        field: impl Into<String>,
        event: Event,
        func: F,
    ) -> Result<Self, ConfigurationError>
    where
        F: Fn(ValidatorProps) -> Validation + Send + Sync + 'static,
    {
        Self::builder().field(field).event(event).func(func).build()
    }

    /// Create a whole-form validator on `event`.
    pub fn form<F>(event: Event, func: F) -> Self
    where
        F: Fn(ValidatorProps) -> Validation + Send + Sync + 'static,
    {
        Self::from_parts(Arc::new(func), FORM_FIELD.to_string(), event)
    }

    /// Start building a validator piece by piece.
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    pub(crate) fn from_parts(func: ValidatorFn, field: String, event: Event) -> Self {
        Self {
            id: ValidatorId::new(),
            func,
            field,
            event,
        }
    }

    /// Identity of this descriptor.
    pub fn id(&self) -> ValidatorId {
        self.id
    }

    /// Field this validator is bound to.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Event this validator is bound to.
    pub fn event(&self) -> Event {
        self.event
    }

    /// Whether this is a whole-form validator.
    pub fn is_form(&self) -> bool {
        self.field == FORM_FIELD
    }

    pub(crate) fn matches(&self, event: Event, field: &str) -> bool {
        self.event == event && self.field == field
    }

    pub(crate) fn call(&self, props: ValidatorProps) -> Validation {
        (self.func)(props)
    }
}

impl fmt::Debug for ValidatorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorDescriptor")
            .field("id", &self.id)
            .field("field", &self.field)
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}
