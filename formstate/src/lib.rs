//! Form validation engine.
//!
//! A [`FormState`] tracks registered fields, the validators bound to each
//! (field, event) pair, and the resulting errors. Validators may answer
//! immediately or return a future; when several runs for the same field
//! overlap, only the most recently started one may write that field's error.
//!
//! Events cascade: validating on `submit` first re-runs the `change` and
//! `blur` validators of the field and stops at the first failing event.
//!
//! # Example
//!
//! ```ignore
//! use formstate::prelude::*;
//!
//! let form = FormState::new();
//! let _username = form.register_field("username")?;
//! let _password = form.register_field("password")?;
//! let _confirm = form.register_field("confirm")?;
//!
//! form.register_validator(ValidatorDescriptor::new(
//!     "username",
//!     Event::Change,
//!     rules::required("Username is required"),
//! )?);
//! form.register_validator(ValidatorDescriptor::new(
//!     "confirm",
//!     Event::Blur,
//!     rules::equals_field("password", "Passwords do not match"),
//! )?);
//!
//! let _sub = form.subscribe(|snapshot| {
//!     render(snapshot.field_error("username"), snapshot.is_validating);
//! });
//!
//! if form.validate(Event::Submit, &[]).await.is_valid() {
//!     // Proceed with form submission
//! }
//! ```

mod cascade;
mod engine;
mod runner;

pub mod config;
pub mod error;
pub mod event;
pub mod registry;
pub mod result;
pub mod rules;
pub mod state;
pub mod validator;
pub mod value;

pub use engine::FormState;
pub use runner::RunOutcome;

/// Reserved field name for whole-form validators.
pub const FORM_FIELD: &str = "form";

pub mod prelude {
    pub use crate::FORM_FIELD;
    pub use crate::FormState;
    pub use crate::RunOutcome;
    pub use crate::config::{FormConfig, PanicPolicy};
    pub use crate::error::ConfigurationError;
    pub use crate::event::{Event, Trigger};
    pub use crate::registry::{FieldRegistration, ValidatorRegistration};
    pub use crate::result::{FieldError, ValidationResult};
    pub use crate::rules;
    pub use crate::state::{
        EventErrors, FormSnapshot, Subscription, ValidationState, field_error,
    };
    pub use crate::validator::{Validation, ValidatorDescriptor, ValidatorId, ValidatorProps};
    pub use crate::value::Value;
}
