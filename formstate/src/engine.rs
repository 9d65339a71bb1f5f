//! The form engine: state store, registry and configuration of one form.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use log::{debug, warn};
use tokio::sync::watch;

use crate::FORM_FIELD;
use crate::config::FormConfig;
use crate::error::ConfigurationError;
use crate::registry::{FieldRegistration, Registry, ValidatorRegistration};
use crate::state::{FormSnapshot, StateStore, Subscription, ValidationState};
use crate::validator::{ValidatorDescriptor, ValidatorId};
use crate::value::Value;

pub(crate) struct FormInner {
    pub(crate) config: FormConfig,
    pub(crate) store: StateStore,
    registry: Mutex<Registry>,
}

/// Validation engine for one form.
///
/// `FormState` is a cheap handle: clones share the same state, registry
/// and subscribers. Each form gets its own instance; nothing is global.
///
/// # Example
///
/// ```ignore
/// use formstate::prelude::*;
///
/// let form = FormState::new();
/// let _email = form.register_field("email")?;
/// let _rule = form.register_validator(ValidatorDescriptor::new(
///     "email",
///     Event::Blur,
///     rules::email("Please enter a valid email"),
/// )?);
///
/// form.set_value("email", "not-an-email");
/// let result = form.validate(Event::Submit, &[]).await;
/// assert!(result.is_invalid());
/// ```
#[derive(Clone)]
pub struct FormState {
    pub(crate) inner: Arc<FormInner>,
}

impl FormState {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(FormConfig::default())
    }

    /// Create an engine with the given configuration.
    pub fn with_config(config: FormConfig) -> Self {
        Self {
            inner: Arc::new(FormInner {
                config,
                store: StateStore::new(),
                registry: Mutex::new(Registry::new()),
            }),
        }
    }

    pub(crate) fn downgrade(&self) -> Weak<FormInner> {
        Arc::downgrade(&self.inner)
    }

    pub(crate) fn upgrade(form: &Weak<FormInner>) -> Option<Self> {
        form.upgrade().map(|inner| Self { inner })
    }

    pub(crate) fn registry(&self) -> MutexGuard<'_, Registry> {
        self.inner
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Configuration of this form.
    pub fn config(&self) -> &FormConfig {
        &self.inner.config
    }

    /// Name of this form, as used in log messages.
    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    // -------------------------------------------------------------------------
    // Observable state
    // -------------------------------------------------------------------------

    /// The underlying store.
    pub fn store(&self) -> &StateStore {
        &self.inner.store
    }

    /// Subscribe to snapshots. See [`StateStore::subscribe`].
    pub fn subscribe<F>(&self, f: F) -> Subscription
    where
        F: Fn(&FormSnapshot) + Send + Sync + 'static,
    {
        self.inner.store.subscribe(f)
    }

    /// Apply a mutation to the state and notify subscribers.
    pub fn update<R>(&self, f: impl FnOnce(&mut ValidationState) -> R) -> R {
        self.inner.store.update(f)
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> FormSnapshot {
        self.inner.store.snapshot()
    }

    /// Receiver that always holds the latest snapshot.
    pub fn watch(&self) -> watch::Receiver<FormSnapshot> {
        self.inner.store.watch()
    }

    /// Set the current value of `field`.
    pub fn set_value(&self, field: &str, value: impl Into<Value>) {
        let value = value.into();
        self.inner.store.update(|state| {
            state.values.insert(field.to_string(), value);
        });
    }

    /// Current value of `field`.
    pub fn value(&self, field: &str) -> Value {
        self.inner.store.read(|state| state.value(field))
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// Register a field.
    ///
    /// Fails if the name is `"form"` or already registered.
    pub fn register_field(
        &self,
        name: impl Into<String>,
    ) -> Result<FieldRegistration, ConfigurationError> {
        let name = name.into();
        if name == FORM_FIELD {
            return Err(ConfigurationError::ReservedFieldName(name));
        }

        self.inner.store.try_update(|state| {
            if state.has_field(&name) {
                return Err(ConfigurationError::DuplicateField(name.clone()));
            }
            state.fields.push(name.clone());
            Ok(())
        })?;
        self.registry().track_field(&name);

        debug!("[{}] registered field '{}'", self.name(), name);
        Ok(FieldRegistration::new(self, name))
    }

    pub(crate) fn unregister_field(&self, name: &str) {
        let removed = self.inner.store.update(|state| {
            match state.fields.iter().position(|f| f == name) {
                Some(index) => {
                    state.fields.remove(index);
                    true
                }
                None => false,
            }
        });
        self.registry().forget_field(name);

        if removed {
            debug!("[{}] unregistered field '{}'", self.name(), name);
        } else {
            warn!(
                "[{}] unregistering field '{}' which is not registered",
                self.name(),
                name
            );
        }
    }

    /// Register a validator.
    pub fn register_validator(&self, validator: ValidatorDescriptor) -> ValidatorRegistration {
        let id = validator.id();
        debug!(
            "[{}] registered {} validator for '{}'",
            self.name(),
            validator.event(),
            validator.field()
        );
        self.registry().add_validator(Arc::new(validator));
        ValidatorRegistration::new(self, id)
    }

    pub(crate) fn unregister_validator(&self, id: ValidatorId) {
        if self.registry().remove_validator(id) {
            debug!("[{}] unregistered validator {}", self.name(), id);
        }
    }

    /// Number of registered validators.
    pub fn validator_count(&self) -> usize {
        self.registry().validator_count()
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FormState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormState")
            .field("config", &self.inner.config)
            .field("store", &self.inner.store)
            .finish_non_exhaustive()
    }
}
