//! Engine configuration types.

/// Per-form configuration.
#[derive(Debug, Clone)]
pub struct FormConfig {
    /// Name of the form, used as log context.
    pub name: String,

    /// Behavior when a validator function panics.
    pub on_panic: PanicPolicy,

    /// Error recorded for a field whose validator panicked under
    /// [`PanicPolicy::Isolate`]. `None` records the panic message itself.
    pub panic_message: Option<String>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            name: "form".to_string(),
            on_panic: PanicPolicy::default(),
            panic_message: None,
        }
    }
}

impl FormConfig {
    /// Create a new config with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the panic policy.
    pub fn on_panic(mut self, policy: PanicPolicy) -> Self {
        self.on_panic = policy;
        self
    }

    /// Catch validator panics and record them as field errors.
    pub fn isolate_panics(mut self) -> Self {
        self.on_panic = PanicPolicy::Isolate;
        self
    }

    /// Set the error recorded for a panicking validator.
    pub fn panic_message(mut self, message: impl Into<String>) -> Self {
        self.panic_message = Some(message.into());
        self
    }
}

/// Behavior when a validator function panics, synchronously or while its
/// pending result is awaited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PanicPolicy {
    /// Unwind into the caller of `run_validation` / `validate`.
    /// The whole batch of a `validate` call is abandoned.
    #[default]
    Propagate,

    /// Catch the panic, log it, and treat it as a validation error for the
    /// run that panicked. Other fields are unaffected.
    Isolate,
}
