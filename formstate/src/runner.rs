//! Running the validators of one (event, field) pair.
//!
//! Every run takes a fresh generation token for its field. After each
//! suspension the run compares its token with the field's latest one; if a
//! newer run has started meanwhile, this run is superseded and may not touch
//! the field's error. In-flight validator futures are never cancelled, only
//! ignored.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;
use log::{debug, error, trace};

use crate::config::PanicPolicy;
use crate::engine::FormState;
use crate::error::extract_panic_message;
use crate::event::Event;
use crate::state::StateStore;
use crate::validator::{BoxFuture, Validation, ValidatorDescriptor, ValidatorProps};

/// Result of a single [`FormState::run_validation`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No validator is bound to the (event, field) pair. Nothing changed.
    Skipped,
    /// Every validator passed.
    Valid,
    /// The first failing validator's error.
    Invalid(String),
    /// A newer run for the same field started while this one was pending.
    /// Its result was dropped.
    Superseded,
}

impl RunOutcome {
    /// The error, if the run failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            RunOutcome::Invalid(error) => Some(error),
            _ => None,
        }
    }

    /// Consume the outcome, keeping only the error.
    pub fn into_error(self) -> Option<String> {
        match self {
            RunOutcome::Invalid(error) => Some(error),
            _ => None,
        }
    }

    /// Whether the run failed.
    pub fn is_error(&self) -> bool {
        matches!(self, RunOutcome::Invalid(_))
    }
}

/// Keeps a field marked as validating for as long as a run awaits.
///
/// If the run is dropped or unwinds before it commits, the mark is removed
/// here instead, exactly once.
struct ValidatingGuard {
    store: StateStore,
    field: String,
    armed: bool,
}

impl ValidatingGuard {
    fn mark(store: &StateStore, field: &str) -> Self {
        store.update(|state| state.start_validating(field));
        Self {
            store: store.clone(),
            field: field.to_string(),
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for ValidatingGuard {
    fn drop(&mut self) {
        if self.armed {
            trace!("run for '{}' abandoned while validating", self.field);
            self.store
                .update(|state| state.finish_validating(&self.field));
        }
    }
}

impl FormState {
    /// Run every validator bound to `event` on `field`.
    ///
    /// Validators run in registration order and the first error wins. The
    /// field is marked as validating once, on the first pending validator,
    /// and unmarked when the run concludes. The stored error for
    /// (`event`, `field`) is only written when it actually changes and the
    /// run has not been superseded.
    pub async fn run_validation(&self, event: Event, field: &str) -> RunOutcome {
        let (validators, token) = {
            let mut registry = self.registry();
            let validators = registry.matching(event, field);
            if validators.is_empty() {
                return RunOutcome::Skipped;
            }
            let token = registry.begin_run(field);
            (validators, token)
        };
        trace!(
            "[{}] run {} for {} '{}' ({} validators)",
            self.name(),
            token,
            event,
            field,
            validators.len()
        );

        let mut guard: Option<ValidatingGuard> = None;
        let mut outcome = RunOutcome::Valid;

        for validator in &validators {
            let props = self.inner.store.read(|state| ValidatorProps {
                value: state.value(field),
                field: field.to_string(),
                event,
                state: state.values.clone(),
            });

            let result = match self.invoke(validator, props) {
                Validation::Ready(result) => result,
                Validation::Pending(future) => {
                    if guard.is_none() {
                        guard = Some(ValidatingGuard::mark(&self.inner.store, field));
                    }
                    let result = self.settle(validator, future).await;
                    if !self.is_current_run(field, token) {
                        trace!("[{}] run {} for '{}' superseded", self.name(), token, field);
                        outcome = RunOutcome::Superseded;
                        break;
                    }
                    result
                }
            };

            if let Some(error) = result {
                outcome = RunOutcome::Invalid(error);
                break;
            }
        }

        self.commit(event, field, token, outcome, guard)
    }

    fn is_current_run(&self, field: &str, token: u64) -> bool {
        self.registry().is_current(field, token)
    }

    /// Write the run's result in a single update, if anything changed.
    ///
    /// The generation is checked again under the store lock, so a run that
    /// was overtaken on another thread after its last await still cannot
    /// commit.
    fn commit(
        &self,
        event: Event,
        field: &str,
        token: u64,
        outcome: RunOutcome,
        guard: Option<ValidatingGuard>,
    ) -> RunOutcome {
        let marked = guard.is_some();
        // Ok: the state changed and subscribers are notified. Err: untouched.
        let committed = self.inner.store.try_update(|state| {
            if let Some(guard) = guard {
                guard.disarm();
                state.finish_validating(field);
            }
            let unchanged = |outcome: RunOutcome| {
                if marked {
                    Ok((outcome, false))
                } else {
                    Err(outcome)
                }
            };

            if matches!(outcome, RunOutcome::Skipped | RunOutcome::Superseded) {
                return unchanged(outcome);
            }
            let next = outcome.error().map(str::to_string);
            if !self.is_current_run(field, token) {
                return unchanged(RunOutcome::Superseded);
            }
            if state.errors.get(event, field) == next.as_deref() {
                return unchanged(outcome);
            }
            state.errors.set(event, field, next);
            Ok((outcome, true))
        });

        match committed {
            Ok((outcome, true)) => {
                match outcome.error() {
                    Some(error) => debug!(
                        "[{}] {} error on '{}': {}",
                        self.name(),
                        event,
                        field,
                        error
                    ),
                    None => debug!("[{}] {} error on '{}' cleared", self.name(), event, field),
                }
                outcome
            }
            Ok((outcome, false)) | Err(outcome) => outcome,
        }
    }

    fn invoke(&self, validator: &ValidatorDescriptor, props: ValidatorProps) -> Validation {
        match self.inner.config.on_panic {
            PanicPolicy::Propagate => validator.call(props),
            PanicPolicy::Isolate => {
                match panic::catch_unwind(AssertUnwindSafe(|| validator.call(props))) {
                    Ok(validation) => validation,
                    Err(panic) => Validation::Ready(Some(self.panic_error(validator, panic))),
                }
            }
        }
    }

    async fn settle(
        &self,
        validator: &ValidatorDescriptor,
        future: BoxFuture<'static, Option<String>>,
    ) -> Option<String> {
        match self.inner.config.on_panic {
            PanicPolicy::Propagate => future.await,
            PanicPolicy::Isolate => match AssertUnwindSafe(future).catch_unwind().await {
                Ok(result) => result,
                Err(panic) => Some(self.panic_error(validator, panic)),
            },
        }
    }

    fn panic_error(&self, validator: &ValidatorDescriptor, panic: Box<dyn Any + Send>) -> String {
        let message = extract_panic_message(panic.as_ref());
        error!(
            "[{}] {} validator for '{}' panicked: {}",
            self.name(),
            validator.event(),
            validator.field(),
            message
        );
        self.inner
            .config
            .panic_message
            .clone()
            .unwrap_or(message)
    }
}
