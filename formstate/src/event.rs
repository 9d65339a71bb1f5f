//! Validation trigger events and the cascade between them.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ConfigurationError;

/// A validation trigger tier.
///
/// Events cascade: a `Submit` implies a `Blur`, which implies a `Change`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Event {
    /// The field value changed.
    Change,
    /// The field lost focus.
    Blur,
    /// The form is being submitted.
    Submit,
}

impl Event {
    /// All events in declaration order.
    pub const ALL: [Event; 3] = [Event::Change, Event::Blur, Event::Submit];

    /// Lower-case event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::Change => "change",
            Event::Blur => "blur",
            Event::Submit => "submit",
        }
    }

    /// Events to re-validate when this event fires, in execution order.
    pub fn cascade(self) -> &'static [Event] {
        match self {
            Event::Change => &[Event::Change],
            Event::Blur => &[Event::Change, Event::Blur],
            Event::Submit => &[Event::Change, Event::Blur, Event::Submit],
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Event {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "change" => Ok(Event::Change),
            "blur" => Ok(Event::Blur),
            "submit" => Ok(Event::Submit),
            other => Err(ConfigurationError::UnknownEvent(other.to_string())),
        }
    }
}

/// What a field-level validation was asked to run for.
///
/// `All` is the `"*"` wildcard and behaves like `Submit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// A single event and everything it cascades to.
    Event(Event),
    /// Every event.
    All,
}

impl Trigger {
    /// Events to run for this trigger, in execution order.
    pub fn cascade(self) -> &'static [Event] {
        match self {
            Trigger::Event(event) => event.cascade(),
            Trigger::All => Event::Submit.cascade(),
        }
    }
}

impl From<Event> for Trigger {
    fn from(event: Event) -> Self {
        Trigger::Event(event)
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Event(event) => event.fmt(f),
            Trigger::All => f.write_str("*"),
        }
    }
}

impl FromStr for Trigger {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "*" {
            Ok(Trigger::All)
        } else {
            s.parse().map(Trigger::Event)
        }
    }
}
