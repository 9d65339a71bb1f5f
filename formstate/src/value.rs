//! Field values as seen by validators.

use serde::Serialize;

/// The current value of a field.
///
/// Values are owned by whatever drives the inputs; the engine only reads
/// them and hands them to validators.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// No value has been entered.
    #[default]
    Empty,
    /// Text input.
    Text(String),
    /// Checkbox or toggle.
    Bool(bool),
    /// Numeric input.
    Number(f64),
    /// Index of the selected option, if any.
    Selection(Option<usize>),
}

impl Value {
    /// Text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean content, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric content, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Selected index, if an option is selected.
    pub fn selected(&self) -> Option<usize> {
        match self {
            Value::Selection(index) => *index,
            _ => None,
        }
    }

    /// Whether the value counts as "nothing entered".
    ///
    /// Whitespace-only text and an empty selection are empty. `false` is not.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Empty => true,
            Value::Text(s) => s.trim().is_empty(),
            Value::Selection(index) => index.is_none(),
            Value::Bool(_) | Value::Number(_) => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<Option<usize>> for Value {
    fn from(index: Option<usize>) -> Self {
        Value::Selection(index)
    }
}
