//! Ready-made validation functions.
//!
//! Each function returns a closure suitable for [`ValidatorDescriptor::new`]
//! and friends. Rules that inspect text treat non-text values as empty text.
//!
//! [`ValidatorDescriptor::new`]: crate::validator::ValidatorDescriptor::new

use std::future::Future;

use crate::validator::{Validation, ValidatorProps};
use crate::value::Value;

/// Lift a predicate on the field value into a validation function.
pub fn rule<P>(
    predicate: P,
    msg: impl Into<String>,
) -> impl Fn(ValidatorProps) -> Validation + Send + Sync + 'static
where
    P: Fn(&Value) -> bool + Send + Sync + 'static,
{
    let msg = msg.into();
    move |props| {
        if predicate(&props.value) {
            Validation::valid()
        } else {
            Validation::error(msg.clone())
        }
    }
}

/// Lift an asynchronous predicate into a validation function.
///
/// The field is marked as validating while the predicate runs.
pub fn rule_async<P, Fut>(
    predicate: P,
    msg: impl Into<String>,
) -> impl Fn(ValidatorProps) -> Validation + Send + Sync + 'static
where
    P: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    let msg = msg.into();
    move |props| {
        let check = predicate(props.value);
        let msg = msg.clone();
        Validation::pending(async move { if check.await { None } else { Some(msg) } })
    }
}

fn text(value: &Value) -> &str {
    value.as_text().unwrap_or_default()
}

/// Require a non-empty value.
pub fn required(msg: impl Into<String>) -> impl Fn(ValidatorProps) -> Validation + Send + Sync + 'static {
    rule(|v| !v.is_empty(), msg)
}

/// Require minimum length (in characters).
pub fn min_length(
    min: usize,
    msg: impl Into<String>,
) -> impl Fn(ValidatorProps) -> Validation + Send + Sync + 'static {
    rule(move |v| text(v).chars().count() >= min, msg)
}

/// Require maximum length (in characters).
pub fn max_length(
    max: usize,
    msg: impl Into<String>,
) -> impl Fn(ValidatorProps) -> Validation + Send + Sync + 'static {
    rule(move |v| text(v).chars().count() <= max, msg)
}

/// Require the value to match a regex pattern.
pub fn pattern(
    pattern: &str,
    msg: impl Into<String>,
) -> Result<impl Fn(ValidatorProps) -> Validation + Send + Sync + 'static, regex::Error> {
    let re = regex::Regex::new(pattern)?;
    Ok(rule(move |v| re.is_match(text(v)), msg))
}

/// Require a valid email address. Empty is valid; combine with [`required`].
pub fn email(msg: impl Into<String>) -> impl Fn(ValidatorProps) -> Validation + Send + Sync + 'static {
    rule(
        |v| {
            let v = text(v);
            v.is_empty() || email_address::EmailAddress::is_valid(v)
        },
        msg,
    )
}

/// Require the value to contain a substring.
pub fn contains(
    substr: impl Into<String>,
    msg: impl Into<String>,
) -> impl Fn(ValidatorProps) -> Validation + Send + Sync + 'static {
    let substr = substr.into();
    rule(move |v| text(v).contains(&substr), msg)
}

/// Require the value to equal the current value of another field.
pub fn equals_field(
    other: impl Into<String>,
    msg: impl Into<String>,
) -> impl Fn(ValidatorProps) -> Validation + Send + Sync + 'static {
    let other = other.into();
    let msg = msg.into();
    move |props| {
        let expected = props.state.get(&other).cloned().unwrap_or_default();
        if props.value == expected {
            Validation::valid()
        } else {
            Validation::error(msg.clone())
        }
    }
}

/// Require a checkbox to be checked.
pub fn checked(msg: impl Into<String>) -> impl Fn(ValidatorProps) -> Validation + Send + Sync + 'static {
    rule(|v| v.as_bool() == Some(true), msg)
}

/// Require an option to be selected.
pub fn selected(msg: impl Into<String>) -> impl Fn(ValidatorProps) -> Validation + Send + Sync + 'static {
    rule(|v| v.selected().is_some(), msg)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::event::Event;

    fn props(value: impl Into<Value>) -> ValidatorProps {
        ValidatorProps {
            value: value.into(),
            field: "field".to_string(),
            event: Event::Change,
            state: BTreeMap::new(),
        }
    }

    fn error_of(validation: Validation) -> Option<String> {
        match validation {
            Validation::Ready(error) => error,
            Validation::Pending(_) => panic!("expected an immediate answer"),
        }
    }

    #[test]
    fn test_required() {
        let check = required("Required");
        assert_eq!(error_of(check(props("   "))), Some("Required".to_string()));
        assert_eq!(error_of(check(props(Value::Empty))), Some("Required".to_string()));
        assert_eq!(error_of(check(props("x"))), None);
        assert_eq!(error_of(check(props(false))), None);
    }

    #[test]
    fn test_length_bounds() {
        let min = min_length(3, "Too short");
        let max = max_length(3, "Too long");
        assert!(error_of(min(props("ab"))).is_some());
        assert!(error_of(min(props("héé"))).is_none());
        assert!(error_of(max(props("abcd"))).is_some());
        assert!(error_of(max(props("abc"))).is_none());
    }

    #[test]
    fn test_pattern() {
        let digits = pattern(r"^\d+$", "Digits only").unwrap();
        assert!(error_of(digits(props("123"))).is_none());
        assert!(error_of(digits(props("12a"))).is_some());
        assert!(pattern("(", "broken").is_err());
    }

    #[test]
    fn test_email_allows_empty() {
        let check = email("Invalid email");
        assert!(error_of(check(props(""))).is_none());
        assert!(error_of(check(props("user@example.com"))).is_none());
        assert!(error_of(check(props("not an email"))).is_some());
    }

    #[test]
    fn test_equals_field_reads_other_values() {
        let check = equals_field("password", "Passwords do not match");
        let mut p = props("secret");
        p.state.insert("password".to_string(), Value::from("secret"));
        assert!(error_of(check(p.clone())).is_none());

        p.value = Value::from("other");
        assert!(error_of(check(p)).is_some());
    }

    #[test]
    fn test_checked_and_selected() {
        assert!(error_of(checked("Accept")(props(false))).is_some());
        assert!(error_of(checked("Accept")(props(true))).is_none());
        assert!(error_of(selected("Pick one")(props(None::<usize>))).is_some());
        assert!(error_of(selected("Pick one")(props(Some(2usize)))).is_none());
    }

    #[test]
    fn test_contains() {
        let check = contains("@", "Missing @");
        assert!(error_of(check(props("a@b"))).is_none());
        assert!(error_of(check(props("ab"))).is_some());
    }

    #[tokio::test]
    async fn test_rule_async_is_pending() {
        let check = rule_async(|v: Value| async move { v.as_text() == Some("free") }, "Taken");
        match check(props("taken")) {
            Validation::Pending(future) => assert_eq!(future.await, Some("Taken".to_string())),
            Validation::Ready(_) => panic!("expected a pending answer"),
        }
    }
}
