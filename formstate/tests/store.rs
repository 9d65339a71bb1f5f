//! Tests for the observable form state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use formstate::prelude::*;

#[test]
fn test_subscriber_sees_registrations() {
    let form = FormState::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _sub = form.subscribe(move |snapshot| {
        sink.lock().unwrap().push(snapshot.fields.clone());
    });

    let name = form.register_field("name").unwrap();
    name.unregister();

    let empty: Vec<String> = Vec::new();
    assert_eq!(
        *seen.lock().unwrap(),
        vec![empty.clone(), vec!["name".to_string()], empty]
    );
}

#[test]
fn test_set_value_is_observable() {
    let form = FormState::new();
    let _name = form.register_field("name").unwrap();

    form.set_value("name", "Ada");

    assert_eq!(form.value("name"), Value::from("Ada"));
    assert_eq!(form.value("missing"), Value::Empty);
    assert_eq!(form.snapshot().values.get("name"), Some(&Value::from("Ada")));
}

#[tokio::test]
async fn test_in_error_tracks_every_event() {
    let form = FormState::new();
    let _name = form.register_field("name").unwrap();
    form.register_validator(
        ValidatorDescriptor::new("name", Event::Submit, rules::min_length(2, "Too short"))
            .unwrap(),
    );
    assert!(!form.snapshot().in_error);

    form.run_field_validation(Event::Submit, "name").await;
    let snapshot = form.snapshot();
    assert!(snapshot.in_error);
    assert_eq!(snapshot.field_error("name"), "Too short");
    assert_eq!(field_error(&snapshot.errors, "name"), "Too short");

    form.set_value("name", "Ada");
    form.run_field_validation(Event::Submit, "name").await;
    let snapshot = form.snapshot();
    assert!(!snapshot.in_error);
    assert_eq!(snapshot.field_error("name"), "");
}

#[test]
fn test_field_error_precedence() {
    let mut errors = EventErrors::default();
    errors.set(Event::Change, "x", Some("e1".to_string()));
    errors.set(Event::Submit, "x", Some("e2".to_string()));

    assert_eq!(field_error(&errors, "x"), "e1");
}

#[tokio::test]
async fn test_watch_receives_updates() {
    let form = FormState::new();
    let mut rx = form.watch();
    let _email = form.register_field("email").unwrap();
    form.register_validator(
        ValidatorDescriptor::new("email", Event::Blur, rules::required("Required")).unwrap(),
    );

    form.validate(Event::Blur, &[]).await;

    assert!(rx.has_changed().unwrap());
    let snapshot = rx.borrow_and_update().clone();
    assert_eq!(snapshot.fields, vec!["email"]);
    assert_eq!(snapshot.errors.get(Event::Blur, "email"), Some("Required"));
}

#[test]
fn test_subscriber_may_read_back_into_the_form() {
    let form = FormState::new();
    let reader = form.clone();
    let counts = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&counts);
    let _sub = form.subscribe(move |_| {
        sink.lock().unwrap().push(reader.snapshot().fields.len());
    });

    let _a = form.register_field("a").unwrap();
    let _b = form.register_field("b").unwrap();

    assert_eq!(*counts.lock().unwrap(), vec![0, 1, 2]);
}

#[test]
fn test_later_subscribers_end_on_the_latest_snapshot() {
    let form = FormState::new();
    let writer = form.clone();
    let typed = AtomicBool::new(false);
    let _typist = form.subscribe(move |snapshot| {
        if snapshot.fields == ["a"] && !typed.swap(true, Ordering::SeqCst) {
            writer.set_value("a", "typed");
        }
    });
    let last = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&last);
    let _observer = form.subscribe(move |snapshot: &FormSnapshot| {
        *sink.lock().unwrap() = Some(snapshot.values.clone());
    });

    let _a = form.register_field("a").unwrap();

    let store_values = form.snapshot().values.clone();
    assert_eq!(store_values.get("a"), Some(&Value::from("typed")));
    assert_eq!(last.lock().unwrap().as_ref(), Some(&store_values));
}

#[test]
fn test_watch_and_subscribers_follow_concurrent_writers() {
    for _ in 0..20 {
        let form = FormState::new();
        let rx = form.watch();
        let last = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&last);
        let _observer = form.subscribe(move |snapshot: &FormSnapshot| {
            *sink.lock().unwrap() = Some(snapshot.values.clone());
        });

        let writers: Vec<_> = (0..4)
            .map(|n| {
                let form = form.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        form.set_value(&format!("f{n}"), i as f64);
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let expected = form.snapshot();
        assert_eq!(*rx.borrow(), expected);
        assert_eq!(last.lock().unwrap().as_ref(), Some(&expected.values));
    }
}

#[test]
fn test_snapshot_serializes_state_and_flags() {
    let form = FormState::new();
    let _name = form.register_field("name").unwrap();
    form.set_value("name", "Ada");
    form.update(|state| {
        state
            .errors
            .set(Event::Blur, "name", Some("Taken".to_string()))
    });

    let json = serde_json::to_value(form.snapshot()).unwrap();

    assert_eq!(json["fields"], serde_json::json!(["name"]));
    assert_eq!(json["values"]["name"], "Ada");
    assert_eq!(json["errors"]["blur"]["name"], "Taken");
    assert_eq!(json["errors"]["change"], serde_json::json!({}));
    assert_eq!(json["in_error"], true);
    assert_eq!(json["is_validating"], false);
}
