//! Signup form demo.
//!
//! Drives a small signup form the way a UI would: values change as the user
//! types, fields are validated on change and blur, and the whole form on
//! submit. The username availability check is asynchronous; typing quickly
//! starts overlapping checks of which only the last one counts.
//!
//! Set `FORMSTATE_LOG` to `error`, `warn`, `info`, `debug` or `trace` to
//! control engine logging (default: `info`).

use std::env;
use std::time::Duration;

use formstate::prelude::*;
use log::{LevelFilter, info, warn};
use simplelog::{Config, SimpleLogger};

const TAKEN_USERNAMES: &[&str] = &["admin", "root", "ada"];

fn log_level() -> LevelFilter {
    env::var("FORMSTATE_LOG")
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Pretend to ask a server whether the username is free.
async fn username_available(username: Value) -> bool {
    let delay = match username.as_text().map(str::len) {
        Some(len) if len < 4 => 80,
        _ => 20,
    };
    tokio::time::sleep(Duration::from_millis(delay)).await;
    username
        .as_text()
        .is_none_or(|name| !TAKEN_USERNAMES.contains(&name.to_lowercase().as_str()))
}

fn build_form() -> Result<(FormState, Vec<FieldRegistration>), ConfigurationError> {
    let form = FormState::with_config(FormConfig::new("signup").isolate_panics());

    let fields = ["username", "email", "password", "confirm", "terms"]
        .into_iter()
        .map(|name| form.register_field(name))
        .collect::<Result<Vec<_>, _>>()?;

    form.register_validator(ValidatorDescriptor::new(
        "username",
        Event::Change,
        rules::required("Username is required"),
    )?);
    form.register_validator(ValidatorDescriptor::new(
        "username",
        Event::Change,
        rules::rule_async(username_available, "Username is taken"),
    )?);
    form.register_validator(ValidatorDescriptor::new(
        "email",
        Event::Blur,
        rules::email("Please enter a valid email"),
    )?);
    form.register_validator(ValidatorDescriptor::new(
        "password",
        Event::Blur,
        rules::min_length(8, "Password must be at least 8 characters"),
    )?);
    form.register_validator(ValidatorDescriptor::new(
        "confirm",
        Event::Blur,
        rules::equals_field("password", "Passwords do not match"),
    )?);
    form.register_validator(ValidatorDescriptor::new(
        "terms",
        Event::Submit,
        rules::checked("You must accept the terms"),
    )?);
    form.register_validator(ValidatorDescriptor::form(Event::Submit, |props| {
        let username = props.state.get("username").and_then(Value::as_text);
        let password = props.state.get("password").and_then(Value::as_text);
        if username.is_some() && username == password {
            Validation::error("Password must differ from the username")
        } else {
            Validation::valid()
        }
    }));

    Ok((form, fields))
}

fn print_errors(label: &str, snapshot: &FormSnapshot) {
    println!("-- {label}");
    for field in snapshot.fields.iter().map(String::as_str).chain([FORM_FIELD]) {
        let error = snapshot.field_error(field);
        if !error.is_empty() {
            println!("   {field:<9} {error}");
        }
    }
    if !snapshot.in_error {
        println!("   no errors");
    }
}

async fn run() -> Result<(), ConfigurationError> {
    let (form, _fields) = build_form()?;
    let _sub = form.subscribe(|snapshot| {
        if snapshot.is_validating {
            info!("validating: {}", snapshot.validating.join(", "));
        }
    });

    // Typing "ad", "ada", "adam" in quick succession. Each keystroke starts
    // a new check; the slow checks for the shorter names finish last.
    let mut checks = Vec::new();
    for text in ["ad", "ada", "adam"] {
        form.set_value("username", text);
        let form = form.clone();
        checks.push(tokio::spawn(async move {
            form.run_field_validation(Event::Change, "username").await
        }));
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    for check in checks {
        if let Err(e) = check.await {
            warn!("username check failed: {}", e);
        }
    }
    print_errors("after typing the username", &form.snapshot());

    form.set_value("email", "adam.example.com");
    form.run_field_validation(Event::Blur, "email").await;
    form.set_value("password", "adam");
    form.run_field_validation(Event::Blur, "password").await;
    print_errors("after leaving email and password", &form.snapshot());

    form.set_value("email", "adam@example.com");
    form.set_value("password", "correct horse");
    form.set_value("confirm", "correct horse");
    let result = form.validate(Event::Submit, &[]).await;
    print_errors("after first submit", &form.snapshot());
    info!("first submit valid: {}", result.is_valid());

    form.set_value("terms", true);
    let result = form.validate(Event::Submit, &[]).await;
    print_errors("after accepting the terms", &form.snapshot());
    info!("second submit valid: {}", result.is_valid());

    Ok(())
}

#[tokio::main]
async fn main() {
    let _ = SimpleLogger::init(log_level(), Config::default());

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
