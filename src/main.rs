//! webform demo - check a contact form against a submitted body
//!
//! Usage: `webform-demo 'accept_agreement=on&submit=Submit'`
//!
//! The argument is an `application/x-www-form-urlencoded` body. Without one
//! the form is treated as freshly opened. The outcome is logged to stderr and
//! the rendered form is printed to stdout.

use anyhow::Result;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use webform::{
    CheckResult, FormConfig, FormController, FormDefinition, FormField, SubmissionPayload,
    ValidationRule,
};

fn contact_form() -> Result<FormDefinition> {
    let form = FormDefinition::builder()
        .id("contact")
        .legend("Contact")
        .field(
            FormField::checkbox("accept_mail")
                .label("It's great if you send me product information by mail.")
                .checked(false),
        )
        .field(
            FormField::checkbox("accept_phone")
                .label("You may call me to try and sell stuff.")
                .checked(true),
        )
        .field(
            FormField::checkbox("accept_agreement")
                .label("You must accept the license agreement.")
                .required(true),
        )
        .field(FormField::submit("submit").label("Submit").callback(|_| {
            tracing::info!("Form was submitted, processing succeeded");
            true
        }))
        .field(
            FormField::submit("submit-fail")
                .label("Submit (fail)")
                .callback(|_| {
                    tracing::info!("Form was submitted but processing failed");
                    false
                }),
        )
        .rule("accept_agreement", ValidationRule::MustAccept)
        .build()?;
    Ok(form)
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "webform=info,webform_demo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = FormConfig::load()?;
    let payload = std::env::args()
        .nth(1)
        .map(|body| SubmissionPayload::from_urlencoded(&body))
        .unwrap_or_default();

    let mut controller = FormController::with_config(contact_form()?, config);
    match controller.check(&payload) {
        CheckResult::NotSubmitted => tracing::info!("Form was not submitted"),
        CheckResult::Success => {
            tracing::info!("Callback returned true, the caller should redirect now")
        }
        CheckResult::Failure => {
            for error in controller.errors() {
                tracing::warn!("{}: {}", error.field, error.message);
            }
            tracing::info!("Check returned failure, the caller should redirect now");
        }
    }

    print!("{}", controller.get_html());
    Ok(())
}
