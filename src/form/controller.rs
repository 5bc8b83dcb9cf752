//! Submission handling and rendering for one form
//!
//! A `FormController` lives for one request. `check` looks at the payload,
//! decides whether the form was submitted and by which button, validates
//! every field and runs that button's callback. `render` turns the outcome
//! back into markup.

use super::definition::FormDefinition;
use super::element::RenderContext;
use super::field::FieldValues;
use super::payload::SubmissionPayload;
use super::validation::ValidationError;
use crate::config::FormConfig;
use crate::escape::{Escaper, HtmlEscaper};
use serde::{Deserialize, Serialize};

/// Outcome of one `check`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckResult {
    NotSubmitted,
    Success,
    Failure,
}

impl CheckResult {
    pub fn is_submitted(self) -> bool {
        self != CheckResult::NotSubmitted
    }
}

impl From<bool> for CheckResult {
    fn from(accepted: bool) -> Self {
        if accepted {
            CheckResult::Success
        } else {
            CheckResult::Failure
        }
    }
}

/// Where the controller is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Idle,
    Evaluated(CheckResult),
}

/// Values and errors of a failed submission, kept by the caller across a
/// redirect and handed back through `FormController::restore`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSnapshot {
    pub values: FieldValues,
    pub errors: Vec<ValidationError>,
}

/// Drives one form through check and render
#[derive(Debug)]
pub struct FormController {
    definition: FormDefinition,
    config: FormConfig,
    state: FormState,
    values: Option<FieldValues>,
    errors: Vec<ValidationError>,
    restored: Option<FormSnapshot>,
}

impl FormController {
    pub fn new(definition: FormDefinition) -> Self {
        Self::with_config(definition, FormConfig::default())
    }

    pub fn with_config(definition: FormDefinition, config: FormConfig) -> Self {
        Self {
            definition,
            config,
            state: FormState::Idle,
            values: None,
            errors: Vec::new(),
            restored: None,
        }
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Result of the last `check`, if any
    pub fn result(&self) -> Option<CheckResult> {
        match self.state {
            FormState::Idle => None,
            FormState::Evaluated(result) => Some(result),
        }
    }

    /// Validation errors of the last `check`
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn errors_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.errors.iter().filter(move |e| e.field == field)
    }

    /// Values extracted by the last `check` that detected a submission
    pub fn values(&self) -> Option<&FieldValues> {
        self.values.as_ref()
    }

    /// Check the payload for a submission of this form.
    ///
    /// The first submit button (in declaration order) present in the payload
    /// triggers the submission. All fields are then validated; only when no
    /// rule failed is that button's callback called, with the extracted
    /// values, and its answer becomes the result. Each call replaces the
    /// outcome of the previous one.
    pub fn check(&mut self, payload: &SubmissionPayload) -> CheckResult {
        self.values = None;
        self.errors.clear();

        let form = self.definition.id().unwrap_or("form");
        let Some(trigger) = self
            .definition
            .submit_fields()
            .find(|f| f.is_present(payload))
        else {
            tracing::trace!("Form `{form}` not submitted");
            self.state = FormState::Evaluated(CheckResult::NotSubmitted);
            return CheckResult::NotSubmitted;
        };
        tracing::debug!("Form `{form}` submitted via `{}`", trigger.name);

        let mut values = FieldValues::new();
        let mut errors = Vec::new();
        for field in self.definition.fields() {
            let value = field.extract_value(payload);
            errors.extend(self.definition.rules().evaluate(&field.name, value.as_ref()));
            if let Some(value) = value {
                values.insert(field.name.clone(), value);
            }
        }
        for error in &mut errors {
            error.message = self.config.message(&error.rule, &error.message).to_string();
        }

        let result = if errors.is_empty() {
            let accepted = trigger.invoke(&values);
            tracing::debug!("Form `{form}` callback `{}` returned {accepted}", trigger.name);
            CheckResult::from(accepted)
        } else {
            tracing::debug!(
                "Form `{form}` failed validation with {} error(s)",
                errors.len()
            );
            CheckResult::Failure
        };

        self.values = Some(values);
        self.errors = errors;
        self.restored = None;
        self.state = FormState::Evaluated(result);
        result
    }

    /// Values and errors of a failed check, for redisplay after a redirect
    pub fn snapshot(&self) -> Option<FormSnapshot> {
        if self.result() != Some(CheckResult::Failure) {
            return None;
        }
        Some(FormSnapshot {
            values: self.values.clone().unwrap_or_default(),
            errors: self.errors.clone(),
        })
    }

    /// Show a snapshot's values and errors until a new submission arrives
    pub fn restore(&mut self, snapshot: FormSnapshot) {
        self.restored = Some(snapshot);
    }

    fn render_source(&self) -> (Option<&FieldValues>, &[ValidationError]) {
        match (&self.values, &self.restored) {
            (Some(values), _) => (Some(values), &self.errors),
            (None, Some(snapshot)) => (Some(&snapshot.values), &snapshot.errors),
            (None, None) => (None, &[]),
        }
    }

    /// Render the whole form with the current values and errors
    pub fn render(&self, escaper: &dyn Escaper) -> String {
        let ctx = RenderContext::new(escaper, &self.config);
        let (values, errors) = self.render_source();

        let mut html = format!("<form method=\"{}\"", escaper.escape(self.definition.method()));
        if let Some(id) = self.definition.id() {
            html.push_str(&format!(" id=\"{}\"", escaper.escape(id)));
        }
        if let Some(action) = self.definition.action() {
            html.push_str(&format!(" action=\"{}\"", escaper.escape(action)));
        }
        html.push_str(">\n<fieldset>\n");
        if let Some(legend) = self.definition.legend() {
            html.push_str(&format!("<legend>{}</legend>\n", escaper.escape(legend)));
        }

        for field in self.definition.fields() {
            let field_errors: Vec<&ValidationError> =
                errors.iter().filter(|e| e.field == field.name).collect();
            let current = values.and_then(|v| v.get(&field.name));
            html.push_str(&field.render(current, &field_errors, &ctx));
        }

        html.push_str("</fieldset>\n</form>\n");
        html
    }

    /// Render with the default HTML escaper
    pub fn get_html(&self) -> String {
        self.render(&HtmlEscaper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::MockEscaper;
    use crate::form::{FieldValue, FormField, ValidationRule};
    use std::cell::Cell;
    use std::rc::Rc;

    fn payload(pairs: &[(&str, &str)]) -> SubmissionPayload {
        pairs.iter().copied().collect()
    }

    /// Contact form with an agreement checkbox and two submit buttons
    struct ContactForm {
        controller: FormController,
        submit_calls: Rc<Cell<u32>>,
        fail_calls: Rc<Cell<u32>>,
    }

    fn contact_form() -> ContactForm {
        let submit_calls = Rc::new(Cell::new(0));
        let fail_calls = Rc::new(Cell::new(0));
        let on_submit = Rc::clone(&submit_calls);
        let on_fail = Rc::clone(&fail_calls);

        let definition = FormDefinition::builder()
            .id("contact")
            .field(FormField::text("phone").label("Phone:"))
            .field(FormField::checkbox("accept_mail").label("Send me mail."))
            .field(
                FormField::checkbox("accept_phone")
                    .label("You may call me.")
                    .checked(true),
            )
            .field(
                FormField::checkbox("accept_agreement")
                    .label("You must accept the agreement.")
                    .required(true),
            )
            .field(FormField::submit("submit").callback(move |_| {
                on_submit.set(on_submit.get() + 1);
                true
            }))
            .field(FormField::submit("submit-fail").callback(move |_| {
                on_fail.set(on_fail.get() + 1);
                false
            }))
            .rules("phone", [ValidationRule::NotEmpty, ValidationRule::Numeric])
            .rule("accept_agreement", ValidationRule::MustAccept)
            .build()
            .unwrap();

        ContactForm {
            controller: FormController::new(definition),
            submit_calls,
            fail_calls,
        }
    }

    mod check {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_initial_state_is_idle() {
            let form = contact_form();
            assert_eq!(form.controller.state(), FormState::Idle);
            assert_eq!(form.controller.result(), None);
            assert!(form.controller.errors().is_empty());
        }

        #[test]
        fn test_empty_payload_is_not_submitted() {
            let mut form = contact_form();
            let result = form.controller.check(&SubmissionPayload::new());

            assert_eq!(result, CheckResult::NotSubmitted);
            assert!(!result.is_submitted());
            assert!(form.controller.errors().is_empty());
            assert!(form.controller.values().is_none());
            assert_eq!(form.submit_calls.get(), 0);
            assert_eq!(form.fail_calls.get(), 0);
        }

        #[test]
        fn test_payload_without_submit_key_is_not_submitted() {
            let mut form = contact_form();
            let result = form
                .controller
                .check(&payload(&[("phone", "123"), ("accept_agreement", "on")]));
            assert_eq!(result, CheckResult::NotSubmitted);
            assert_eq!(form.submit_calls.get(), 0);
        }

        #[test]
        fn test_valid_submission_succeeds() {
            let mut form = contact_form();
            let result = form.controller.check(&payload(&[
                ("phone", "0701234"),
                ("accept_agreement", "on"),
                ("submit", "submit"),
            ]));

            assert_eq!(result, CheckResult::Success);
            assert_eq!(
                form.controller.state(),
                FormState::Evaluated(CheckResult::Success)
            );
            assert!(form.controller.errors().is_empty());
            assert_eq!(form.submit_calls.get(), 1);
            assert_eq!(form.fail_calls.get(), 0);
        }

        #[test]
        fn test_missing_agreement_fails_without_callback() {
            let mut form = contact_form();
            let result = form
                .controller
                .check(&payload(&[("phone", "0701234"), ("submit", "submit")]));

            assert_eq!(result, CheckResult::Failure);
            assert_eq!(form.submit_calls.get(), 0);

            let errors: Vec<_> = form.controller.errors_for("accept_agreement").collect();
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].rule, "must_accept");
        }

        #[test]
        fn test_empty_phone_reports_only_not_empty() {
            let mut form = contact_form();
            form.controller.check(&payload(&[
                ("phone", ""),
                ("accept_agreement", "on"),
                ("submit", "submit"),
            ]));

            let rules: Vec<&str> = form
                .controller
                .errors_for("phone")
                .map(|e| e.rule.as_str())
                .collect();
            assert_eq!(rules, vec!["not_empty"]);
        }

        #[test]
        fn test_non_numeric_phone_reports_only_numeric() {
            let mut form = contact_form();
            form.controller.check(&payload(&[
                ("phone", "abc"),
                ("accept_agreement", "on"),
                ("submit", "submit"),
            ]));

            let rules: Vec<&str> = form
                .controller
                .errors_for("phone")
                .map(|e| e.rule.as_str())
                .collect();
            assert_eq!(rules, vec!["numeric"]);
            assert_eq!(form.controller.errors().len(), 1);
        }

        #[test]
        fn test_errors_collected_across_fields() {
            let mut form = contact_form();
            let result = form.controller.check(&payload(&[("submit", "submit")]));

            assert_eq!(result, CheckResult::Failure);
            let fields: Vec<&str> = form
                .controller
                .errors()
                .iter()
                .map(|e| e.field.as_str())
                .collect();
            assert_eq!(fields, vec!["phone", "accept_agreement"]);
        }

        #[test]
        fn test_second_submit_routes_to_its_callback() {
            let mut form = contact_form();
            let result = form.controller.check(&payload(&[
                ("phone", "0701234"),
                ("accept_agreement", "on"),
                ("submit-fail", "1"),
            ]));

            assert_eq!(result, CheckResult::Failure);
            assert!(form.controller.errors().is_empty());
            assert_eq!(form.fail_calls.get(), 1);
            assert_eq!(form.submit_calls.get(), 0);
        }

        #[test]
        fn test_first_declared_submit_wins() {
            let mut form = contact_form();
            let result = form.controller.check(&payload(&[
                ("phone", "1"),
                ("accept_agreement", "on"),
                ("submit-fail", "1"),
                ("submit", "1"),
            ]));

            assert_eq!(result, CheckResult::Success);
            assert_eq!(form.submit_calls.get(), 1);
            assert_eq!(form.fail_calls.get(), 0);
        }

        #[test]
        fn test_callback_receives_values() {
            let seen = Rc::new(Cell::new(false));
            let seen_in_cb = Rc::clone(&seen);
            let definition = FormDefinition::builder()
                .field(FormField::text("name"))
                .field(FormField::checkbox("news"))
                .field(FormField::submit("go").callback(move |values| {
                    seen_in_cb.set(values.text("name") == Some("Ada") && !values.is_checked("news"));
                    true
                }))
                .build()
                .unwrap();
            let mut controller = FormController::new(definition);

            controller.check(&payload(&[("name", "Ada"), ("go", "")]));

            assert!(seen.get());
            let values = controller.values().unwrap();
            assert_eq!(values.get("news"), Some(&FieldValue::Checked(false)));
        }

        #[test]
        fn test_repeated_check_replaces_outcome() {
            let mut form = contact_form();
            form.controller.check(&payload(&[("submit", "1")]));
            assert!(!form.controller.errors().is_empty());

            let result = form.controller.check(&SubmissionPayload::new());
            assert_eq!(result, CheckResult::NotSubmitted);
            assert!(form.controller.errors().is_empty());
            assert!(form.controller.values().is_none());
            assert_eq!(form.controller.result(), Some(CheckResult::NotSubmitted));
        }

        #[test]
        fn test_configured_messages_replace_defaults() {
            let mut config = FormConfig::default();
            config
                .messages
                .insert("must_accept".to_string(), "Du måste godkänna.".to_string());
            let definition = FormDefinition::builder()
                .field(FormField::checkbox("agree"))
                .field(FormField::submit("go").callback(|_| true))
                .rule("agree", ValidationRule::MustAccept)
                .build()
                .unwrap();
            let mut controller = FormController::with_config(definition, config);

            controller.check(&payload(&[("go", "")]));

            assert_eq!(controller.errors()[0].message, "Du måste godkänna.");
        }
    }

    mod render {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_full_markup() {
            let definition = FormDefinition::builder()
                .id("login")
                .action("login")
                .legend("Log in")
                .field(FormField::text("user").label("User"))
                .field(FormField::submit("go").label("Go").callback(|_| true))
                .rule("user", ValidationRule::NotEmpty)
                .build()
                .unwrap();
            let mut controller = FormController::new(definition);
            controller.check(&payload(&[("user", ""), ("go", "Go")]));

            let expected = concat!(
                "<form method=\"post\" id=\"login\" action=\"login\">\n",
                "<fieldset>\n",
                "<legend>Log in</legend>\n",
                "<p><label for=\"form-element-user\">User</label><br/><input id=\"form-element-user\" type=\"text\" name=\"user\" value=\"\" /></p>\n",
                "<ul class=\"validation-failed\"><li>Can not be empty.</li></ul>\n",
                "<p><input id=\"form-element-go\" type=\"submit\" name=\"go\" value=\"Go\" /></p>\n",
                "</fieldset>\n",
                "</form>\n",
            );
            assert_eq!(controller.get_html(), expected);
        }

        #[test]
        fn test_idle_render_uses_defaults() {
            let form = contact_form();
            let html = form.controller.get_html();

            assert!(html.contains(
                "<input id=\"form-element-accept_phone\" type=\"checkbox\" name=\"accept_phone\" checked=\"checked\" />"
            ));
            assert!(html.contains(
                "<input id=\"form-element-accept_mail\" type=\"checkbox\" name=\"accept_mail\" />"
            ));
            assert!(!html.contains("validation-failed"));
        }

        #[test]
        fn test_failed_render_keeps_submitted_values() {
            let mut form = contact_form();
            form.controller
                .check(&payload(&[("phone", "abc"), ("submit", "1")]));
            let html = form.controller.get_html();

            assert!(html.contains("value=\"abc\""));
            assert!(html.contains("<li>Must be numeric.</li>"));
            assert!(html.contains("<li>You must accept this.</li>"));
            // unchecked on submission even though checked by default
            assert!(html.contains(
                "<input id=\"form-element-accept_phone\" type=\"checkbox\" name=\"accept_phone\" />"
            ));
        }

        #[test]
        fn test_not_submitted_render_has_no_errors() {
            let mut form = contact_form();
            form.controller.check(&SubmissionPayload::new());
            assert!(!form.controller.get_html().contains("validation-failed"));
        }

        #[test]
        fn test_render_is_idempotent() {
            let mut form = contact_form();
            form.controller
                .check(&payload(&[("phone", "x"), ("submit", "1")]));

            let first = form.controller.get_html();
            let second = form.controller.get_html();
            assert_eq!(first, second);
            assert_eq!(
                form.controller.result(),
                Some(CheckResult::Failure)
            );
        }

        #[test]
        fn test_submitted_text_is_escaped() {
            let mut form = contact_form();
            form.controller
                .check(&payload(&[("phone", "<script>"), ("submit", "1")]));
            let html = form.controller.get_html();
            assert!(!html.contains("<script>"));
            assert!(html.contains("&lt;script&gt;"));
        }

        #[test]
        fn test_render_goes_through_escaper() {
            let form = contact_form();
            let mut escaper = MockEscaper::new();
            escaper
                .expect_escape()
                .withf(|raw| raw == "Phone:")
                .times(1)
                .returning(|_| "PHONE".to_string());
            escaper.expect_escape().returning(|raw| raw.to_string());

            let html = form.controller.render(&escaper);
            assert!(html.contains(">PHONE</label>"));
        }
    }

    mod snapshot {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_no_snapshot_unless_failed() {
            let mut form = contact_form();
            assert!(form.controller.snapshot().is_none());

            form.controller.check(&payload(&[
                ("phone", "1"),
                ("accept_agreement", "on"),
                ("submit", "1"),
            ]));
            assert!(form.controller.snapshot().is_none());
        }

        #[test]
        fn test_snapshot_survives_redirect() {
            let mut first = contact_form();
            first
                .controller
                .check(&payload(&[("phone", "abc"), ("submit", "1")]));
            let snapshot = first.controller.snapshot().unwrap();
            let stored = serde_json::to_string(&snapshot).unwrap();

            let mut second = contact_form();
            second.controller.restore(serde_json::from_str(&stored).unwrap());
            let result = second.controller.check(&SubmissionPayload::new());

            assert_eq!(result, CheckResult::NotSubmitted);
            assert!(second.controller.errors().is_empty());
            let html = second.controller.get_html();
            assert!(html.contains("value=\"abc\""));
            assert!(html.contains("<li>Must be numeric.</li>"));
        }

        #[test]
        fn test_new_submission_discards_restored_snapshot() {
            let mut first = contact_form();
            first
                .controller
                .check(&payload(&[("phone", "abc"), ("submit", "1")]));
            let snapshot = first.controller.snapshot().unwrap();

            let mut second = contact_form();
            second.controller.restore(snapshot);
            second.controller.check(&payload(&[
                ("phone", "42"),
                ("accept_agreement", "on"),
                ("submit", "1"),
            ]));

            let html = second.controller.get_html();
            assert!(html.contains("value=\"42\""));
            assert!(!html.contains("validation-failed"));
        }
    }
}
