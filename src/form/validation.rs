//! Validation rules bound to form fields
//!
//! Every rule bound to a field runs, in the order it was declared, and each
//! failing rule contributes one `ValidationError`. Format rules (`Numeric`,
//! `Email`) have nothing to check on an empty value and pass, so an empty
//! field reports only what `NotEmpty` has to say about it.

use super::field::FieldValue;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Predicate used by `ValidationRule::Custom`
pub type RuleTest = fn(Option<&FieldValue>) -> bool;

/// A named, pure predicate over a field value
#[derive(Debug, Clone)]
pub enum ValidationRule {
    NotEmpty,
    Numeric,
    MustAccept,
    Email,
    Custom {
        name: String,
        message: String,
        test: RuleTest,
    },
}

impl ValidationRule {
    pub fn custom(name: impl Into<String>, message: impl Into<String>, test: RuleTest) -> Self {
        ValidationRule::Custom {
            name: name.into(),
            message: message.into(),
            test,
        }
    }

    /// Rule name, also the key used for message overrides
    pub fn name(&self) -> &str {
        match self {
            ValidationRule::NotEmpty => "not_empty",
            ValidationRule::Numeric => "numeric",
            ValidationRule::MustAccept => "must_accept",
            ValidationRule::Email => "email",
            ValidationRule::Custom { name, .. } => name,
        }
    }

    pub fn default_message(&self) -> &str {
        match self {
            ValidationRule::NotEmpty => "Can not be empty.",
            ValidationRule::Numeric => "Must be numeric.",
            ValidationRule::MustAccept => "You must accept this.",
            ValidationRule::Email => "Must be a valid email address.",
            ValidationRule::Custom { message, .. } => message,
        }
    }

    /// Does `value` pass this rule
    pub fn passes(&self, value: Option<&FieldValue>) -> bool {
        match self {
            ValidationRule::NotEmpty => value.is_some_and(|v| !v.is_blank()),
            ValidationRule::Numeric => match value {
                None => true,
                Some(v) if v.is_blank() => true,
                Some(FieldValue::Text(s)) => is_numeric(s),
                Some(FieldValue::List(items)) => items.iter().all(|s| is_numeric(s)),
                Some(FieldValue::Checked(_)) => false,
            },
            ValidationRule::MustAccept => value.is_some_and(FieldValue::is_truthy),
            ValidationRule::Email => match value {
                None => true,
                Some(v) if v.is_blank() => true,
                Some(FieldValue::Text(s)) => {
                    email_pattern().is_some_and(|re| re.is_match(s.trim()))
                }
                Some(_) => false,
            },
            ValidationRule::Custom { test, .. } => test(value),
        }
    }
}

/// Decimal or exponent notation; `NaN` and `inf` spellings are not numeric,
/// exponents beyond the `f64` range are.
fn is_numeric(s: &str) -> bool {
    let s = s.trim();
    s.parse::<f64>().is_ok()
        && !s
            .chars()
            .any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E'))
}

fn email_pattern() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").ok())
        .as_ref()
}

/// One failed rule for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub rule: String,
    pub message: String,
}

/// Rules per field name, each list kept in declaration order
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: HashMap<String, Vec<ValidationRule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, rule: ValidationRule) {
        self.rules.entry(field.into()).or_default().push(rule);
    }

    pub fn rules_for(&self, field: &str) -> &[ValidationRule] {
        self.rules.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Run every rule bound to `field` against `value`
    pub fn evaluate(&self, field: &str, value: Option<&FieldValue>) -> Vec<ValidationError> {
        self.rules_for(field)
            .iter()
            .filter(|rule| !rule.passes(value))
            .map(|rule| ValidationError {
                field: field.to_string(),
                rule: rule.name().to_string(),
                message: rule.default_message().to_string(),
            })
            .collect()
    }
}
