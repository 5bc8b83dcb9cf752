//! Error types for form construction

use thiserror::Error;

/// A form definition that can never work correctly.
///
/// These are programmer errors and are reported by `FormBuilder::build`,
/// before any submission can be checked. Validation failures are not errors;
/// they are collected as `ValidationError` values instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("form field name must not be empty")]
    EmptyName,

    #[error("duplicate form field `{name}`")]
    DuplicateField { name: String },

    #[error("validation rule `{rule}` references unknown field `{field}`")]
    UnknownField { field: String, rule: String },

    #[error("submit field `{name}` has no callback")]
    MissingCallback { name: String },

    #[error("checkbox group `{name}` declares no options")]
    MissingOptions { name: String },
}
