//! webform - declarative HTML forms
//!
//! Describe a form's fields, validation rules and submit callbacks, check an
//! incoming submission against it and render it back with the submitted
//! values and inline error messages.

pub mod config;
pub mod error;
pub mod escape;
pub mod form;

pub use config::FormConfig;
pub use error::ConfigurationError;
pub use escape::{Escaper, HtmlEscaper};
pub use form::{
    CheckResult, FieldValue, FieldValues, FormController, FormDefinition, FormField,
    FormSnapshot, SubmissionPayload, ValidationError, ValidationRule,
};
