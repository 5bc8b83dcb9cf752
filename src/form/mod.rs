//! Form domain layer
//!
//! A form is declared once per request with `FormDefinition::builder()`,
//! handed to a `FormController`, checked against the submitted payload and
//! rendered back to HTML.

mod controller;
mod definition;
mod element;
mod field;
mod payload;
mod validation;

pub use controller::{CheckResult, FormController, FormSnapshot, FormState};
pub use definition::{FormBuilder, FormDefinition};
pub use element::RenderContext;
pub use field::{FieldConfig, FieldKind, FieldValue, FieldValues, FormField, SubmitCallback};
pub use payload::{PayloadValue, SubmissionPayload};
pub use validation::{RuleSet, RuleTest, ValidationError, ValidationRule};
