//! Form field value objects

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Checked(bool),
    List(Vec<String>),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    /// Get the text value (returns None for checkbox and list values)
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Checked(_) | FieldValue::List(_) => None,
        }
    }

    pub fn is_checked(&self) -> bool {
        matches!(self, FieldValue::Checked(true))
    }

    /// Nothing filled in: whitespace-only text, an empty list or an unchecked box
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Checked(checked) => !checked,
            FieldValue::List(items) => items.is_empty(),
        }
    }

    /// A checked box, or text that reads as an agreement
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Checked(checked) => *checked,
            FieldValue::Text(s) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "1" | "on" | "true" | "yes"
            ),
            FieldValue::List(_) => false,
        }
    }
}

/// Values extracted from one submission, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValues(BTreeMap<String, FieldValue>);

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    /// Text of a field, if it was submitted as text
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    pub fn is_checked(&self, name: &str) -> bool {
        self.get(name).is_some_and(FieldValue::is_checked)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Which kind of input element a field is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Password,
    Textarea,
    Hidden,
    Checkbox,
    CheckboxMultiple,
    Submit,
}

/// Callback bound to a submit field; receives the validated values
pub type SubmitCallback = Box<dyn Fn(&FieldValues) -> bool>;

/// Optional per-field settings
#[derive(Debug, Clone, Default)]
pub struct FieldConfig {
    pub label: Option<String>,
    pub default: Option<String>,
    pub checked: bool,
    /// Presentational only: adds a marker and the `required` attribute
    pub required: bool,
    pub class: Option<String>,
    pub description: Option<String>,
    pub options: Vec<String>,
}

/// Represents a single form field with its configuration
pub struct FormField {
    pub name: String,
    pub kind: FieldKind,
    pub config: FieldConfig,
    pub(crate) callback: Option<SubmitCallback>,
}

impl fmt::Debug for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormField")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("config", &self.config)
            .field("callback", &self.callback.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl FormField {
    fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            config: FieldConfig::default(),
            callback: None,
        }
    }

    /// Create a new single-line text field
    pub fn text(name: &str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn password(name: &str) -> Self {
        Self::new(name, FieldKind::Password)
    }

    pub fn textarea(name: &str) -> Self {
        Self::new(name, FieldKind::Textarea)
    }

    pub fn hidden(name: &str) -> Self {
        Self::new(name, FieldKind::Hidden)
    }

    pub fn checkbox(name: &str) -> Self {
        Self::new(name, FieldKind::Checkbox)
    }

    /// Create a group of checkboxes sharing one name
    pub fn checkbox_multiple<I, S>(name: &str, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, FieldKind::CheckboxMultiple).options(options)
    }

    /// Create a submit button; it needs a callback before the form is built
    pub fn submit(name: &str) -> Self {
        Self::new(name, FieldKind::Submit)
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.config.label = Some(label.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.config.default = Some(value.into());
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.config.checked = checked;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.config.required = required;
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.config.class = Some(class.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.config.description = Some(description.into());
        self
    }

    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&FieldValues) -> bool + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    pub fn is_submit(&self) -> bool {
        self.kind == FieldKind::Submit
    }

    /// Invoke the bound callback; a field without one reports failure
    pub(crate) fn invoke(&self, values: &FieldValues) -> bool {
        self.callback.as_ref().is_some_and(|cb| cb(values))
    }

    /// Label text, falling back to the field name
    pub fn label_text(&self) -> &str {
        self.config.label.as_deref().unwrap_or(&self.name)
    }
}
