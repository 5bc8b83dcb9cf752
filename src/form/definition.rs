//! Declarative form definitions

use super::field::{FieldKind, FormField};
use super::validation::{RuleSet, ValidationRule};
use crate::error::ConfigurationError;
use std::collections::HashSet;

/// Ordered fields, their rules and the `<form>` attributes.
///
/// Only obtainable through `FormBuilder::build`, which rejects definitions
/// with duplicate or empty field names, rules on unknown fields, submit
/// buttons without a callback and checkbox groups without options.
#[derive(Debug)]
pub struct FormDefinition {
    id: Option<String>,
    action: Option<String>,
    method: String,
    legend: Option<String>,
    fields: Vec<FormField>,
    rules: RuleSet,
}

impl FormDefinition {
    pub fn builder() -> FormBuilder {
        FormBuilder::default()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn legend(&self) -> Option<&str> {
        self.legend.as_deref()
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Submit buttons in declaration order
    pub fn submit_fields(&self) -> impl Iterator<Item = &FormField> {
        self.fields.iter().filter(|f| f.is_submit())
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

/// Append-only builder for `FormDefinition`
#[derive(Debug, Default)]
pub struct FormBuilder {
    id: Option<String>,
    action: Option<String>,
    method: Option<String>,
    legend: Option<String>,
    fields: Vec<FormField>,
    rules: Vec<(String, ValidationRule)>,
}

impl FormBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn legend(mut self, legend: impl Into<String>) -> Self {
        self.legend = Some(legend.into());
        self
    }

    pub fn field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn rule(mut self, field: impl Into<String>, rule: ValidationRule) -> Self {
        self.rules.push((field.into(), rule));
        self
    }

    /// Bind several rules to one field, keeping their order
    pub fn rules<I>(mut self, field: &str, rules: I) -> Self
    where
        I: IntoIterator<Item = ValidationRule>,
    {
        for rule in rules {
            self.rules.push((field.to_string(), rule));
        }
        self
    }

    pub fn build(self) -> Result<FormDefinition, ConfigurationError> {
        let mut names = HashSet::new();
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(ConfigurationError::EmptyName);
            }
            if !names.insert(field.name.as_str()) {
                return Err(ConfigurationError::DuplicateField {
                    name: field.name.clone(),
                });
            }
            if field.is_submit() && !field.has_callback() {
                return Err(ConfigurationError::MissingCallback {
                    name: field.name.clone(),
                });
            }
            if field.kind == FieldKind::CheckboxMultiple
                && field.config.options.is_empty()
            {
                return Err(ConfigurationError::MissingOptions {
                    name: field.name.clone(),
                });
            }
        }

        let mut rules = RuleSet::new();
        for (field, rule) in self.rules {
            if !names.contains(field.as_str()) {
                return Err(ConfigurationError::UnknownField {
                    field,
                    rule: rule.name().to_string(),
                });
            }
            rules.add(field, rule);
        }

        Ok(FormDefinition {
            id: self.id,
            action: self.action,
            method: self.method.unwrap_or_else(|| "post".to_string()),
            legend: self.legend,
            fields: self.fields,
            rules,
        })
    }
}
