//! Submitted form data

use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// One submitted key may carry a single value or several (repeated keys)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadValue {
    Single(String),
    Multi(Vec<String>),
}

impl PayloadValue {
    fn first(&self) -> Option<&str> {
        match self {
            PayloadValue::Single(s) => Some(s),
            PayloadValue::Multi(v) => v.first().map(String::as_str),
        }
    }

    fn all(&self) -> Vec<&str> {
        match self {
            PayloadValue::Single(s) => vec![s.as_str()],
            PayloadValue::Multi(v) => v.iter().map(String::as_str).collect(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            PayloadValue::Single(s) => {
                let first = std::mem::take(s);
                *self = PayloadValue::Multi(vec![first, value]);
            }
            PayloadValue::Multi(v) => v.push(value),
        }
    }
}

/// Decoded submission (the POST body of a request), read-only for the form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionPayload {
    fields: HashMap<String, PayloadValue>,
}

impl SubmissionPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an `application/x-www-form-urlencoded` body
    pub fn from_urlencoded(body: &str) -> Self {
        url::form_urlencoded::parse(body.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    /// Add a value; a repeated key turns into a multi-value entry
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.fields.entry(key.into()) {
            Entry::Occupied(mut entry) => entry.get_mut().push(value),
            Entry::Vacant(entry) => {
                entry.insert(PayloadValue::Single(value));
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// First value submitted under `key`
    pub fn first(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(PayloadValue::first)
    }

    /// Every value submitted under `key`, in submission order
    pub fn values(&self, key: &str) -> Vec<&str> {
        self.fields
            .get(key)
            .map(PayloadValue::all)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

impl<K, V> FromIterator<(K, V)> for SubmissionPayload
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut payload = Self::new();
        for (key, value) in iter {
            payload.insert(key, value);
        }
        payload
    }
}
