//! Request validation: per-field rules collected into a field → messages map.

use regex::Regex;
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use crate::error::AppError;

/// Validation messages keyed by field name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = FieldErrors::default();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(&self.0).unwrap_or(Value::Null)
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.keys().map(String::as_str).collect();
        write!(f, "{}", fields.join(", "))
    }
}

/// Text input field: strings as-is, numbers in their JSON form, `true` as "1" and
/// `false` as "". `null` reads as absent; arrays and objects are rejected.
pub fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(if b { "1".to_string() } else { String::new() })),
        Value::Array(_) | Value::Object(_) => Err(de::Error::custom("expected a string, number or boolean")),
    }
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+$").expect("email pattern is valid"))
}

pub struct RequestValidator {
    errors: FieldErrors,
}

impl RequestValidator {
    pub fn new() -> Self {
        RequestValidator {
            errors: FieldErrors::default(),
        }
    }

    /// Present and not blank. Returns the value when it passes.
    pub fn required<'a>(&mut self, field: &str, value: Option<&'a str>) -> Option<&'a str> {
        match value {
            Some(v) if !v.trim().is_empty() => Some(v),
            _ => {
                self.errors.add(field, format!("The {} field is required.", field));
                None
            }
        }
    }

    pub fn email(&mut self, field: &str, value: &str) -> bool {
        if email_pattern().is_match(value) {
            true
        } else {
            self.errors
                .add(field, format!("The {} field must be a valid email address.", field));
            false
        }
    }

    /// At most `limit` characters.
    pub fn max(&mut self, field: &str, value: &str, limit: usize) -> bool {
        if value.chars().count() <= limit {
            true
        } else {
            self.errors.add(
                field,
                format!("The {} field must not be greater than {} characters.", field, limit),
            );
            false
        }
    }

    /// `value` must equal `{field}_confirmation`.
    pub fn confirmed(&mut self, field: &str, value: &str, confirmation: Option<&str>) -> bool {
        if confirmation == Some(value) {
            true
        } else {
            self.errors
                .add(field, format!("The {} field confirmation does not match.", field));
            false
        }
    }

    /// Record a uniqueness failure found by the caller.
    pub fn taken(&mut self, field: &str) {
        self.errors.add(field, format!("The {} has already been taken.", field));
    }

    pub fn finish(self) -> Result<(), AppError> {
        self.errors.into_result()
    }
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new()
    }
}
