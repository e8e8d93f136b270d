//! Step validator: per-field rules and the report they produce.
//!
//! A [`StepSchema`] declares the fields of one wizard step. Validation is a
//! pure function of the schema and the step's [`StepForm`]; failing fields
//! are reported with the message of their first failing rule.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::field::{FieldValue, StepForm};
use crate::reference::Choice;

/// Close to the address check browsers and common schema libraries apply:
/// a local part of word characters, dots and `'+-`, then dot-separated
/// domain labels ending in an alphabetic TLD of two or more letters.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .unwrap()
});

/// Whether `input` looks like an email address.
pub fn is_valid_email(input: &str) -> bool {
    !input.starts_with('.') && !input.contains("..") && EMAIL_RE.is_match(input)
}

/// The shape of value a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// One value from the field's options.
    Choice,
    /// Any number of values from the field's options.
    MultiChoice,
    Number,
    /// Any number of free-text entries.
    TextList,
    /// Day / time-slot entries.
    Availability,
}

impl FieldKind {
    /// Whether `value` has the shape this kind stores.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (Self::Text | Self::Choice, FieldValue::Text(_))
                | (Self::MultiChoice | Self::TextList, FieldValue::List(_))
                | (Self::Number, FieldValue::Number(_))
                | (Self::Availability, FieldValue::Availability(_))
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Text | Self::Choice => "text",
            Self::MultiChoice | Self::TextList => "list",
            Self::Number => "number",
            Self::Availability => "availability",
        }
    }
}

/// A single constraint on a field value.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Text of at least `min` UTF-16 code units, the length browsers report.
    MinLength { min: usize, message: String },
    /// Text matching `regex` somewhere.
    Pattern { regex: Regex, message: String },
    Email { message: String },
    /// Text (or every list item) drawn from the field's options.
    OneOf { message: Option<String> },
    /// A list with at least `min` items.
    MinItems { min: usize, message: String },
    /// A number no smaller than `min`.
    MinNumber { min: f64, message: String },
    /// Text (or every list item) that parses as an absolute URL.
    Url { message: String },
    /// Text (or every list item) whose URL scheme is http or https.
    HttpScheme { message: String },
}

impl Rule {
    pub fn min_length(min: usize, message: impl Into<String>) -> Self {
        Self::MinLength {
            min,
            message: message.into(),
        }
    }

    /// Panics on a malformed pattern; schemas are fixed at build time.
    pub fn pattern(pattern: &str, message: impl Into<String>) -> Self {
        Self::Pattern {
            regex: Regex::new(pattern).unwrap(),
            message: message.into(),
        }
    }

    pub fn email(message: impl Into<String>) -> Self {
        Self::Email {
            message: message.into(),
        }
    }

    pub fn one_of() -> Self {
        Self::OneOf { message: None }
    }

    pub fn min_items(min: usize, message: impl Into<String>) -> Self {
        Self::MinItems {
            min,
            message: message.into(),
        }
    }

    pub fn min_number(min: f64, message: impl Into<String>) -> Self {
        Self::MinNumber {
            min,
            message: message.into(),
        }
    }

    pub fn url(message: impl Into<String>) -> Self {
        Self::Url {
            message: message.into(),
        }
    }

    pub fn http_scheme(message: impl Into<String>) -> Self {
        Self::HttpScheme {
            message: message.into(),
        }
    }

    /// Check `value` against this rule, returning the failure message.
    fn check(&self, value: &FieldValue, options: &[Choice]) -> Option<String> {
        match self {
            Self::MinLength { min, message } => value
                .as_text()
                .filter(|s| s.encode_utf16().count() < *min)
                .map(|_| message.clone()),
            Self::Pattern { regex, message } => value
                .as_text()
                .filter(|s| !regex.is_match(s))
                .map(|_| message.clone()),
            Self::Email { message } => value
                .as_text()
                .filter(|s| !is_valid_email(s))
                .map(|_| message.clone()),
            Self::OneOf { message } => text_items(value)
                .into_iter()
                .find(|item| !options.iter().any(|c| c.value == *item))
                .map(|bad| {
                    message
                        .clone()
                        .unwrap_or_else(|| invalid_option_message(options, bad))
                }),
            Self::MinItems { min, message } => {
                let len = match value {
                    FieldValue::List(items) => items.len(),
                    FieldValue::Availability(entries) => entries.len(),
                    _ => return None,
                };
                (len < *min).then(|| message.clone())
            }
            Self::MinNumber { min, message } => value
                .as_number()
                .filter(|n| n.is_nan() || n < min)
                .map(|_| message.clone()),
            Self::Url { message } => text_items(value)
                .into_iter()
                .find(|item| url::Url::parse(item).is_err())
                .map(|_| message.clone()),
            Self::HttpScheme { message } => text_items(value)
                .into_iter()
                .find(|item| !has_http_scheme(item))
                .map(|_| message.clone()),
        }
    }
}

fn text_items(value: &FieldValue) -> Vec<&str> {
    match value {
        FieldValue::Text(s) => vec![s.as_str()],
        FieldValue::List(items) => items.iter().map(String::as_str).collect(),
        _ => Vec::new(),
    }
}

fn has_http_scheme(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn invalid_option_message(options: &[Choice], received: &str) -> String {
    let expected = options
        .iter()
        .map(|c| format!("'{}'", c.value))
        .collect::<Vec<_>>()
        .join(" | ");
    format!("Invalid value. Expected {expected}, received '{received}'")
}

/// Declaration of one form field.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Optional fields skip every rule while empty.
    pub optional: bool,
    /// Reported when a required field is unset or empty.
    pub required_message: String,
    /// Options offered to the user. For [`FieldKind::Text`] fields these are
    /// suggestions checked by the front end only.
    pub options: &'static [Choice],
    pub rules: Vec<Rule>,
}

impl FieldSchema {
    pub fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            optional: false,
            required_message: "Required".to_string(),
            options: &[],
            rules: Vec::new(),
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.required_message = message.into();
        self
    }

    pub fn options(mut self, options: &'static [Choice]) -> Self {
        self.options = options;
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Validate one value (or its absence). Returns the first failure.
    pub fn check(&self, value: Option<&FieldValue>) -> Option<String> {
        let value = match value {
            Some(v) if !v.is_empty() => v,
            _ if self.optional => return None,
            _ => return Some(self.required_message.clone()),
        };
        if !self.kind.accepts(value) {
            return Some(format!("Expected a {} value", self.kind.name()));
        }
        self.rules.iter().find_map(|rule| rule.check(value, self.options))
    }
}

/// Declaration of one wizard step.
#[derive(Debug, Clone)]
pub struct StepSchema {
    pub title: &'static str,
    pub fields: Vec<FieldSchema>,
}

impl StepSchema {
    pub fn new(title: &'static str, fields: Vec<FieldSchema>) -> Self {
        Self { title, fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of declared fields, never less than one.
    pub fn field_count(&self) -> usize {
        self.fields.len().max(1)
    }

    pub fn validate(&self, form: &StepForm) -> ValidationReport {
        let errors = self
            .fields
            .iter()
            .filter_map(|field| {
                field
                    .check(form.get(field.name))
                    .map(|message| (field.name.to_string(), message))
            })
            .collect();
        ValidationReport { errors }
    }
}

/// Outcome of validating one step: field name → message for each failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: BTreeMap<String, String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}
