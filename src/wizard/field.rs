//! Field values and per-step field collections.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One day's worth of bookable coaching slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityEntry {
    pub day: String,
    pub time_slots: Vec<String>,
}

impl AvailabilityEntry {
    pub fn new(day: impl Into<String>, time_slots: Vec<String>) -> Self {
        Self {
            day: day.into(),
            time_slots,
        }
    }
}

/// The value held by a single form field.
///
/// Unset fields are simply absent from their [`StepForm`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    /// A set of strings; insertion order is kept for display and the wire.
    List(Vec<String>),
    Availability(Vec<AvailabilityEntry>),
}

impl FieldValue {
    /// Whether the value counts as "filled" for progress purposes: a
    /// non-blank string, a non-empty collection, or any number.
    pub fn is_filled(&self) -> bool {
        match self {
            Self::Text(s) => !s.trim().is_empty(),
            Self::Number(_) => true,
            Self::List(items) => !items.is_empty(),
            Self::Availability(entries) => !entries.is_empty(),
        }
    }

    /// Whether the value is empty for validation purposes (no characters or
    /// no items). Unlike [`is_filled`](Self::is_filled), whitespace counts.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Number(_) => false,
            Self::List(items) => items.is_empty(),
            Self::Availability(entries) => entries.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_availability(&self) -> Option<&[AvailabilityEntry]> {
        match self {
            Self::Availability(entries) => Some(entries),
            _ => None,
        }
    }

    /// Short human-readable rendering for terminal display.
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => format!("{n}"),
            Self::List(items) => items.join(", "),
            Self::Availability(entries) => entries
                .iter()
                .map(|e| format!("{} [{}]", e.day, e.time_slots.join(", ")))
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<AvailabilityEntry>> for FieldValue {
    fn from(entries: Vec<AvailabilityEntry>) -> Self {
        Self::Availability(entries)
    }
}

/// The field collection of one wizard step, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepForm {
    values: BTreeMap<String, FieldValue>,
}

impl StepForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Set a field, returning the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.values.insert(name.into(), value)
    }

    /// Remove a field's value entirely.
    pub fn clear(&mut self, name: &str) -> Option<FieldValue> {
        self.values.remove(name)
    }

    /// Whether the named field holds a filled value.
    pub fn is_filled(&self, name: &str) -> bool {
        self.values.get(name).is_some_and(FieldValue::is_filled)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.values.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
