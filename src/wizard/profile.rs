//! The consolidated signup payload.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::field::{FieldValue, StepForm};
use super::steps::fields;

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Player,
    Coach,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Coach => write!(f, "coach"),
        }
    }
}

/// Every step's fields merged into one map, tagged with the role.
///
/// Serializes as the register request body: `{"role": ..., "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedProfile {
    pub role: Role,
    pub data: BTreeMap<String, FieldValue>,
}

impl ConsolidatedProfile {
    /// Merge step forms in order. Field names are disjoint across steps; if
    /// they ever collide the later step wins.
    pub fn merge<'a>(role: Role, forms: impl IntoIterator<Item = &'a StepForm>) -> Self {
        let mut data = BTreeMap::new();
        for form in forms {
            for (name, value) in form.iter() {
                if data.insert(name.clone(), value.clone()).is_some() {
                    tracing::warn!(field = %name, "Field set by more than one step");
                }
            }
        }
        Self { role, data }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.data.get(name)
    }

    pub fn email(&self) -> Option<&str> {
        self.get(fields::EMAIL).and_then(FieldValue::as_text)
    }

    pub fn full_name(&self) -> Option<&str> {
        self.get(fields::FULL_NAME).and_then(FieldValue::as_text)
    }
}
