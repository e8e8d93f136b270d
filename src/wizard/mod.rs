//! Signup wizards: a 3-step player flow and a 4-step coach flow.
//!
//! Each step owns a form validated against its schema. The user only moves
//! forward once the active step validates; the last step submits every
//! step's data as one consolidated profile to the registration endpoint.

pub mod availability;
pub mod controller;
pub mod field;
pub mod profile;
pub mod progress;
pub mod schema;
pub mod state;
pub mod steps;

pub use controller::{AdvanceOutcome, SubmitOutcome, WizardController};
pub use field::{AvailabilityEntry, FieldValue, StepForm};
pub use profile::{ConsolidatedProfile, Role};
pub use schema::{FieldKind, FieldSchema, StepSchema, ValidationReport};
pub use state::{WizardPhase, WizardState};
pub use steps::WizardVariant;
