//! Wizard controller: owns the step forms, validates and moves between
//! steps, keeps progress current, and submits the consolidated profile.

use std::future::Future;
use std::time::Duration;

use super::availability;
use super::field::{FieldValue, StepForm};
use super::profile::ConsolidatedProfile;
use super::progress;
use super::schema::{FieldKind, StepSchema, ValidationReport};
use super::state::{StepMove, WizardPhase, WizardState};
use super::steps::{WizardVariant, fields};
use crate::auth::{AuthApi, AuthSession};
use crate::error::{AuthError, WizardError};
use crate::notify::{Notifier, Toast};

/// Fallback toast text when a registration error carries no message.
pub const REGISTRATION_FAILED: &str = "Registration failed";

/// Result of [`WizardController::advance`].
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    /// Moved to step `to`.
    Advanced { to: usize },
    /// The active step failed validation; nothing moved.
    Blocked(ValidationReport),
    /// The final step is valid; call [`WizardController::submit`].
    ReadyToSubmit,
}

/// Result of a submission attempt.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Registered; the wizard is complete.
    Registered(AuthSession),
    /// The final step failed validation; nothing was sent.
    Blocked(ValidationReport),
    /// The call failed. A toast was raised and all entered data is kept.
    Failed(AuthError),
}

/// Drives one signup wizard from first edit to final submission.
#[derive(Debug)]
pub struct WizardController {
    variant: WizardVariant,
    schemas: Vec<StepSchema>,
    forms: Vec<StepForm>,
    state: WizardState,
    progress: f64,
    errors: ValidationReport,
}

impl WizardController {
    /// A fresh wizard: step 1, every field empty, progress 0.
    pub fn new(variant: WizardVariant) -> Self {
        let schemas = variant.schemas();
        let forms = vec![StepForm::new(); schemas.len()];
        Self {
            variant,
            state: WizardState::new(schemas.len()),
            schemas,
            forms,
            progress: 0.0,
            errors: ValidationReport::default(),
        }
    }

    pub fn variant(&self) -> WizardVariant {
        self.variant
    }

    pub fn current_step(&self) -> usize {
        self.state.current_step()
    }

    pub fn total_steps(&self) -> usize {
        self.state.total_steps()
    }

    pub fn phase(&self) -> WizardPhase {
        self.state.phase()
    }

    pub fn is_final_step(&self) -> bool {
        self.state.is_final_step()
    }

    /// Overall completion in `[0, 100]`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Errors from the last blocked advance or submit of the active step.
    pub fn errors(&self) -> &ValidationReport {
        &self.errors
    }

    pub fn schema(&self, step: usize) -> Result<&StepSchema, WizardError> {
        let index = self.index(step)?;
        Ok(&self.schemas[index])
    }

    pub fn current_schema(&self) -> &StepSchema {
        &self.schemas[self.current_step() - 1]
    }

    pub fn form(&self, step: usize) -> Result<&StepForm, WizardError> {
        let index = self.index(step)?;
        Ok(&self.forms[index])
    }

    pub fn current_form(&self) -> &StepForm {
        &self.forms[self.current_step() - 1]
    }

    fn index(&self, step: usize) -> Result<usize, WizardError> {
        if step == 0 || step > self.schemas.len() {
            return Err(WizardError::StepOutOfRange {
                step,
                total: self.schemas.len(),
            });
        }
        Ok(step - 1)
    }

    /// Set a field on any step. Progress is only re-derived when `step` is
    /// the active one.
    pub fn set_field(
        &mut self,
        step: usize,
        name: &str,
        value: FieldValue,
    ) -> Result<(), WizardError> {
        self.ensure_editable()?;
        let index = self.index(step)?;
        let field = self.schemas[index]
            .field(name)
            .ok_or_else(|| WizardError::UnknownField {
                step,
                field: name.to_string(),
            })?;
        if !field.kind.accepts(&value) {
            return Err(WizardError::FieldKindMismatch {
                field: name.to_string(),
                expected: field.kind.name().to_string(),
            });
        }
        self.forms[index].set(name, value);
        self.field_changed(step);
        Ok(())
    }

    /// Unset a field on any step.
    pub fn clear_field(&mut self, step: usize, name: &str) -> Result<(), WizardError> {
        self.ensure_editable()?;
        let index = self.index(step)?;
        if self.schemas[index].field(name).is_none() {
            return Err(WizardError::UnknownField {
                step,
                field: name.to_string(),
            });
        }
        self.forms[index].clear(name);
        self.field_changed(step);
        Ok(())
    }

    /// Check or uncheck one option of a multi-choice field on the active step.
    pub fn toggle_choice(&mut self, name: &str, option: &str, checked: bool) -> Result<(), WizardError> {
        let step = self.current_step();
        let mut items = self.list_value(step, name, FieldKind::MultiChoice)?;
        let present = items.iter().any(|i| i == option);
        match (checked, present) {
            (true, false) => items.push(option.to_string()),
            (false, true) => items.retain(|i| i != option),
            _ => return Ok(()),
        }
        self.set_field(step, name, FieldValue::List(items))
    }

    /// Check or uncheck one `(day, slot)` cell of the availability field on
    /// the active step.
    pub fn toggle_availability(&mut self, day: &str, slot: &str, checked: bool) -> Result<(), WizardError> {
        let step = self.current_step();
        let index = self.index(step)?;
        let field = self.schemas[index]
            .field(fields::AVAILABILITY)
            .filter(|f| f.kind == FieldKind::Availability)
            .ok_or_else(|| WizardError::UnknownField {
                step,
                field: fields::AVAILABILITY.to_string(),
            })?;
        let mut entries = self.forms[index]
            .get(field.name)
            .and_then(FieldValue::as_availability)
            .map(<[_]>::to_vec)
            .unwrap_or_default();
        availability::toggle_slot(&mut entries, day, slot, checked);
        self.set_field(step, fields::AVAILABILITY, FieldValue::Availability(entries))
    }

    fn list_value(&self, step: usize, name: &str, kind: FieldKind) -> Result<Vec<String>, WizardError> {
        let index = self.index(step)?;
        let field = self.schemas[index]
            .field(name)
            .ok_or_else(|| WizardError::UnknownField {
                step,
                field: name.to_string(),
            })?;
        if field.kind != kind {
            return Err(WizardError::FieldKindMismatch {
                field: name.to_string(),
                expected: kind.name().to_string(),
            });
        }
        Ok(self.forms[index]
            .get(name)
            .and_then(FieldValue::as_list)
            .map(<[_]>::to_vec)
            .unwrap_or_default())
    }

    /// The single "field changed" event: only the active step recomputes.
    fn field_changed(&mut self, step: usize) {
        if step != self.current_step() {
            return;
        }
        self.errors = ValidationReport::default();
        self.recompute_progress();
    }

    fn recompute_progress(&mut self) {
        let step = self.current_step();
        self.progress = progress::calculate(
            step,
            self.total_steps(),
            &self.forms[step - 1],
            &self.schemas[step - 1],
        );
        tracing::debug!(step, progress = self.progress, "Progress updated");
    }

    fn ensure_editable(&self) -> Result<(), WizardError> {
        match self.phase() {
            WizardPhase::Editing => Ok(()),
            WizardPhase::Submitting => Err(WizardError::AlreadySubmitting),
            WizardPhase::Completed => Err(WizardError::AlreadyCompleted),
        }
    }

    /// Validate the active step without moving.
    pub fn validate_current(&self) -> ValidationReport {
        self.current_schema().validate(self.current_form())
    }

    /// Whether the active step passes its schema, i.e. whether "Next" (or
    /// "Submit" on the final step) should be enabled.
    pub fn can_advance(&self) -> bool {
        self.phase() == WizardPhase::Editing && self.validate_current().is_valid()
    }

    /// Validate the active step and move forward if it passes.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, WizardError> {
        self.ensure_editable()?;
        let report = self.validate_current();
        if !report.is_valid() {
            tracing::debug!(step = self.current_step(), failing = report.len(), "Advance blocked");
            self.errors = report.clone();
            return Ok(AdvanceOutcome::Blocked(report));
        }
        self.errors = ValidationReport::default();
        match self.state.advance()? {
            StepMove::Advanced { from, to } => {
                tracing::info!(variant = %self.variant, from, to, "Wizard advanced");
                self.recompute_progress();
                Ok(AdvanceOutcome::Advanced { to })
            }
            StepMove::AtFinalStep => Ok(AdvanceOutcome::ReadyToSubmit),
        }
    }

    /// Move back one step. A no-op on step 1.
    pub fn retreat(&mut self) -> bool {
        let moved = self.state.retreat();
        if moved {
            self.errors = ValidationReport::default();
            self.recompute_progress();
            tracing::info!(variant = %self.variant, to = self.current_step(), "Wizard went back");
        }
        moved
    }

    /// Every step's fields merged under the variant's role.
    pub fn consolidated_profile(&self) -> ConsolidatedProfile {
        ConsolidatedProfile::merge(self.variant.role(), &self.forms)
    }

    /// Submit without a timeout or cancel path.
    pub async fn submit(
        &mut self,
        api: &dyn AuthApi,
        notifier: &dyn Notifier,
    ) -> Result<SubmitOutcome, WizardError> {
        self.submit_with(api, notifier, None, std::future::pending()).await
    }

    /// Validate the final step and register the consolidated profile.
    ///
    /// The call is abandoned with [`AuthError::Timeout`] after `timeout` and
    /// with [`AuthError::Cancelled`] as soon as `cancel` resolves. Any failure
    /// raises a destructive toast and leaves the wizard on the final step with
    /// every form intact, ready for another attempt.
    pub async fn submit_with(
        &mut self,
        api: &dyn AuthApi,
        notifier: &dyn Notifier,
        timeout: Option<Duration>,
        cancel: impl Future<Output = ()>,
    ) -> Result<SubmitOutcome, WizardError> {
        self.ensure_editable()?;
        if !self.is_final_step() {
            return Err(WizardError::NotAtFinalStep);
        }
        let report = self.validate_current();
        if !report.is_valid() {
            self.errors = report.clone();
            return Ok(SubmitOutcome::Blocked(report));
        }
        self.errors = ValidationReport::default();

        let profile = self.consolidated_profile();
        self.state.begin_submission()?;
        tracing::info!(role = %profile.role, fields = profile.data.len(), "Submitting registration");

        let mut guard = SubmissionGuard {
            state: &mut self.state,
            settled: false,
        };
        let call = async {
            match timeout {
                Some(limit) => tokio::time::timeout(limit, api.register(&profile))
                    .await
                    .unwrap_or(Err(AuthError::Timeout(limit))),
                None => api.register(&profile).await,
            }
        };
        let result = tokio::select! {
            result = call => result,
            _ = cancel => Err(AuthError::Cancelled),
        };

        match result {
            Ok(session) => {
                guard.state.submission_succeeded();
                guard.settled = true;
                tracing::info!(user_id = %session.user.id, "Registration complete");
                Ok(SubmitOutcome::Registered(session))
            }
            Err(e) => {
                drop(guard);
                tracing::warn!(role = %profile.role, "Registration failed: {}", e);
                notifier.notify(Toast::error(e.user_message(REGISTRATION_FAILED)));
                Ok(SubmitOutcome::Failed(e))
            }
        }
    }
}

/// Returns the wizard to editing if a submission ends without success,
/// including when the submitting future is dropped.
struct SubmissionGuard<'a> {
    state: &'a mut WizardState,
    settled: bool,
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.state.submission_failed();
        }
    }
}
