//! Wizard state machine: which step is active and whether a submission is
//! in flight.

use serde::{Deserialize, Serialize};

use crate::error::WizardError;

/// Lifecycle phase of a wizard.
///
/// Progresses Editing → Submitting → Completed; a failed submission falls
/// back from Submitting to Editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardPhase {
    Editing,
    Submitting,
    Completed,
}

impl WizardPhase {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: WizardPhase) -> bool {
        use WizardPhase::*;
        matches!(
            (self, target),
            (Editing, Submitting) | (Submitting, Editing) | (Submitting, Completed)
        )
    }

    /// Whether this phase is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl Default for WizardPhase {
    fn default() -> Self {
        Self::Editing
    }
}

impl std::fmt::Display for WizardPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Editing => "editing",
            Self::Submitting => "submitting",
            Self::Completed => "completed",
        };
        write!(f, "{s}")
    }
}

/// What a forward move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMove {
    /// Moved from one step to the next.
    Advanced { from: usize, to: usize },
    /// Already on the final step; the caller should submit.
    AtFinalStep,
}

/// Current step and phase of a wizard with a fixed number of steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    current_step: usize,
    total_steps: usize,
    phase: WizardPhase,
}

impl WizardState {
    /// Fresh state on step 1. `total_steps` must be at least one.
    pub fn new(total_steps: usize) -> Self {
        Self {
            current_step: 1,
            total_steps: total_steps.max(1),
            phase: WizardPhase::Editing,
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    pub fn is_final_step(&self) -> bool {
        self.current_step == self.total_steps
    }

    /// Move forward one step. Only legal while editing.
    pub fn advance(&mut self) -> Result<StepMove, WizardError> {
        self.ensure_editing()?;
        if self.is_final_step() {
            return Ok(StepMove::AtFinalStep);
        }
        let from = self.current_step;
        self.current_step += 1;
        Ok(StepMove::Advanced {
            from,
            to: self.current_step,
        })
    }

    /// Move back one step. Returns false (and does nothing) on step 1 or
    /// outside the editing phase.
    pub fn retreat(&mut self) -> bool {
        if self.phase != WizardPhase::Editing || self.current_step <= 1 {
            return false;
        }
        self.current_step -= 1;
        true
    }

    /// Editing on the final step → Submitting.
    pub fn begin_submission(&mut self) -> Result<(), WizardError> {
        self.ensure_editing()?;
        if !self.is_final_step() {
            return Err(WizardError::NotAtFinalStep);
        }
        self.transition(WizardPhase::Submitting);
        Ok(())
    }

    /// Submitting → Editing, staying on the final step.
    pub fn submission_failed(&mut self) {
        self.transition(WizardPhase::Editing);
    }

    /// Submitting → Completed.
    pub fn submission_succeeded(&mut self) {
        self.transition(WizardPhase::Completed);
    }

    fn ensure_editing(&self) -> Result<(), WizardError> {
        match self.phase {
            WizardPhase::Editing => Ok(()),
            WizardPhase::Submitting => Err(WizardError::AlreadySubmitting),
            WizardPhase::Completed => Err(WizardError::AlreadyCompleted),
        }
    }

    fn transition(&mut self, target: WizardPhase) {
        if self.phase.can_transition_to(target) {
            self.phase = target;
        } else {
            tracing::warn!(from = %self.phase, to = %target, "Ignoring invalid wizard transition");
        }
    }
}
