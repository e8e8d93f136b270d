//! Overall completion percentage across the wizard.
//!
//! Steps already passed earn their full band of `100 / total_steps` points
//! regardless of how they were filled; the active step earns the filled share
//! of its declared fields.

use super::field::StepForm;
use super::schema::StepSchema;

/// Credit for the steps before `current_step`.
pub fn base_progress(current_step: usize, total_steps: usize) -> f64 {
    if total_steps == 0 {
        return 0.0;
    }
    (current_step.saturating_sub(1) as f64 / total_steps as f64) * 100.0
}

/// Number of declared fields of `schema` that hold a filled value in `form`.
pub fn filled_fields(form: &StepForm, schema: &StepSchema) -> usize {
    schema
        .fields
        .iter()
        .filter(|field| form.is_filled(field.name))
        .count()
}

/// Progress in `[0, 100]` with `form` as the active step's collection.
pub fn calculate(
    current_step: usize,
    total_steps: usize,
    form: &StepForm,
    schema: &StepSchema,
) -> f64 {
    if total_steps == 0 {
        return 0.0;
    }
    let band = 100.0 / total_steps as f64;
    let share = filled_fields(form, schema) as f64 / schema.field_count() as f64;
    (base_progress(current_step, total_steps) + share * band).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::field::FieldValue;
    use crate::wizard::steps::{account_details, additional_info, chess_background};

    #[test]
    fn empty_first_step_is_zero() {
        assert_eq!(calculate(1, 3, &StepForm::new(), &account_details()), 0.0);
    }

    #[test]
    fn base_credit_ignores_fill() {
        assert_eq!(base_progress(1, 4), 0.0);
        assert_eq!(base_progress(2, 4), 25.0);
        assert_eq!(base_progress(4, 4), 75.0);
        assert_eq!(calculate(3, 4, &StepForm::new(), &additional_info()), 50.0);
    }

    #[test]
    fn active_step_fills_its_band() {
        let schema = account_details();
        let mut form = StepForm::new();
        form.set("fullName", "Jane".into());
        let one_third = calculate(1, 3, &form, &schema);
        assert!((one_third - 100.0 / 9.0).abs() < 1e-9);

        form.set("email", "jane@x.com".into());
        form.set("password", "whatever".into());
        let full = calculate(1, 3, &form, &schema);
        assert!((full - 100.0 / 3.0).abs() < 1e-9);

        // Clearing a field moves progress back down within the band.
        form.set("email", "   ".into());
        assert!(calculate(1, 3, &form, &schema) < full);
    }

    #[test]
    fn undeclared_fields_do_not_count() {
        let mut form = StepForm::new();
        form.set("username", "jdoe".into());
        assert_eq!(calculate(1, 3, &form, &account_details()), 0.0);
    }

    #[test]
    fn last_step_full_is_one_hundred() {
        let mut form = StepForm::new();
        form.set("skillLevel", "beginner".into());
        form.set("playStyle", "balanced".into());
        form.set("learningGoals", FieldValue::List(vec!["openings".into()]));
        assert_eq!(calculate(3, 3, &form, &chess_background()), 100.0);
    }

    #[test]
    fn bounded_for_out_of_range_steps() {
        let mut form = StepForm::new();
        form.set("skillLevel", "beginner".into());
        let p = calculate(7, 3, &form, &chess_background());
        assert!((0.0..=100.0).contains(&p));
        assert_eq!(calculate(1, 0, &form, &chess_background()), 0.0);
    }
}
