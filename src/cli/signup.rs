//! Terminal driver for the signup wizards.
//!
//! Each step is filled field by field. A blank reply keeps the current value,
//! `:clear` unsets it, `:back` returns to the previous step and `:quit`
//! abandons the wizard. After a blocked advance only the failing fields are
//! asked again.

use std::collections::BTreeSet;

use tokio::io::AsyncBufRead;

use super::prompt::{Prompter, Reply};
use crate::auth::{AuthActions, User};
use crate::error::CliError;
use crate::reference::{self, Choice, DAYS_OF_WEEK, TIME_SLOTS};
use crate::wizard::availability::slots_for_day;
use crate::wizard::schema::FieldSchema;
use crate::wizard::{AdvanceOutcome, FieldKind, FieldValue, ValidationReport, WizardController};

/// How a signup session ended.
#[derive(Debug)]
pub enum SignupEnd {
    Registered(User),
    Quit,
}

enum StepInput {
    Done,
    Back,
    Quit,
}

/// Run `wizard` to completion against the terminal.
pub async fn run_signup<R, W>(
    prompter: &mut Prompter<R, W>,
    wizard: &mut WizardController,
    actions: &AuthActions,
) -> Result<SignupEnd, CliError>
where
    R: AsyncBufRead + Unpin,
    W: std::io::Write,
{
    prompter.say(format!(
        "{} signup. Blank keeps a value, :clear unsets it, :back goes back, :quit exits.",
        capitalize(&wizard.variant().to_string())
    ))?;
    let mut only: Option<BTreeSet<String>> = None;

    loop {
        let schema = wizard.current_schema().clone();
        prompter.say(format!(
            "\nStep {} of {}: {} ({:.0}% complete)",
            wizard.current_step(),
            wizard.total_steps(),
            schema.title,
            wizard.progress()
        ))?;

        let mut back = false;
        for field in &schema.fields {
            if only.as_ref().is_some_and(|names| !names.contains(field.name)) {
                continue;
            }
            match fill_field(prompter, wizard, field).await? {
                StepInput::Done => {}
                StepInput::Back => {
                    back = true;
                    break;
                }
                StepInput::Quit => return Ok(SignupEnd::Quit),
            }
        }
        if back {
            only = None;
            if !wizard.retreat() {
                prompter.say("Already at the first step.")?;
            }
            continue;
        }

        if wizard.is_final_step() {
            let result = actions.register(wizard).await?;
            if result.success {
                let user = actions.store().read().await.state().auth.user.clone();
                if let Some(user) = user {
                    prompter.say(format!("Welcome, {}! Your {} account is ready.", user.name, user.role))?;
                    return Ok(SignupEnd::Registered(user));
                }
            }
            if !wizard.errors().is_empty() {
                only = Some(report_errors(prompter, wizard.errors())?);
                continue;
            }
            prompter.say(format!(
                "Registration failed: {}",
                result.error.as_deref().unwrap_or("unknown error")
            ))?;
            match prompter.ask("Press Enter to retry, :back to edit, :quit to exit").await? {
                Reply::Quit => return Ok(SignupEnd::Quit),
                Reply::Back => {
                    wizard.retreat();
                    only = None;
                }
                // Retry re-offers the final step with every value kept.
                _ => only = Some(BTreeSet::new()),
            }
            continue;
        }

        match wizard.advance()? {
            AdvanceOutcome::Advanced { .. } | AdvanceOutcome::ReadyToSubmit => only = None,
            AdvanceOutcome::Blocked(report) => only = Some(report_errors(prompter, &report)?),
        }
    }
}

fn report_errors<R, W>(
    prompter: &mut Prompter<R, W>,
    report: &ValidationReport,
) -> Result<BTreeSet<String>, CliError>
where
    R: AsyncBufRead + Unpin,
    W: std::io::Write,
{
    prompter.say("Please fix the following:")?;
    for (field, message) in report.errors() {
        prompter.say(format!("  {field}: {message}"))?;
    }
    Ok(report.errors().keys().cloned().collect())
}

async fn fill_field<R, W>(
    prompter: &mut Prompter<R, W>,
    wizard: &mut WizardController,
    field: &FieldSchema,
) -> Result<StepInput, CliError>
where
    R: AsyncBufRead + Unpin,
    W: std::io::Write,
{
    if field.kind == FieldKind::Availability {
        return fill_availability(prompter, wizard, field).await;
    }
    let step = wizard.current_step();
    if !field.options.is_empty() {
        prompter.say(format_options(field.options))?;
    }
    loop {
        let current = wizard.current_form().get(field.name).map(FieldValue::display);
        let label = prompt_label(field, current.as_deref());
        match prompter.ask(&label).await? {
            Reply::Back => return Ok(StepInput::Back),
            Reply::Quit => return Ok(StepInput::Quit),
            Reply::Blank => return Ok(StepInput::Done),
            Reply::Clear => {
                wizard.clear_field(step, field.name)?;
                return Ok(StepInput::Done);
            }
            Reply::Value(input) => match parse_value(field, &input) {
                Ok(value) => {
                    wizard.set_field(step, field.name, value)?;
                    prompter.say(format!("  progress {:.0}%", wizard.progress()))?;
                    return Ok(StepInput::Done);
                }
                Err(message) => prompter.say(format!("  {message}"))?,
            },
        }
    }
}

async fn fill_availability<R, W>(
    prompter: &mut Prompter<R, W>,
    wizard: &mut WizardController,
    field: &FieldSchema,
) -> Result<StepInput, CliError>
where
    R: AsyncBufRead + Unpin,
    W: std::io::Write,
{
    prompter.say(format!("{}: toggle a slot with \"<day> <slot>\", blank line when done.", field.label))?;
    prompter.say(format!("  days: {}", numbered(DAYS_OF_WEEK)))?;
    prompter.say(format!("  slots: {}", numbered(TIME_SLOTS)))?;
    loop {
        match prompter.ask("  toggle").await? {
            Reply::Back => return Ok(StepInput::Back),
            Reply::Quit => return Ok(StepInput::Quit),
            Reply::Blank => return Ok(StepInput::Done),
            Reply::Clear => {
                wizard.clear_field(wizard.current_step(), field.name)?;
            }
            Reply::Value(input) => {
                let mut parts = input.split_whitespace();
                let day = parts.next().and_then(|d| pick(DAYS_OF_WEEK, d));
                let slot = parts.next().and_then(|s| pick(TIME_SLOTS, s));
                let (Some(day), Some(slot)) = (day, slot) else {
                    prompter.say("  Expected a day and a time slot, e.g. \"Monday 09:00-10:00\" or \"1 1\"")?;
                    continue;
                };
                let checked = !current_slots(wizard, field.name, day).iter().any(|s| s == slot);
                wizard.toggle_availability(day, slot, checked)?;
            }
        }
        let summary = wizard
            .current_form()
            .get(field.name)
            .map(FieldValue::display)
            .unwrap_or_default();
        let summary = if summary.is_empty() { "none".to_string() } else { summary };
        prompter.say(format!("  selected: {summary}"))?;
        prompter.say(format!("  progress {:.0}%", wizard.progress()))?;
    }
}

fn current_slots(wizard: &WizardController, name: &str, day: &str) -> Vec<String> {
    wizard
        .current_form()
        .get(name)
        .and_then(FieldValue::as_availability)
        .map(|entries| slots_for_day(entries, day).to_vec())
        .unwrap_or_default()
}

/// Turn one reply into a field value, or explain why it cannot be used.
///
/// Option lists accept a number, the value or the label. Unrecognised choice
/// input is passed through so the step schema reports it; country and
/// timezone are checked here, as the schema treats them as free text.
fn parse_value(field: &FieldSchema, input: &str) -> Result<FieldValue, String> {
    match field.kind {
        FieldKind::Text | FieldKind::Choice => {
            let value = choose(field.options, input);
            match field.name {
                "country" if !reference::is_known_country(&value) => {
                    Err("Select a country from the list".to_string())
                }
                "timezone" if !reference::is_known_timezone(&value) => {
                    Err("Select a timezone from the list".to_string())
                }
                _ => Ok(FieldValue::Text(value)),
            }
        }
        FieldKind::MultiChoice => Ok(FieldValue::List(
            split_list(input).map(|item| choose(field.options, item)).collect(),
        )),
        FieldKind::TextList => Ok(FieldValue::List(
            input.split_whitespace().map(String::from).collect(),
        )),
        FieldKind::Number => match input.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(FieldValue::Number(n)),
            _ => Err("Enter a number".to_string()),
        },
        FieldKind::Availability => Err("Use the slot toggles".to_string()),
    }
}

fn choose(options: &[Choice], input: &str) -> String {
    reference::resolve(options, input)
        .map(|c| c.value.to_string())
        .unwrap_or_else(|| input.to_string())
}

fn split_list(input: &str) -> impl Iterator<Item = &str> {
    input.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Match by 1-based index or case-insensitive text.
fn pick(items: &[&'static str], input: &str) -> Option<&'static str> {
    if let Ok(index) = input.parse::<usize>() {
        return index.checked_sub(1).and_then(|i| items.get(i)).copied();
    }
    items.iter().find(|item| item.eq_ignore_ascii_case(input)).copied()
}

fn numbered(items: &[&str]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}) {item}", i + 1))
        .collect::<Vec<_>>()
        .join("  ")
}

fn format_options(options: &[Choice]) -> String {
    let listed = options
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}) {}", i + 1, c.label))
        .collect::<Vec<_>>()
        .join("  ");
    format!("  options: {listed}")
}

fn prompt_label(field: &FieldSchema, current: Option<&str>) -> String {
    let mut label = field.label.to_string();
    if field.optional {
        label.push_str(" (optional)");
    }
    match field.kind {
        FieldKind::MultiChoice => label.push_str(" [comma separated]"),
        FieldKind::TextList => label.push_str(" [space separated]"),
        _ => {}
    }
    match current {
        // Never echo the password back.
        Some(_) if field.name == crate::wizard::steps::fields::PASSWORD => {
            label.push_str(" [set]");
        }
        Some(value) if !value.is_empty() => {
            label.push_str(&format!(" [{value}]"));
        }
        _ => {}
    }
    label
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
