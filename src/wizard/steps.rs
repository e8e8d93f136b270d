//! The concrete step schemas of the player and coach signup wizards, plus
//! the login form.

use serde::{Deserialize, Serialize};

use super::profile::Role;
use super::schema::{FieldKind, FieldSchema, Rule, StepSchema};
use crate::reference::{
    AGE_GROUPS, CHESS_TITLES, COUNTRIES, EXPERIENCE_BANDS, EXPERTISE_AREAS, LEARNING_GOALS,
    PLAY_STYLES, PREFERRED_LEVELS, SKILL_LEVELS, TIMEZONES,
};

/// Field names shared by code outside the schemas.
pub mod fields {
    pub const FULL_NAME: &str = "fullName";
    pub const EMAIL: &str = "email";
    pub const PASSWORD: &str = "password";
    pub const AVAILABILITY: &str = "availability";
}

const URL_MESSAGE: &str = "Please enter a valid URL";
const SCHEME_MESSAGE: &str = "URL must start with http:// or https://";

/// Account details: shared first step of both wizards.
pub fn account_details() -> StepSchema {
    StepSchema::new(
        "Account details",
        vec![
            FieldSchema::new(fields::FULL_NAME, "Full name", FieldKind::Text)
                .required("Full name is required")
                .rule(Rule::min_length(1, "Full name is required")),
            FieldSchema::new(fields::EMAIL, "Email", FieldKind::Text)
                .required("Invalid email address")
                .rule(Rule::email("Invalid email address")),
            FieldSchema::new(fields::PASSWORD, "Password", FieldKind::Text)
                .required("Password must be at least 8 characters")
                .rule(Rule::min_length(8, "Password must be at least 8 characters"))
                .rule(Rule::pattern(
                    "[A-Z]",
                    "Password must contain at least one uppercase letter",
                ))
                .rule(Rule::pattern(
                    "[a-z]",
                    "Password must contain at least one lowercase letter",
                ))
                .rule(Rule::pattern("[0-9]", "Password must contain at least one number")),
        ],
    )
}

/// Player step 2.
pub fn personal_info() -> StepSchema {
    StepSchema::new(
        "Personal information",
        vec![
            FieldSchema::new("ageGroup", "Age group", FieldKind::Choice)
                .required("Age group is required")
                .options(AGE_GROUPS)
                .rule(Rule::one_of()),
            // Checked against the country list by the front end only.
            FieldSchema::new("country", "Country", FieldKind::Text)
                .required("Country is required")
                .options(COUNTRIES),
            FieldSchema::new("timezone", "Timezone", FieldKind::Text)
                .required("Timezone is required")
                .options(TIMEZONES),
        ],
    )
}

/// Player step 3.
pub fn chess_background() -> StepSchema {
    StepSchema::new(
        "Chess background",
        vec![
            FieldSchema::new("skillLevel", "Skill level", FieldKind::Choice)
                .required("Skill level is required")
                .options(SKILL_LEVELS)
                .rule(Rule::one_of()),
            FieldSchema::new("playStyle", "Play style", FieldKind::Choice)
                .required("Play style is required")
                .options(PLAY_STYLES)
                .rule(Rule::one_of()),
            FieldSchema::new("learningGoals", "Learning goals", FieldKind::MultiChoice)
                .required("Select at least one learning goal")
                .options(LEARNING_GOALS)
                .rule(Rule::min_items(1, "Select at least one learning goal"))
                .rule(Rule::one_of()),
        ],
    )
}

/// Coach step 2.
pub fn professional_details() -> StepSchema {
    StepSchema::new(
        "Professional details",
        vec![
            FieldSchema::new("chessTitle", "Chess title", FieldKind::Choice)
                .optional()
                .options(CHESS_TITLES)
                .rule(Rule::one_of()),
            FieldSchema::new("experience", "Coaching experience", FieldKind::Choice)
                .required("Experience is required")
                .options(EXPERIENCE_BANDS)
                .rule(Rule::one_of()),
            FieldSchema::new("expertise", "Areas of expertise", FieldKind::MultiChoice)
                .required("Select at least one area of expertise")
                .options(EXPERTISE_AREAS)
                .rule(Rule::min_items(1, "Select at least one area of expertise"))
                .rule(Rule::one_of()),
        ],
    )
}

/// Coach step 3.
pub fn availability() -> StepSchema {
    StepSchema::new(
        "Availability & rates",
        vec![
            FieldSchema::new("preferredLevel", "Preferred student level", FieldKind::MultiChoice)
                .required("Select at least one preferred level")
                .options(PREFERRED_LEVELS)
                .rule(Rule::min_items(1, "Select at least one preferred level"))
                .rule(Rule::one_of()),
            FieldSchema::new("hourlyRate", "Hourly rate", FieldKind::Number)
                .required("Hourly rate is required")
                .rule(Rule::min_number(1.0, "Hourly rate is required")),
            FieldSchema::new(fields::AVAILABILITY, "Weekly availability", FieldKind::Availability)
                .required("Select at least one availability slot")
                .rule(Rule::min_items(1, "Select at least one availability slot")),
        ],
    )
}

/// Coach step 4: every field optional, every URL must be http(s).
pub fn additional_info() -> StepSchema {
    let url_field = |name: &'static str, label: &'static str, kind: FieldKind| {
        FieldSchema::new(name, label, kind)
            .optional()
            .rule(Rule::url(URL_MESSAGE))
            .rule(Rule::http_scheme(SCHEME_MESSAGE))
    };
    StepSchema::new(
        "Additional information",
        vec![
            url_field("certifications", "Certifications", FieldKind::TextList),
            url_field("introVideo", "Introduction video", FieldKind::Text),
            url_field("portfolio", "Portfolio items", FieldKind::TextList),
        ],
    )
}

/// The single-step login form.
pub fn login_form() -> StepSchema {
    StepSchema::new(
        "Log in",
        vec![
            FieldSchema::new(fields::EMAIL, "Email", FieldKind::Text)
                .required("Invalid email address.")
                .rule(Rule::email("Invalid email address.")),
            FieldSchema::new(fields::PASSWORD, "Password", FieldKind::Text)
                .required("Password must be at least 8 characters.")
                .rule(Rule::min_length(8, "Password must be at least 8 characters.")),
        ],
    )
}

/// Which signup wizard is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardVariant {
    Player,
    Coach,
}

impl WizardVariant {
    pub fn role(&self) -> Role {
        match self {
            Self::Player => Role::Player,
            Self::Coach => Role::Coach,
        }
    }

    pub fn total_steps(&self) -> usize {
        match self {
            Self::Player => 3,
            Self::Coach => 4,
        }
    }

    /// Step schemas in order; `schemas()[k - 1]` is step `k`.
    pub fn schemas(&self) -> Vec<StepSchema> {
        match self {
            Self::Player => vec![account_details(), personal_info(), chess_background()],
            Self::Coach => vec![
                account_details(),
                professional_details(),
                availability(),
                additional_info(),
            ],
        }
    }
}

impl std::fmt::Display for WizardVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Coach => write!(f, "coach"),
        }
    }
}
