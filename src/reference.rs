//! Static reference data shown as choices in the signup forms.

/// A selectable option: wire value plus display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

const fn choice(value: &'static str, label: &'static str) -> Choice {
    Choice { value, label }
}

pub const COUNTRIES: &[Choice] = &[
    choice("us", "United States"),
    choice("uk", "United Kingdom"),
    choice("ca", "Canada"),
    choice("au", "Australia"),
    choice("de", "Germany"),
    choice("fr", "France"),
    choice("it", "Italy"),
    choice("es", "Spain"),
    choice("in", "India"),
];

pub const TIMEZONES: &[Choice] = &[
    choice("America/New_York", "America/New_York"),
    choice("America/Los_Angeles", "America/Los_Angeles"),
    choice("America/Chicago", "America/Chicago"),
    choice("America/Denver", "America/Denver"),
    choice("America/Phoenix", "America/Phoenix"),
    choice("Europe/London", "Europe/London"),
    choice("Europe/Berlin", "Europe/Berlin"),
    choice("Asia/Kolkata", "Asia/Kolkata"),
    choice("Australia/Sydney", "Australia/Sydney"),
];

pub const AGE_GROUPS: &[Choice] = &[
    choice("age_under_10", "under 10"),
    choice("age_10_14", "10-14"),
    choice("age_15_18", "15-18"),
    choice("age_over_18", "18+"),
];

pub const SKILL_LEVELS: &[Choice] = &[
    choice("beginner", "Beginner"),
    choice("intermediate", "Intermediate"),
    choice("advanced", "Advanced"),
    choice("master", "Master"),
];

pub const PLAY_STYLES: &[Choice] = &[
    choice("defensive", "Defensive"),
    choice("aggressive", "Aggressive"),
    choice("balanced", "Balanced"),
];

pub const LEARNING_GOALS: &[Choice] = &[
    choice("openings", "Openings"),
    choice("endgame", "Endgame"),
    choice("puzzles", "Puzzles"),
    choice("tournament", "Tournament preparation"),
];

pub const CHESS_TITLES: &[Choice] = &[
    choice("GM", "Grandmaster"),
    choice("IM", "International Master"),
    choice("FM", "FIDE Master"),
    choice("NM", "National Master"),
    choice("None", "None"),
];

pub const EXPERIENCE_BANDS: &[Choice] = &[
    choice("experience_under_1", "Less than 1 year"),
    choice("experience_1_3", "1-3 years"),
    choice("experience_3_5", "3-5 years"),
    choice("experience_over_5", "More than 5 years"),
];

pub const EXPERTISE_AREAS: &[Choice] = &[
    choice("openings", "Openings"),
    choice("middle_game", "Middle game"),
    choice("endgame", "Endgame"),
    choice("tournament", "Tournament preparation"),
    choice("rapid_blitz", "Rapid & blitz"),
];

pub const PREFERRED_LEVELS: &[Choice] = &[
    choice("beginner", "Beginner"),
    choice("intermediate", "Intermediate"),
    choice("advanced", "Advanced"),
];

pub const DAYS_OF_WEEK: &[&str] = &[
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub const TIME_SLOTS: &[&str] = &[
    "09:00-10:00",
    "10:00-11:00",
    "11:00-12:00",
    "12:00-13:00",
    "13:00-14:00",
    "14:00-15:00",
    "15:00-16:00",
    "16:00-17:00",
    "17:00-18:00",
];

/// Whether `value` is one of the listed country codes.
pub fn is_known_country(value: &str) -> bool {
    COUNTRIES.iter().any(|c| c.value == value)
}

/// Whether `value` is one of the listed timezones.
pub fn is_known_timezone(value: &str) -> bool {
    TIMEZONES.iter().any(|c| c.value == value)
}

/// Look up a choice by wire value, case-insensitively, or by its position
/// (1-based) in the list. Used by the terminal driver.
pub fn resolve<'a>(choices: &'a [Choice], input: &str) -> Option<&'a Choice> {
    let input = input.trim();
    if let Ok(index) = input.parse::<usize>() {
        return index.checked_sub(1).and_then(|i| choices.get(i));
    }
    choices
        .iter()
        .find(|c| c.value.eq_ignore_ascii_case(input) || c.label.eq_ignore_ascii_case(input))
}

/// Wire values of a choice list.
pub fn values(choices: &[Choice]) -> Vec<&'static str> {
    choices.iter().map(|c| c.value).collect()
}
