//! Error types for chess-onboard.
//!
//! Field-level validation failures are not errors: they are reported as
//! [`crate::wizard::ValidationReport`] data and never leave the validator.

use std::time::Duration;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Could not determine a default path for {0}")]
    NoDefaultPath(String),
}

/// Errors from the auth API (login, logout, register, current user).
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Request rejected with status {status}")]
    Rejected {
        status: u16,
        /// The `message` field of the JSON error body, if the server sent one.
        message: Option<String>,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Not logged in")]
    NotAuthenticated,
}

impl AuthError {
    /// Human-readable message for a toast: the server's `message` when there
    /// is one, `fallback` otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Self::Timeout(_) => "The request timed out. Please try again.".to_string(),
            Self::Cancelled => "The request was cancelled.".to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::Http(e.to_string())
        }
    }
}

/// Persisted client store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Wizard misuse. These indicate a programming error in the caller, not bad
/// user input.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("Step {step} is out of range 1..={total}")]
    StepOutOfRange { step: usize, total: usize },

    #[error("Step {step} has no field named {field}")]
    UnknownField { step: usize, field: String },

    #[error("Field {field} expects a {expected} value")]
    FieldKindMismatch { field: String, expected: String },

    #[error("Submission is only possible from the final step")]
    NotAtFinalStep,

    #[error("A submission is already in flight")]
    AlreadySubmitting,

    #[error("The wizard has already completed")]
    AlreadyCompleted,
}

/// Development server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server stopped: {0}")]
    Serve(#[from] std::io::Error),
}

/// Terminal driver errors.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Wizard(#[from] WizardError),
}

/// Account directory errors of the development server. The display text is
/// the `message` returned to clients.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Email already registered")]
    DuplicateEmail,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Not authenticated")]
    Unauthenticated,
}
