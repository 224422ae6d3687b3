//! Error types for Krushi Mitra.
//!
//! Validation failures are not errors: they come back as
//! [`ValidationErrors`](crate::onboarding::ValidationErrors) values. The types
//! here cover misuse of the wizard API and infrastructure failures.

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Preference store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Misuse of the wizard controller.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("Onboarding can only be completed from the review step (current step: {step})")]
    NotAtReview { step: u8 },

    #[error("Onboarding was already completed")]
    AlreadyCompleted,
}

/// A raw field update that could not be applied to the draft.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("'{value}' is not a valid option for {field}")]
    UnknownOption { field: String, value: String },

    #[error("{field} can only be set by location acquisition")]
    NotEditable { field: String },
}
