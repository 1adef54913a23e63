//! Error types for invitation operations.

use thiserror::Error;

use crate::rsvp::FieldErrors;

/// Errors that can occur while building or using an invitation.
#[derive(Error, Debug)]
pub enum InviteError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Event must end after it starts ({start} >= {end})")]
    InvalidEventWindow { start: String, end: String },

    #[error("Unknown dietary option: {0}")]
    UnknownDietaryOption(String),

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Email delivery failed: {0}")]
    EmailDelivery(String),

    #[error("Calendar export error: {0}")]
    CalendarExport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for invitation operations.
pub type InviteResult<T> = Result<T, InviteError>;
