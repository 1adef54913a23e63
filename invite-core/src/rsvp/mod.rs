//! RSVP responses: the submission form, its validation rules, and the
//! dialog's submission state machine.

mod dialog;
mod flow;

pub use dialog::{RESET_DELAY, RsvpDialog};
pub use flow::{RsvpEvent, RsvpState, transition};

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::dietary::DietarySelection;
use crate::error::InviteError;

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 50;
pub const MESSAGE_MAX_LEN: u64 = 500;
pub const DEFAULT_MAX_GUESTS: u32 = 8;

/// Whether the respondent is coming.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attendance {
    #[default]
    Yes,
    No,
}

impl Attendance {
    pub fn is_attending(self) -> bool {
        self == Attendance::Yes
    }
}

impl FromStr for Attendance {
    type Err = InviteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" | "true" => Ok(Attendance::Yes),
            "no" | "n" | "false" => Ok(Attendance::No),
            other => Err(InviteError::Config(format!(
                "attendance must be 'yes' or 'no', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Attendance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attendance::Yes => write!(f, "yes"),
            Attendance::No => write!(f, "no"),
        }
    }
}

/// Field name -> first failing message, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// Record a message for a field. The first message per field wins.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut field_errors = FieldErrors::default();
        for (field, errs) in errors.field_errors() {
            if let Some(first) = errs.first() {
                let msg = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                field_errors.insert(field.to_string(), msg);
            }
        }
        field_errors
    }
}

impl From<FieldErrors> for InviteError {
    fn from(errors: FieldErrors) -> Self {
        InviteError::Validation(errors)
    }
}

/// Length is counted on the trimmed name, the same text the email carries.
fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().chars().count();
    if len < NAME_MIN_LEN {
        return Err(ValidationError::new("length")
            .with_message(Cow::Borrowed("Name must be at least 2 characters")));
    }
    if len > NAME_MAX_LEN {
        return Err(ValidationError::new("length").with_message(Cow::Borrowed("Name too long")));
    }
    Ok(())
}

/// One RSVP response as entered on the form.
///
/// `Default` gives the form's initial state: attending, one guest, nothing
/// else filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct RsvpSubmission {
    #[validate(custom(function = "validate_name"))]
    pub name: String,

    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    pub attendance: Attendance,

    /// Total party size including the respondent. Ignored when not attending.
    pub guests: Option<u32>,

    /// Ignored when not attending.
    pub dietary: DietarySelection,

    #[validate(length(max = 500, message = "Message too long (max 500 characters)"))]
    pub message: Option<String>,
}

impl Default for RsvpSubmission {
    fn default() -> Self {
        RsvpSubmission {
            name: String::new(),
            email: String::new(),
            attendance: Attendance::Yes,
            guests: Some(1),
            dietary: DietarySelection::new(),
            message: None,
        }
    }
}

impl RsvpSubmission {
    /// Check every field, returning all failures at once.
    ///
    /// Guest count is only checked when attending; it must lie in
    /// `1..=max_guests`.
    pub fn check(&self, max_guests: u32) -> Result<(), FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::default(),
            Err(e) => FieldErrors::from(e),
        };

        if self.attendance.is_attending() {
            match self.guests {
                None | Some(0) => errors.insert("guests", "Must have at least 1 guest"),
                Some(n) if n > max_guests => {
                    errors.insert("guests", format!("Maximum {} guests allowed", max_guests))
                }
                Some(_) => {}
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// The message, if it has any non-whitespace content.
    pub fn message_text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }

    /// Clear every field back to the form defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
