//! Core types for an event invitation.
//!
//! This crate holds everything behind the invitation page and its two
//! interactive controls:
//! - `event_time` resolves the event's wall-clock window in its timezone
//! - `dietary` provides the allergy catalog and its fuzzy search
//! - `rsvp` validates responses and drives the submission state machine
//! - `email` builds the RSVP notification and sends it through EmailJS
//! - `calendar` exports the event as an `.ics` file or provider links
//! - `page` renders the static HTML page

pub mod calendar;
pub mod config;
pub mod dietary;
pub mod email;
pub mod error;
pub mod event_time;
pub mod invitation;
pub mod page;
pub mod rsvp;

pub use calendar::{CalendarExport, CalendarTarget};
pub use config::InvitationConfig;
pub use dietary::{DietaryCatalog, DietaryOption, DietaryPicker, DietarySelection};
pub use email::{EmailJsCredentials, EmailJsMailer, Mailer, RsvpEmail};
pub use error::{InviteError, InviteResult};
pub use event_time::{EventInstant, EventTimes, FormattedInstant};
pub use invitation::{Invitation, Venue};
pub use rsvp::{Attendance, FieldErrors, RsvpDialog, RsvpState, RsvpSubmission};
