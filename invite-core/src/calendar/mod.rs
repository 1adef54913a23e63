//! "Add to calendar" export.
//!
//! Apple and iCal get a downloadable `.ics` file; the web calendars get a
//! prefilled compose link.

mod ics;
mod links;

pub use ics::{generate_ics, ics_filename};
pub use links::{google_url, outlook_url, yahoo_url};

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{InviteError, InviteResult};
use crate::invitation::Invitation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CalendarTarget {
    Apple,
    Google,
    ICal,
    Microsoft365,
    OutlookCom,
    Yahoo,
}

impl CalendarTarget {
    /// Every target, in menu order.
    pub const ALL: [CalendarTarget; 6] = [
        CalendarTarget::Apple,
        CalendarTarget::Google,
        CalendarTarget::ICal,
        CalendarTarget::Microsoft365,
        CalendarTarget::OutlookCom,
        CalendarTarget::Yahoo,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CalendarTarget::Apple => "Apple",
            CalendarTarget::Google => "Google",
            CalendarTarget::ICal => "iCal",
            CalendarTarget::Microsoft365 => "Microsoft 365",
            CalendarTarget::OutlookCom => "Outlook.com",
            CalendarTarget::Yahoo => "Yahoo",
        }
    }

    /// Targets served by an `.ics` download rather than a link.
    pub fn is_file(self) -> bool {
        matches!(self, CalendarTarget::Apple | CalendarTarget::ICal)
    }
}

impl fmt::Display for CalendarTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for CalendarTarget {
    type Err = InviteError;

    /// Case-insensitive; punctuation and spaces are ignored, so
    /// `outlook.com`, `Outlook.com` and `outlookcom` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        match key.as_str() {
            "apple" => Ok(CalendarTarget::Apple),
            "google" => Ok(CalendarTarget::Google),
            "ical" | "ics" => Ok(CalendarTarget::ICal),
            "microsoft365" | "m365" | "office365" => Ok(CalendarTarget::Microsoft365),
            "outlookcom" | "outlook" => Ok(CalendarTarget::OutlookCom),
            "yahoo" => Ok(CalendarTarget::Yahoo),
            _ => Err(InviteError::CalendarExport(format!(
                "Unknown calendar target '{}'. Expected one of: {}",
                s,
                CalendarTarget::ALL
                    .iter()
                    .map(|t| t.label())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

/// What a calendar target produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarExport {
    Link {
        target: CalendarTarget,
        url: String,
    },
    File {
        target: CalendarTarget,
        filename: String,
        contents: String,
    },
}

impl CalendarExport {
    pub fn target(&self) -> CalendarTarget {
        match self {
            CalendarExport::Link { target, .. } | CalendarExport::File { target, .. } => *target,
        }
    }
}

/// Build the export for one target. `dtstamp` is only used by `.ics` files.
pub fn export(
    invitation: &Invitation,
    target: CalendarTarget,
    dtstamp: DateTime<Utc>,
) -> InviteResult<CalendarExport> {
    let url = match target {
        CalendarTarget::Apple | CalendarTarget::ICal => {
            return Ok(CalendarExport::File {
                target,
                filename: ics_filename(invitation),
                contents: generate_ics(invitation, dtstamp)?,
            });
        }
        CalendarTarget::Google => google_url(invitation)?,
        CalendarTarget::Microsoft365 | CalendarTarget::OutlookCom => {
            outlook_url(invitation, target)?
        }
        CalendarTarget::Yahoo => yahoo_url(invitation)?,
    };

    Ok(CalendarExport::Link { target, url })
}

/// Exports for every target, in menu order.
pub fn export_all(
    invitation: &Invitation,
    dtstamp: DateTime<Utc>,
) -> InviteResult<Vec<CalendarExport>> {
    CalendarTarget::ALL
        .iter()
        .map(|target| export(invitation, *target, dtstamp))
        .collect()
}
