//! Colored terminal rendering for invitation types.

use invite_core::{CalendarExport, DietaryOption, FieldErrors, RsvpState};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for RsvpState {
    fn render(&self) -> String {
        match self {
            RsvpState::Idle => "Not sent".dimmed().to_string(),
            RsvpState::Submitting => "Sending...".yellow().to_string(),
            RsvpState::Submitted => format!("{} {}", "✓".green(), self.describe().green()),
            RsvpState::Failed { message } => format!("{} {}", "✗".red(), message.red()),
        }
    }
}

impl Render for FieldErrors {
    fn render(&self) -> String {
        self.iter()
            .map(|(field, message)| format!("   {} {}", format!("{}:", field).bold(), message.red()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Render for DietaryOption {
    fn render(&self) -> String {
        format!("{} {}", self.label, format!("({})", self.value).dimmed())
    }
}

impl Render for CalendarExport {
    fn render(&self) -> String {
        match self {
            CalendarExport::Link { target, url } => {
                format!("{}\n   {}", target.label().bold(), url.cyan())
            }
            CalendarExport::File { target, filename, .. } => {
                format!(
                    "{}\n   {} {}",
                    target.label().bold(),
                    filename.cyan(),
                    "(use --target to write it)".dimmed()
                )
            }
        }
    }
}

/// Label/value pair for the details listing.
pub fn field(label: &str, value: impl std::fmt::Display) -> String {
    format!("{:<16} {}", format!("{}:", label).dimmed(), value)
}
