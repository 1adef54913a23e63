use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use invite_core::{
    Attendance, DietarySelection, EmailJsCredentials, EmailJsMailer, Invitation, Mailer,
    RsvpDialog, RsvpState, RsvpSubmission,
};
use owo_colors::OwoColorize;

use crate::render::Render;

pub struct RsvpArgs {
    pub name: String,
    pub email: String,
    pub attending: Attendance,
    pub guests: Option<u32>,
    pub dietary: Vec<String>,
    pub message: Option<String>,
}

impl RsvpArgs {
    fn into_submission(self, invitation: &Invitation) -> Result<RsvpSubmission> {
        let dietary = DietarySelection::from_values(&invitation.dietary, &self.dietary)
            .context("Use `invite dietary` to list the available options")?;

        Ok(RsvpSubmission {
            name: self.name,
            email: self.email,
            attendance: self.attending,
            guests: self.guests.or(Some(1)),
            dietary,
            message: self.message,
        })
    }
}

pub async fn run(invitation: &Invitation, args: RsvpArgs) -> Result<()> {
    let credentials = EmailJsCredentials::from_env()
        .context("Set the EmailJS variables before sending an RSVP")?;

    submit(invitation, EmailJsMailer::new(credentials), args).await
}

async fn submit<M: Mailer>(invitation: &Invitation, mailer: M, args: RsvpArgs) -> Result<()> {
    let submission = args.into_submission(invitation)?;

    let mut dialog = RsvpDialog::new(invitation, mailer);
    *dialog.form_mut() = submission;

    let spinner = sending_spinner(&invitation.email_event_name);
    let state = dialog.submit().await.clone();
    spinner.finish_and_clear();

    match state {
        RsvpState::Submitted => {
            println!("{}", state.render());
            Ok(())
        }
        RsvpState::Failed { .. } => {
            println!("{}", state.render());
            anyhow::bail!("RSVP was not sent")
        }
        _ => {
            println!("{}", "Please fix the following:".yellow());
            println!("{}", dialog.field_errors().render());
            anyhow::bail!("RSVP was not sent")
        }
    }
}

fn sending_spinner(event_name: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["🎈", "🎉", "🎂", "✨", "✓"])
        .template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(format!("Sending RSVP for {}", event_name));
    spinner.enable_steady_tick(std::time::Duration::from_millis(120));
    spinner
}
