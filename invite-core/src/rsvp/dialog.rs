//! Async driver for the RSVP dialog.

use std::time::Duration;

use super::{FieldErrors, RsvpEvent, RsvpState, RsvpSubmission, transition};
use crate::email::{Mailer, RsvpEmail};
use crate::invitation::Invitation;

/// How long the success state lingers before the form resets.
pub const RESET_DELAY: Duration = Duration::from_secs(3);

/// Owns the form and the submission state, and performs the single send.
pub struct RsvpDialog<'a, M> {
    invitation: &'a Invitation,
    mailer: M,
    state: RsvpState,
    form: RsvpSubmission,
    field_errors: FieldErrors,
    reset_delay: Duration,
}

impl<'a, M: Mailer> RsvpDialog<'a, M> {
    pub fn new(invitation: &'a Invitation, mailer: M) -> Self {
        RsvpDialog {
            invitation,
            mailer,
            state: RsvpState::default(),
            form: RsvpSubmission::default(),
            field_errors: FieldErrors::default(),
            reset_delay: RESET_DELAY,
        }
    }

    pub fn with_reset_delay(mut self, delay: Duration) -> Self {
        self.reset_delay = delay;
        self
    }

    pub fn state(&self) -> &RsvpState {
        &self.state
    }

    pub fn form(&self) -> &RsvpSubmission {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut RsvpSubmission {
        &mut self.form
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    fn apply(&mut self, event: RsvpEvent) {
        let next = transition(&self.state, &event);
        if next != self.state {
            tracing::debug!(from = ?self.state, to = ?next, ?event, "RSVP state change");
        }
        self.state = next;
    }

    /// Validate the form and, if it passes, send it.
    ///
    /// Field errors leave the state untouched. A submit while a send is in
    /// flight, or after success, is ignored.
    pub async fn submit(&mut self) -> &RsvpState {
        if self.state.is_busy() {
            tracing::debug!("Ignoring submit while a send is in flight");
            return &self.state;
        }

        match self.form.check(self.invitation.max_guests) {
            Ok(()) => {
                self.field_errors.clear();
                self.apply(RsvpEvent::Submit { valid: true });
            }
            Err(errors) => {
                tracing::debug!(%errors, "RSVP failed validation");
                self.field_errors = errors;
                self.apply(RsvpEvent::Submit { valid: false });
                return &self.state;
            }
        }

        if self.state != RsvpState::Submitting {
            return &self.state;
        }

        let email = RsvpEmail::build(self.invitation, &self.form);
        tracing::info!(subject = %email.subject, "Sending RSVP");

        let outcome = match self.mailer.send(&email).await {
            Ok(()) => RsvpEvent::Delivered,
            Err(e) => {
                tracing::warn!(error = %e, "RSVP delivery failed");
                RsvpEvent::DeliveryFailed(e.to_string())
            }
        };
        self.apply(outcome);

        &self.state
    }

    /// After a successful send, wait out the reset delay, then clear the form
    /// and return to idle. Does nothing in any other state.
    pub async fn auto_reset(&mut self) {
        if self.state != RsvpState::Submitted {
            return;
        }

        tokio::time::sleep(self.reset_delay).await;

        if self.state == RsvpState::Submitted {
            self.apply(RsvpEvent::ResetElapsed);
            self.clear_form();
        }
    }

    /// Close the dialog: back to idle with an empty form.
    pub fn close(&mut self) {
        self.apply(RsvpEvent::Close);
        self.clear_form();
    }

    fn clear_form(&mut self) {
        self.form.reset();
        self.field_errors.clear();
    }
}
