//! Submission state machine for the RSVP dialog.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RsvpState {
    #[default]
    Idle,
    Submitting,
    Submitted,
    Failed {
        message: String,
    },
}

impl RsvpState {
    pub fn is_busy(&self) -> bool {
        matches!(self, RsvpState::Submitting)
    }

    /// Short user-facing description of the state.
    pub fn describe(&self) -> &str {
        match self {
            RsvpState::Idle => "Ready",
            RsvpState::Submitting => "Sending...",
            RsvpState::Submitted => "RSVP sent successfully!",
            RsvpState::Failed { message } => message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RsvpEvent {
    /// The user pressed submit. `valid` is the outcome of field validation.
    Submit { valid: bool },
    /// The email collaborator acknowledged the send.
    Delivered,
    /// The send failed for any reason.
    DeliveryFailed(String),
    /// The post-success delay ran out.
    ResetElapsed,
    /// The dialog was closed or reset.
    Close,
}

/// Next state for `event` in `state`. Pairs with no defined transition leave
/// the state unchanged.
pub fn transition(state: &RsvpState, event: &RsvpEvent) -> RsvpState {
    use RsvpEvent as E;
    use RsvpState as S;

    match (state, event) {
        (_, E::Close) => S::Idle,

        (S::Idle | S::Failed { .. }, E::Submit { valid: true }) => S::Submitting,

        (S::Submitting, E::Delivered) => S::Submitted,
        (S::Submitting, E::DeliveryFailed(message)) => S::Failed {
            message: message.clone(),
        },

        (S::Submitted, E::ResetElapsed) => S::Idle,

        (current, _) => current.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn failed() -> RsvpState {
        RsvpState::Failed {
            message: "boom".to_string(),
        }
    }

    #[test]
    fn test_happy_path() {
        let s = transition(&RsvpState::Idle, &RsvpEvent::Submit { valid: true });
        assert_eq!(s, RsvpState::Submitting);
        let s = transition(&s, &RsvpEvent::Delivered);
        assert_eq!(s, RsvpState::Submitted);
        let s = transition(&s, &RsvpEvent::ResetElapsed);
        assert_eq!(s, RsvpState::Idle);
    }

    #[test]
    fn test_invalid_submit_stays_put() {
        let invalid = RsvpEvent::Submit { valid: false };
        assert_eq!(transition(&RsvpState::Idle, &invalid), RsvpState::Idle);
        assert_eq!(transition(&failed(), &invalid), failed());
    }

    #[test]
    fn test_failure_and_retry() {
        let s = transition(
            &RsvpState::Submitting,
            &RsvpEvent::DeliveryFailed("boom".to_string()),
        );
        assert_eq!(s, failed());
        assert_eq!(
            transition(&s, &RsvpEvent::Submit { valid: true }),
            RsvpState::Submitting
        );
    }

    #[test]
    fn test_submit_while_submitting_is_ignored() {
        assert_eq!(
            transition(&RsvpState::Submitting, &RsvpEvent::Submit { valid: true }),
            RsvpState::Submitting
        );
    }

    #[test]
    fn test_close_always_returns_to_idle() {
        for state in [
            RsvpState::Idle,
            RsvpState::Submitting,
            RsvpState::Submitted,
            failed(),
        ] {
            assert_eq!(transition(&state, &RsvpEvent::Close), RsvpState::Idle);
        }
    }

    #[test]
    fn test_stray_events_are_ignored() {
        assert_eq!(
            transition(&RsvpState::Idle, &RsvpEvent::Delivered),
            RsvpState::Idle
        );
        assert_eq!(
            transition(&RsvpState::Submitted, &RsvpEvent::Submit { valid: true }),
            RsvpState::Submitted
        );
        assert_eq!(
            transition(&failed(), &RsvpEvent::ResetElapsed),
            failed()
        );
    }
}
