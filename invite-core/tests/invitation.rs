use std::future::Future;
use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use invite_core::calendar::{export, export_all};
use invite_core::{
    Attendance, CalendarExport, CalendarTarget, DietaryPicker, Invitation, InviteResult, Mailer,
    RsvpDialog, RsvpEmail, RsvpState,
};
use invite_core::dietary::PickerKey;
use pretty_assertions::assert_eq;

const CONFIG: &str = include_str!("../fixtures/invitation.toml");

#[derive(Default)]
struct Outbox(Mutex<Vec<RsvpEmail>>);

impl Mailer for Outbox {
    fn send(&self, email: &RsvpEmail) -> impl Future<Output = InviteResult<()>> + Send {
        self.0.lock().unwrap().push(email.clone());
        async { Ok(()) }
    }
}

#[tokio::test]
async fn rsvp_with_picked_dietary_needs() {
    let invitation = Invitation::from_toml_str(CONFIG).unwrap();

    let mut picker = DietaryPicker::new(&invitation.dietary);
    picker.set_query("celiac");
    picker.key(PickerKey::Enter).unwrap();
    picker.set_query("peanut allergy");
    picker.key(PickerKey::Enter).unwrap();

    let mut dialog = RsvpDialog::new(&invitation, Outbox::default());
    {
        let form = dialog.form_mut();
        form.name = "Grace Hopper".to_string();
        form.email = "grace@example.com".to_string();
        form.attendance = Attendance::Yes;
        form.guests = Some(3);
        form.dietary = picker.into_selection();
    }

    assert_eq!(dialog.submit().await, &RsvpState::Submitted);

    let sent = dialog.mailer().0.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "RSVP: Grace Hopper - Attending Birthday Party");
    assert_eq!(
        sent[0].dietary_requirements,
        "🌾 Gluten-Free/Celiac, 🥜 Peanut Allergy"
    );
    assert_eq!(sent[0].event_date, "Sunday, August 10th, 2025");
    assert_eq!(sent[0].event_time, "3:00 PM - 4:30 PM");
}

#[test]
fn calendar_targets_agree_on_the_event_window() {
    let invitation = Invitation::from_toml_str(CONFIG).unwrap();
    let stamp = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();

    let ics = match export(&invitation, CalendarTarget::ICal, stamp).unwrap() {
        CalendarExport::File { contents, .. } => contents,
        other => panic!("expected an .ics file, got {:?}", other),
    };
    assert!(ics.contains("DTSTART;TZID=America/New_York:20250810T150000"));

    let google = match export(&invitation, CalendarTarget::Google, stamp).unwrap() {
        CalendarExport::Link { url, .. } => url,
        other => panic!("expected a link, got {:?}", other),
    };
    assert!(google.contains("dates=20250810T150000%2F20250810T163000"));
    assert!(google.contains("ctz=America%2FNew_York"));

    assert_eq!(export_all(&invitation, stamp).unwrap().len(), 6);
}

#[test]
fn page_uses_resolved_times() {
    let invitation = Invitation::from_toml_str(CONFIG).unwrap();
    let html = invite_core::page::render_page(&invitation).unwrap();
    assert!(html.contains(invitation.times.short_date()));
    assert!(html.contains(invitation.times.time_range()));
}
