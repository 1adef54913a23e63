//! `.ics` file generation.

use chrono::{DateTime, NaiveDateTime, Offset, TimeDelta, Utc};
use chrono_tz::{OffsetComponents, Tz};
use icalendar::{Calendar, Component, EventLike, Property};
use uuid::Uuid;

use crate::error::InviteResult;
use crate::invitation::Invitation;

const PRODID: &str = "-//invite//Event Invitation//EN";

/// Single-event calendar for the invitation.
///
/// Start and end are written as local wall-clock times with a `TZID`
/// parameter. A matching `VTIMEZONE` describes the offsets in force
/// between start and end.
pub fn generate_ics(invitation: &Invitation, dtstamp: DateTime<Utc>) -> InviteResult<String> {
    let mut cal = Calendar::new();
    let details = &invitation.calendar;
    let tzid = invitation.instant.timezone().name();

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event_uid(invitation));
    ics_event.summary(&details.title);
    ics_event.add_property("DTSTAMP", dtstamp.format("%Y%m%dT%H%M%SZ").to_string());

    add_local_datetime(&mut ics_event, "DTSTART", invitation.instant.start(), tzid);
    add_local_datetime(&mut ics_event, "DTEND", invitation.instant.end(), tzid);

    ics_event.description(&details.description);
    ics_event.location(&details.location);

    if let Some(url) = invitation.venue.website_url() {
        ics_event.add_property("URL", url);
    }

    let ics_event = ics_event.done();
    cal.push(ics_event);
    let cal = cal.done();

    let ics = strip_ics_bloat(&cal.to_string());
    let tz_block = vtimezone(&invitation.times.start().zoned(), &invitation.times.end().zoned());
    Ok(ics.replacen("BEGIN:VEVENT\r\n", &format!("{}BEGIN:VEVENT\r\n", tz_block), 1))
}

/// Minimal `VTIMEZONE` for the window `start..end`: one observance for the
/// offset at `start`, plus a second one if the offset changes before `end`.
fn vtimezone(start: &DateTime<Tz>, end: &DateTime<Tz>) -> String {
    let mut out = String::new();
    out.push_str("BEGIN:VTIMEZONE\r\n");
    out.push_str(&format!("TZID:{}\r\n", start.timezone().name()));

    let from = offset_seconds(start);
    out.push_str(&observance(start, from, NaiveDateTime::default()));

    if offset_seconds(end) != from {
        let change = offset_change(start, end);
        let local_before = change.naive_utc() + TimeDelta::seconds(i64::from(from));
        out.push_str(&observance(&change, from, local_before));
    }

    out.push_str("END:VTIMEZONE\r\n");
    out
}

fn observance(at: &DateTime<Tz>, offset_from: i32, dtstart: NaiveDateTime) -> String {
    let kind = if at.offset().dst_offset() == TimeDelta::zero() {
        "STANDARD"
    } else {
        "DAYLIGHT"
    };
    format!(
        "BEGIN:{kind}\r\nDTSTART:{}\r\nTZOFFSETFROM:{}\r\nTZOFFSETTO:{}\r\nEND:{kind}\r\n",
        dtstart.format("%Y%m%dT%H%M%S"),
        format_offset(offset_from),
        format_offset(offset_seconds(at)),
    )
}

fn offset_seconds(at: &DateTime<Tz>) -> i32 {
    at.offset().fix().local_minus_utc()
}

/// First instant in `start..=end` carrying `end`'s offset.
fn offset_change(start: &DateTime<Tz>, end: &DateTime<Tz>) -> DateTime<Tz> {
    let tz = start.timezone();
    let target = offset_seconds(end);
    let mut lo = start.with_timezone(&Utc);
    let mut hi = end.with_timezone(&Utc);

    while hi - lo > TimeDelta::seconds(1) {
        let mid = lo + (hi - lo) / 2;
        if offset_seconds(&mid.with_timezone(&tz)) == target {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    hi.with_timezone(&tz)
}

/// `-14400` -> `-0400`
fn format_offset(seconds: i32) -> String {
    let sign = if seconds < 0 { '-' } else { '+' };
    let abs = seconds.unsigned_abs();
    format!("{}{:02}{:02}", sign, abs / 3600, (abs % 3600) / 60)
}

/// Deterministic for a given title, start and location.
fn event_uid(invitation: &Invitation) -> String {
    let key = format!(
        "{}|{}|{}",
        invitation.calendar.title,
        invitation.times.start_iso(),
        invitation.calendar.location
    );
    format!("{}@invite", Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()))
}

fn add_local_datetime(
    ics_event: &mut icalendar::Event,
    name: &str,
    local: NaiveDateTime,
    tzid: &str,
) {
    let mut prop = Property::new(name, local.format("%Y%m%dT%H%M%S").to_string());
    prop.add_parameter("TZID", tzid);
    ics_event.append_property(prop);
}

/// - Replace the icalendar crate's PRODID with ours
/// - Drop CALSCALE:GREGORIAN (it's the default)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(PRODID);
            result.push_str("\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

/// `2025-08-10T1500__tiferet-nagarpowers-birthday-party-at-cool-crafts.ics`
pub fn ics_filename(invitation: &Invitation) -> String {
    format!(
        "{}__{}.ics",
        invitation.instant.start().format("%Y-%m-%dT%H%M"),
        slugify(&invitation.calendar.title)
    )
}

/// Lowercase, alphanumerics only, runs of anything else collapsed to `-`.
fn slugify(s: &str) -> String {
    let slug = s
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .take(50)
        .collect::<String>();

    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "event".to_string()
    } else {
        slug.to_string()
    }
}
