//! Prefilled "add event" links for the web calendars.

use chrono::Utc;
use url::Url;

use super::CalendarTarget;
use crate::error::{InviteError, InviteResult};
use crate::invitation::Invitation;

const GOOGLE_BASE: &str = "https://calendar.google.com/calendar/render";
const OUTLOOK_LIVE_BASE: &str = "https://outlook.live.com/calendar/0/action/compose";
const OUTLOOK_OFFICE_BASE: &str = "https://outlook.office.com/calendar/0/action/compose";
const YAHOO_BASE: &str = "https://calendar.yahoo.com/";

fn build(base: &str, params: &[(&str, &str)]) -> InviteResult<String> {
    Url::parse_with_params(base, params)
        .map(String::from)
        .map_err(|e| InviteError::CalendarExport(format!("Invalid calendar URL {}: {}", base, e)))
}

/// Google takes local wall-clock times plus the zone name in `ctz`.
pub fn google_url(invitation: &Invitation) -> InviteResult<String> {
    let details = &invitation.calendar;
    let dates = format!(
        "{}/{}",
        invitation.instant.start().format("%Y%m%dT%H%M%S"),
        invitation.instant.end().format("%Y%m%dT%H%M%S")
    );

    build(
        GOOGLE_BASE,
        &[
            ("action", "TEMPLATE"),
            ("text", details.title.as_str()),
            ("dates", dates.as_str()),
            ("ctz", invitation.instant.timezone().name()),
            ("details", details.description.as_str()),
            ("location", details.location.as_str()),
        ],
    )
}

/// Outlook compose deeplink. `target` picks the consumer (Outlook.com) or
/// work (Microsoft 365) host; anything else is an error.
pub fn outlook_url(invitation: &Invitation, target: CalendarTarget) -> InviteResult<String> {
    let base = match target {
        CalendarTarget::OutlookCom => OUTLOOK_LIVE_BASE,
        CalendarTarget::Microsoft365 => OUTLOOK_OFFICE_BASE,
        other => {
            return Err(InviteError::CalendarExport(format!(
                "{} is not an Outlook calendar",
                other
            )));
        }
    };
    let details = &invitation.calendar;

    build(
        base,
        &[
            ("path", "/calendar/action/compose"),
            ("rru", "addevent"),
            ("startdt", invitation.times.start_iso()),
            ("enddt", invitation.times.end_iso()),
            ("subject", details.title.as_str()),
            ("body", details.description.as_str()),
            ("location", details.location.as_str()),
            ("allday", "false"),
        ],
    )
}

/// Yahoo only understands UTC.
pub fn yahoo_url(invitation: &Invitation) -> InviteResult<String> {
    let details = &invitation.calendar;
    let utc = |instant: &crate::event_time::FormattedInstant| {
        instant
            .zoned()
            .with_timezone(&Utc)
            .format("%Y%m%dT%H%M%SZ")
            .to_string()
    };
    let start = utc(invitation.times.start());
    let end = utc(invitation.times.end());

    build(
        YAHOO_BASE,
        &[
            ("v", "60"),
            ("title", details.title.as_str()),
            ("st", start.as_str()),
            ("et", end.as_str()),
            ("desc", details.description.as_str()),
            ("in_loc", details.location.as_str()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invitation::tests::sample;
    use pretty_assertions::assert_eq;

    fn param(url: &str, key: &str) -> Option<String> {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn test_google_link() {
        let url = google_url(&sample()).unwrap();
        assert!(url.starts_with("https://calendar.google.com/calendar/render?action=TEMPLATE"));
        assert_eq!(
            param(&url, "dates").as_deref(),
            Some("20250810T150000/20250810T163000")
        );
        assert_eq!(param(&url, "ctz").as_deref(), Some("America/New_York"));
        assert_eq!(
            param(&url, "location").as_deref(),
            Some("Cool Crafts of Long Island, 3443 Merrick Rd, Wantagh, NY 11793")
        );
    }

    #[test]
    fn test_outlook_hosts_and_offsets() {
        let invitation = sample();
        let live = outlook_url(&invitation, CalendarTarget::OutlookCom).unwrap();
        let office = outlook_url(&invitation, CalendarTarget::Microsoft365).unwrap();

        assert!(live.starts_with("https://outlook.live.com/"));
        assert!(office.starts_with("https://outlook.office.com/"));
        assert_eq!(
            param(&live, "startdt").as_deref(),
            Some("2025-08-10T15:00:00-04:00")
        );
        assert_eq!(
            param(&office, "enddt").as_deref(),
            Some("2025-08-10T16:30:00-04:00")
        );
        assert_eq!(param(&live, "rru").as_deref(), Some("addevent"));

        assert!(outlook_url(&invitation, CalendarTarget::Yahoo).is_err());
    }

    #[test]
    fn test_yahoo_uses_utc() {
        let url = yahoo_url(&sample()).unwrap();
        assert_eq!(param(&url, "st").as_deref(), Some("20250810T190000Z"));
        assert_eq!(param(&url, "et").as_deref(), Some("20250810T203000Z"));
        assert_eq!(param(&url, "v").as_deref(), Some("60"));
    }
}
