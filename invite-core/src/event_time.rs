//! Event time resolution.
//!
//! An [`EventInstant`] is the single source of truth for when the event
//! happens: a local wall-clock start and end plus an IANA timezone. Resolving
//! it produces [`EventTimes`], which holds every string the page, the
//! calendar links and the RSVP email need. All strings are computed once, from
//! one zoned base value.
//!
//! Offsets come from the chrono-tz database for the specific calendar date,
//! so an event in July resolves to EDT and one in January to EST. Nothing here
//! reads the host's local timezone.

use chrono::{DateTime, Datelike, LocalResult, NaiveDateTime, SecondsFormat, TimeZone};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{InviteError, InviteResult};

const LOCAL_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Parse an IANA timezone name (e.g. `"America/New_York"`).
pub fn parse_timezone(name: &str) -> InviteResult<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| InviteError::InvalidTimezone(name.to_string()))
}

/// Parse a wall-clock local datetime such as `2025-08-10T15:00:00`.
///
/// No offset or `Z` suffix is accepted: the timezone is configured separately.
pub fn parse_local_datetime(s: &str) -> InviteResult<NaiveDateTime> {
    let s = s.trim();
    LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| {
            InviteError::InvalidDatetime(format!(
                "'{}' (expected local time like 2025-08-10T15:00:00)",
                s
            ))
        })
}

/// Attach a timezone to a wall-clock time.
///
/// Times skipped by a spring-forward transition don't exist and are rejected.
/// Times repeated by a fall-back transition resolve to the earlier instant.
pub fn resolve_local(naive: NaiveDateTime, tz: Tz) -> InviteResult<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => Err(InviteError::InvalidDatetime(format!(
            "{} does not exist in {} (skipped by a daylight saving transition)",
            naive,
            tz.name()
        ))),
    }
}

/// English ordinal for a day of the month ("1st", "12th", "23rd").
pub fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", day, suffix)
}

/// Every display form of one zoned instant.
///
/// The event start, the event end and the RSVP deadline all go through this
/// same type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedInstant {
    #[serde(skip)]
    zoned: DateTime<Tz>,
    iso: String,
    date_iso: String,
    full_date: String,
    short_date: String,
    long_date: String,
    month_day: String,
    time_12h: String,
    time_24h: String,
    year: i32,
    month: u32,
    day: u32,
}

impl FormattedInstant {
    pub fn from_zoned(zoned: DateTime<Tz>) -> Self {
        let day = zoned.day();
        let weekday = zoned.format("%A").to_string();
        let month_name = zoned.format("%B").to_string();

        FormattedInstant {
            iso: zoned.to_rfc3339_opts(SecondsFormat::Secs, false),
            date_iso: zoned.format("%Y-%m-%d").to_string(),
            full_date: format!("{}, {} {}, {}", weekday, month_name, ordinal(day), zoned.year()),
            short_date: format!("{}, {} {}", weekday, month_name, ordinal(day)),
            long_date: format!("{} {}, {}", month_name, ordinal(day), zoned.year()),
            month_day: format!("{} {}", month_name, ordinal(day)),
            time_12h: zoned.format("%-I:%M %p").to_string(),
            time_24h: zoned.format("%H:%M").to_string(),
            year: zoned.year(),
            month: zoned.month(),
            day,
            zoned,
        }
    }

    /// Resolve a wall-clock time in `tz` and format it.
    pub fn resolve(naive: NaiveDateTime, tz: Tz) -> InviteResult<Self> {
        Ok(Self::from_zoned(resolve_local(naive, tz)?))
    }

    pub fn zoned(&self) -> DateTime<Tz> {
        self.zoned
    }

    /// RFC 3339 with the zone's offset on that date, e.g. `2025-08-10T15:00:00-04:00`.
    pub fn iso(&self) -> &str {
        &self.iso
    }

    /// `YYYY-MM-DD`
    pub fn date_iso(&self) -> &str {
        &self.date_iso
    }

    /// `Sunday, August 10th, 2025`
    pub fn full_date(&self) -> &str {
        &self.full_date
    }

    /// `Sunday, August 10th`
    pub fn short_date(&self) -> &str {
        &self.short_date
    }

    /// `August 10th, 2025`
    pub fn long_date(&self) -> &str {
        &self.long_date
    }

    /// `August 10th`
    pub fn month_day(&self) -> &str {
        &self.month_day
    }

    /// `3:00 PM`
    pub fn time_12h(&self) -> &str {
        &self.time_12h
    }

    /// `15:00`
    pub fn time_24h(&self) -> &str {
        &self.time_24h
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }
}

/// Local start/end wall-clock times in a named timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventInstant {
    start: NaiveDateTime,
    end: NaiveDateTime,
    timezone: Tz,
}

impl EventInstant {
    /// Build an instant, rejecting unknown timezones and windows where the
    /// end is not after the start.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, timezone: &str) -> InviteResult<Self> {
        let timezone = parse_timezone(timezone)?;

        if end <= start {
            return Err(InviteError::InvalidEventWindow {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        Ok(EventInstant {
            start,
            end,
            timezone,
        })
    }

    /// Parse both ends from local datetime strings.
    pub fn parse(start: &str, end: &str, timezone: &str) -> InviteResult<Self> {
        Self::new(parse_local_datetime(start)?, parse_local_datetime(end)?, timezone)
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Resolve to zoned instants and compute every derived representation.
    pub fn resolve(&self) -> InviteResult<EventTimes> {
        let start = FormattedInstant::resolve(self.start, self.timezone)?;
        let end = FormattedInstant::resolve(self.end, self.timezone)?;

        // A window straddling a fall-back transition can invert once zoned.
        if end.zoned() <= start.zoned() {
            return Err(InviteError::InvalidEventWindow {
                start: start.iso().to_string(),
                end: end.iso().to_string(),
            });
        }

        Ok(EventTimes::from_parts(self.timezone, start, end))
    }
}

/// The resolved event window. Immutable; built once at startup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventTimes {
    #[serde(serialize_with = "serialize_tz")]
    timezone: Tz,
    start: FormattedInstant,
    end: FormattedInstant,
    time_range: String,
    duration_minutes: i64,
}

fn serialize_tz<S: serde::Serializer>(tz: &Tz, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(tz.name())
}

impl EventTimes {
    fn from_parts(timezone: Tz, start: FormattedInstant, end: FormattedInstant) -> Self {
        let time_range = format!("{} - {}", start.time_12h(), end.time_12h());
        let duration_minutes = (end.zoned() - start.zoned()).num_minutes();

        EventTimes {
            timezone,
            start,
            end,
            time_range,
            duration_minutes,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn start(&self) -> &FormattedInstant {
        &self.start
    }

    pub fn end(&self) -> &FormattedInstant {
        &self.end
    }

    pub fn date_iso(&self) -> &str {
        self.start.date_iso()
    }

    pub fn start_iso(&self) -> &str {
        self.start.iso()
    }

    pub fn end_iso(&self) -> &str {
        self.end.iso()
    }

    pub fn full_date(&self) -> &str {
        self.start.full_date()
    }

    pub fn short_date(&self) -> &str {
        self.start.short_date()
    }

    pub fn start_time(&self) -> &str {
        self.start.time_12h()
    }

    pub fn end_time(&self) -> &str {
        self.end.time_12h()
    }

    pub fn start_time24(&self) -> &str {
        self.start.time_24h()
    }

    pub fn end_time24(&self) -> &str {
        self.end.time_24h()
    }

    /// `3:00 PM - 4:30 PM`
    pub fn time_range(&self) -> &str {
        &self.time_range
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    pub fn month(&self) -> u32 {
        self.start.month()
    }

    pub fn day(&self) -> u32 {
        self.start.day()
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration_minutes
    }
}
