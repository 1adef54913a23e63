//! The resolved invitation: configuration plus every derived date string,
//! computed once and read everywhere else.

use std::path::Path;

use crate::config::{InvitationConfig, VenueConfig};
use crate::dietary::DietaryCatalog;
use crate::error::{InviteError, InviteResult};
use crate::event_time::{EventInstant, EventTimes, FormattedInstant, parse_local_datetime};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Venue {
    pub name: String,
    pub short_name: String,
    pub business_name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub parking: Option<String>,
}

impl Venue {
    fn from_config(config: VenueConfig) -> Self {
        Venue {
            short_name: config.short_name.unwrap_or_else(|| config.name.clone()),
            business_name: config.business_name.unwrap_or_else(|| config.name.clone()),
            name: config.name,
            street: config.street,
            city: config.city,
            state: config.state,
            zip: config.zip,
            phone: config.phone,
            website: config.website,
            parking: config.parking,
        }
    }

    /// "3443 Merrick Rd, Wantagh, NY 11793"
    pub fn address(&self) -> String {
        format!("{}, {}, {} {}", self.street, self.city, self.state, self.zip)
    }

    /// Venue name followed by the street address.
    pub fn full_address(&self) -> String {
        format!("{}, {}", self.name, self.address())
    }

    /// "Wantagh, NY 11793"
    pub fn locality(&self) -> String {
        format!("{}, {} {}", self.city, self.state, self.zip)
    }

    pub fn maps_url(&self) -> String {
        format!("https://maps.google.com/?q={}", self.address().replace(' ', "+"))
    }

    /// `tel:` link for the phone number. Ten-digit numbers get a `+1` prefix.
    pub fn phone_link(&self) -> Option<String> {
        let digits: String = self
            .phone
            .as_deref()?
            .chars()
            .filter(char::is_ascii_digit)
            .collect();

        match digits.len() {
            0 => None,
            10 => Some(format!("tel:+1{}", digits)),
            _ => Some(format!("tel:+{}", digits)),
        }
    }

    pub fn website_url(&self) -> Option<String> {
        let website = self.website.as_deref()?;
        if website.starts_with("http://") || website.starts_with("https://") {
            Some(website.to_string())
        } else {
            Some(format!("https://{}", website))
        }
    }
}

/// Text used for every calendar export target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDetails {
    pub title: String,
    pub description: String,
    pub location: String,
}

#[derive(Debug, Clone)]
pub struct Invitation {
    pub guest_name: String,
    pub guest_first_name: String,
    pub title: String,
    pub full_title: String,
    pub description: String,
    pub instant: EventInstant,
    pub times: EventTimes,
    pub venue: Venue,
    pub rsvp_deadline: FormattedInstant,
    pub max_guests: u32,
    pub activities: Vec<String>,
    pub calendar: CalendarDetails,
    pub email_event_name: String,
    pub occasion: String,
    pub dietary: DietaryCatalog,
}

impl Invitation {
    /// Load the config file and resolve it.
    pub fn load(path: Option<&Path>) -> InviteResult<Self> {
        Self::from_config(InvitationConfig::load(path)?)
    }

    pub fn from_toml_str(contents: &str) -> InviteResult<Self> {
        Self::from_config(InvitationConfig::from_toml_str(contents)?)
    }

    /// Resolve timezones, apply defaults and check the config's invariants.
    pub fn from_config(config: InvitationConfig) -> InviteResult<Self> {
        let instant = EventInstant::parse(
            &config.event.start,
            &config.event.end,
            &config.event.timezone,
        )?;
        let times = instant.resolve()?;

        let deadline = parse_local_datetime(&config.rsvp.deadline)?;
        let rsvp_deadline = FormattedInstant::resolve(deadline, instant.timezone())?;

        if config.rsvp.max_guests == 0 {
            return Err(InviteError::Config(
                "rsvp.max_guests must be at least 1".to_string(),
            ));
        }

        let dietary = if config.dietary.options.is_empty() {
            DietaryCatalog::default()
        } else {
            DietaryCatalog::new(config.dietary.options)?
        };

        let venue = Venue::from_config(config.venue);

        let guest_first_name = config.guest.first_name.unwrap_or_else(|| {
            config
                .guest
                .name
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_string()
        });

        let full_title = config
            .event
            .full_title
            .unwrap_or_else(|| format!("{} at {}", config.event.title, venue.short_name));

        let calendar = CalendarDetails {
            title: config.calendar.title.unwrap_or_else(|| full_title.clone()),
            description: config.calendar.description.unwrap_or_else(|| {
                default_calendar_description(&config.event.description, &venue)
            }),
            location: config
                .calendar
                .location
                .unwrap_or_else(|| venue.full_address()),
        };

        let email_event_name = config
            .email
            .event_name
            .unwrap_or_else(|| config.event.title.clone());

        tracing::info!(
            title = %config.event.title,
            start = %times.start_iso(),
            timezone = %config.event.timezone,
            "Resolved invitation"
        );

        Ok(Invitation {
            guest_name: config.guest.name,
            guest_first_name,
            title: config.event.title,
            full_title,
            description: config.event.description,
            instant,
            times,
            venue,
            rsvp_deadline,
            max_guests: config.rsvp.max_guests,
            activities: config.activities,
            calendar,
            email_event_name,
            occasion: config.email.occasion,
            dietary,
        })
    }

    /// "Sunday, August 10th, 2025 (3:00 PM - 4:30 PM)"
    pub fn date_time_line(&self) -> String {
        format!("{} ({})", self.times.full_date(), self.times.time_range())
    }
}

fn default_calendar_description(description: &str, venue: &Venue) -> String {
    match &venue.parking {
        Some(parking) => format!("{} Address: {}. {}.", description, venue.address(), parking),
        None => format!("{} Address: {}.", description, venue.address()),
    }
}
