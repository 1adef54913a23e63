//! Invitation configuration.
//!
//! Read from `invitation.toml` (working directory first, then
//! `~/.config/invite/invitation.toml`), with `INVITE__SECTION__KEY`
//! environment overrides layered on top.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::dietary::DietaryOption;
use crate::error::{InviteError, InviteResult};
use crate::rsvp::DEFAULT_MAX_GUESTS;

pub const CONFIG_FILE_NAME: &str = "invitation.toml";
const ENV_PREFIX: &str = "INVITE";
const DEFAULT_OCCASION: &str = "Birthday Party";

fn default_max_guests() -> u32 {
    DEFAULT_MAX_GUESTS
}

fn default_occasion() -> String {
    DEFAULT_OCCASION.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventConfig {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_title: Option<String>,
    pub description: String,
    /// Local wall-clock start, e.g. `2025-08-10T15:00:00`
    pub start: String,
    pub end: String,
    /// IANA timezone name the wall-clock times are in
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsvpConfig {
    /// Local wall-clock deadline, same timezone as the event
    pub deadline: String,
    #[serde(default = "default_max_guests")]
    pub max_guests: u32,
}

/// Overrides for calendar export text. Anything unset is derived from the
/// event and venue sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    /// Appended to the RSVP subject line: "RSVP: Ada - Attending Birthday Party"
    #[serde(default = "default_occasion")]
    pub occasion: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        EmailConfig {
            event_name: None,
            occasion: default_occasion(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DietaryConfig {
    /// Replaces the built-in catalog when non-empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<DietaryOption>,
}

/// Everything needed to build an [`Invitation`](crate::Invitation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvitationConfig {
    pub guest: GuestConfig,
    pub event: EventConfig,
    pub venue: VenueConfig,
    pub rsvp: RsvpConfig,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub dietary: DietaryConfig,
}

impl InvitationConfig {
    /// Where the config is looked up when no path is given.
    pub fn default_path() -> PathBuf {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return local;
        }

        dirs::config_dir()
            .map(|dir| dir.join("invite").join(CONFIG_FILE_NAME))
            .unwrap_or(local)
    }

    /// Load from `path` (or [`default_path`](Self::default_path)) plus
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> InviteResult<Self> {
        Self::load_layered(path, Self::environment())
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
    }

    fn load_layered(path: Option<&Path>, env: Environment) -> InviteResult<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);

        if !path.exists() {
            return Err(InviteError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        tracing::debug!(path = %path.display(), "Loading invitation config");

        let config: InvitationConfig = Config::builder()
            .add_source(File::from(path.as_path()).format(FileFormat::Toml))
            .add_source(env)
            .build()
            .map_err(|e| InviteError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| InviteError::Config(e.to_string()))?;

        Ok(config)
    }

    /// Parse a TOML document without touching the environment.
    pub fn from_toml_str(contents: &str) -> InviteResult<Self> {
        toml::from_str(contents).map_err(|e| InviteError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> InviteResult<String> {
        toml::to_string_pretty(self).map_err(|e| InviteError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MINIMAL: &str = r#"
[guest]
name = "Ada Lovelace"

[event]
title = "Ada's Party"
description = "Cake."
start = "2025-12-06T14:00:00"
end = "2025-12-06T16:00:00"
timezone = "Europe/London"

[venue]
name = "The Hall"
street = "1 High St"
city = "London"
state = "LDN"
zip = "N1 1AA"

[rsvp]
deadline = "2025-11-30T23:59:59"
"#;

    #[test]
    fn test_defaults_fill_optional_sections() {
        let config = InvitationConfig::from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.rsvp.max_guests, 8);
        assert_eq!(config.email.occasion, "Birthday Party");
        assert_eq!(config.calendar, CalendarConfig::default());
        assert!(config.activities.is_empty());
        assert!(config.dietary.options.is_empty());
        assert_eq!(config.venue.phone, None);
    }

    #[test]
    fn test_missing_section_is_config_error() {
        let err = InvitationConfig::from_toml_str("[guest]\nname = \"x\"\n").unwrap_err();
        assert!(matches!(err, InviteError::Config(_)));
    }

    #[test]
    fn test_serialized_config_reads_back() {
        let config = InvitationConfig::from_toml_str(MINIMAL).unwrap();
        let text = config.to_toml_string().unwrap();
        assert_eq!(InvitationConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, MINIMAL).unwrap();

        let config = InvitationConfig::load(Some(&path)).unwrap();
        assert_eq!(config.guest.name, "Ada Lovelace");
        assert_eq!(config.event.timezone, "Europe/London");
    }

    #[test]
    fn test_env_overrides_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, MINIMAL).unwrap();

        let vars = config::Map::from([
            ("INVITE__EVENT__TIMEZONE".to_string(), "Europe/Paris".to_string()),
            ("INVITE__RSVP__MAX_GUESTS".to_string(), "4".to_string()),
            ("OTHER__RSVP__MAX_GUESTS".to_string(), "99".to_string()),
        ]);
        let env = InvitationConfig::environment().source(Some(vars));

        let config = InvitationConfig::load_layered(Some(&path), env).unwrap();
        assert_eq!(config.event.timezone, "Europe/Paris");
        assert_eq!(config.rsvp.max_guests, 4);
        assert_eq!(config.guest.name, "Ada Lovelace");
        assert_eq!(config.event.start, "2025-12-06T14:00:00");
    }

    #[test]
    fn test_load_reads_process_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, MINIMAL).unwrap();

        // Only this test touches INVITE__EMAIL__OCCASION.
        unsafe { std::env::set_var("INVITE__EMAIL__OCCASION", "Holiday Party") };
        let loaded = InvitationConfig::load(Some(&path));
        unsafe { std::env::remove_var("INVITE__EMAIL__OCCASION") };

        assert_eq!(loaded.unwrap().email.occasion, "Holiday Party");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = InvitationConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }
}
