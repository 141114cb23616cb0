// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de;

use crate::error::{Error, Result};

/// The name of the daybook application.
pub const APP_NAME: &str = "daybook";

const DEFAULT_DELETE_DEBOUNCE: Duration = Duration::from_secs(3);

/// Configuration for the planner core.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// Directory for storing application state. `None` selects an
    /// in-memory store after `normalize`, which is only useful in tests.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,

    /// Device calendar that receives created events.
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,

    /// Debounce window for batched deletes.
    #[serde(default)]
    pub delete_debounce: Option<ConfigDebounce>,
}

fn default_calendar_id() -> String {
    "default".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            state_dir: None,
            calendar_id: default_calendar_id(),
            delete_debounce: None,
        }
    }
}

impl Config {
    /// Normalize the configuration.
    pub fn normalize(&mut self) -> Result<()> {
        if let Some(a) = &self.state_dir {
            self.state_dir = Some(
                expand_path(a)
                    .map_err(|e| Error::Config(format!("Failed to expand state dir: {e}")))?,
            );
        }

        if self.state_dir.is_none() {
            tracing::warn!("no state directory configured, state will not persist");
        }

        if self.calendar_id.is_empty() {
            return Err(Error::Config("calendar_id must not be empty".into()));
        }

        Ok(())
    }

    pub fn delete_debounce(&self) -> Duration {
        self.delete_debounce
            .map(|d| d.0)
            .unwrap_or(DEFAULT_DELETE_DEBOUNCE)
    }
}

/// Debounce delay parsed from a duration string.
#[derive(Debug, Clone, Copy)]
pub struct ConfigDebounce(Duration);

impl<'de> serde::Deserialize<'de> for ConfigDebounce {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct DebounceVisitor;

        impl de::Visitor<'_> for DebounceVisitor {
            type Value = ConfigDebounce;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str(r#"a duration string like "2h", "45m", "1800s" or "HH:MM""#)
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                parse_duration(value)
                    .map(ConfigDebounce)
                    .map_err(|e| de::Error::custom(e.to_string()))
            }
        }

        deserializer.deserialize_str(DebounceVisitor)
    }
}

/// Handle tilde (~) and environment variables in the path
fn expand_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }

    let path = path
        .to_str()
        .ok_or_else(|| Error::Config("Invalid path".into()))?;

    // Handle tilde and home directory
    let home_prefixes: &[&str] = if cfg!(unix) {
        &["~/", "$HOME/", "${HOME}/"]
    } else {
        &[r"~\", "~/", r"%UserProfile%\", r"%UserProfile%/"]
    };
    for prefix in home_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_home_dir()?.join(stripped));
        }
    }

    // Handle state directories
    let state_prefixes: &[&str] = if cfg!(unix) {
        &["$XDG_STATE_HOME/", "${XDG_STATE_HOME}/"]
    } else {
        &[r"%LOCALAPPDATA%\", "%LOCALAPPDATA%/"]
    };
    for prefix in state_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_state_dir()?.join(stripped));
        }
    }

    Ok(path.into())
}

fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| Error::Config("User-specific home directory not found".into()))
}

fn get_state_dir() -> Result<PathBuf> {
    #[cfg(unix)]
    let state_dir = xdg::BaseDirectories::new().get_state_home();
    #[cfg(windows)]
    let state_dir = dirs::data_dir();
    state_dir.ok_or_else(|| Error::Config("User-specific state directory not found".into()))
}

/// Parse a duration string in the format "HH:MM" / "1d" / "24h" / "60m" / "1800s".
fn parse_duration(s: &str) -> Result<Duration> {
    let invalid = || Error::Config(format!("Invalid duration format: {s}"));

    // Try to parse "HH:MM" format
    if let Some((h, m)) = s.split_once(':') {
        let hours: u64 = h.trim().parse().map_err(|_| invalid())?;
        let minutes: u64 = m.trim().parse().map_err(|_| invalid())?;
        Ok(Duration::from_secs((hours * 60 + minutes) * 60))
    }
    // Match suffix-based formats
    else if let Some(rest) = s.strip_suffix("d") {
        let days: u64 = rest.trim().parse().map_err(|_| invalid())?;
        Ok(Duration::from_secs(days * 24 * 3600))
    } else if let Some(rest) = s.strip_suffix("h") {
        let hours: u64 = rest.trim().parse().map_err(|_| invalid())?;
        Ok(Duration::from_secs(hours * 3600))
    } else if let Some(rest) = s.strip_suffix("m") {
        let minutes: u64 = rest.trim().parse().map_err(|_| invalid())?;
        Ok(Duration::from_secs(minutes * 60))
    } else if let Some(rest) = s.strip_suffix("s") {
        let seconds: u64 = rest.trim().parse().map_err(|_| invalid())?;
        Ok(Duration::from_secs(seconds))
    } else {
        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_path_home() {
        let home = get_home_dir().unwrap();
        let result = expand_path(&PathBuf::from("~/state")).unwrap();
        assert_eq!(result, home.join("state"));
        assert!(result.is_absolute());
    }

    #[test]
    fn test_expand_path_absolute() {
        let absolute_path = PathBuf::from("/var/lib/daybook");
        let result = expand_path(&absolute_path).unwrap();
        assert_eq!(result, absolute_path);
    }

    #[test]
    fn test_parse_duration_colon_format() {
        assert_eq!(parse_duration("01:30").unwrap(), Duration::from_secs(90 * 60));
        assert_eq!(parse_duration("00:00").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_parse_duration_suffix_format() {
        assert_eq!(parse_duration("1d").unwrap(), Duration::from_secs(86400));
        assert_eq!(parse_duration("2h").unwrap(), Duration::from_secs(7200));
        assert_eq!(parse_duration("45m").unwrap(), Duration::from_secs(2700));
        assert_eq!(parse_duration("1800s").unwrap(), Duration::from_secs(1800));
    }

    #[test]
    fn test_parse_duration_invalid_format() {
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("99x").is_err());
        assert!(parse_duration("12:xx").is_err());
        assert!(parse_duration("12").is_err());
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.calendar_id, "default");
        assert_eq!(config.delete_debounce(), DEFAULT_DELETE_DEBOUNCE);

        let config: Config = toml::from_str(r#"delete_debounce = "45m""#).unwrap();
        assert_eq!(config.delete_debounce(), Duration::from_secs(2700));
    }
}
