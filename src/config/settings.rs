//! Application settings loading from config.toml
//!
//! Process-level defaults only: the star emoji the reaction handlers listen
//! for and the threshold new guild rows start with. Everything tunable at
//! runtime (starboard channel, per-guild threshold, moderation toggles) lives
//! in the `guilds` table instead, so nothing here changes behavior for a
//! guild that has already been configured.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

const fn default_star_threshold() -> i32 {
    3
}

fn default_star_emoji() -> String {
    "\u{2b50}".to_string()
}

/// Application settings parsed from config.toml
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Star threshold used when a guild row is first created
    #[serde(default = "default_star_threshold")]
    pub default_star_threshold: i32,
    /// Emoji the reaction handlers treat as a star
    #[serde(default = "default_star_emoji")]
    pub star_emoji: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_star_threshold: default_star_threshold(),
            star_emoji: default_star_emoji(),
        }
    }
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read settings file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from the default location (./config.toml), falling back to
/// built-in defaults when the file is absent.
pub fn load_default_settings() -> Result<Settings> {
    let path = Path::new("config.toml");
    if path.exists() {
        load_settings(path)
    } else {
        Ok(Settings::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_settings() {
        let toml_str = r#"
            default_star_threshold = 5
            star_emoji = "🌟"
        "#;

        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.default_star_threshold, 5);
        assert_eq!(settings.star_emoji, "🌟");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.default_star_threshold, 3);
        assert_eq!(settings.star_emoji, "\u{2b50}");
    }
}
