//! Settings loaded from `usdattr.toml`.
//!
//! Every section is optional; a missing file section or key takes its
//! default.
//!
//! ```toml
//! [stage]
//! interpolation = "held"
//!
//! [logging]
//! level = "debug"
//! ```

use std::path::Path;
use std::str::FromStr;

use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

use crate::usd::Interpolation;

/// File name looked up next to the working directory.
pub const SETTINGS_FILE: &str = "usdattr.toml";

/// Errors that can occur while loading settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Root of `usdattr.toml`.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub stage: StageSection,
    pub logging: LoggingSection,
}

/// `[stage]` section
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct StageSection {
    pub interpolation: Interpolation,
}

/// `[logging]` section
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Read settings from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> SettingsResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        log::debug!("Loaded settings from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Read settings from `path` if it exists, defaults otherwise.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> SettingsResult<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> SettingsResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Log level filter, falling back to `Info` for unknown level names.
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.logging.level).unwrap_or_else(|_| {
            log::warn!("Unknown log level '{}', using info", self.logging.level);
            LevelFilter::Info
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.stage.interpolation, Interpolation::Linear);
        assert_eq!(settings.level_filter(), LevelFilter::Info);
    }

    #[test]
    fn test_full_file() {
        let settings = Settings::from_toml_str(
            r#"
[stage]
interpolation = "held"

[logging]
level = "trace"
"#,
        )
        .unwrap();

        assert_eq!(settings.stage.interpolation, Interpolation::Held);
        assert_eq!(settings.level_filter(), LevelFilter::Trace);
    }

    #[test]
    fn test_partial_section() {
        let settings = Settings::from_toml_str("[logging]\nlevel = \"WARN\"\n").unwrap();
        assert_eq!(settings.stage.interpolation, Interpolation::Linear);
        assert_eq!(settings.level_filter(), LevelFilter::Warn);
    }

    #[test]
    fn test_unknown_level_falls_back() {
        let settings = Settings::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap();
        assert_eq!(settings.level_filter(), LevelFilter::Info);
    }

    #[test]
    fn test_invalid_interpolation_is_an_error() {
        let result = Settings::from_toml_str("[stage]\ninterpolation = \"cubic\"\n");
        assert!(matches!(result, Err(SettingsError::Toml(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Settings::load("/nonexistent/usdattr.toml"),
            Err(SettingsError::Io(_))
        ));
        assert_eq!(
            Settings::load_or_default("/nonexistent/usdattr.toml").unwrap(),
            Settings::default()
        );
    }
}
