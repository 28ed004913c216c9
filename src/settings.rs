//! Run settings
//!
//! Loaded from an optional JSON file. Missing keys fall back to defaults so a
//! settings file only needs the values it changes.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH, MAX_SUBSTEPS, TICK_RATE};
use crate::sim::Field;

/// Smallest field that still holds one formation column and the boss
pub const MIN_FIELD_WIDTH: f32 = 200.0;
/// Smallest field that keeps the player spawn below the formation row
pub const MIN_FIELD_HEIGHT: f32 = 200.0;

/// Errors raised while loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Field ===
    /// Play-field width in pixels
    pub field_width: f32,
    /// Play-field height in pixels
    pub field_height: f32,

    // === Timing ===
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// Maximum ticks run per presented frame
    pub max_substeps: u32,

    // === Run ===
    /// RNG seed; derived from the clock when absent
    pub seed: Option<u64>,
    /// Stop after this many ticks
    pub max_ticks: Option<u64>,
    /// Restarts the autopilot takes before quitting from game over
    pub max_restarts: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            tick_rate: TICK_RATE,
            max_substeps: MAX_SUBSTEPS,

            seed: None,
            max_ticks: None,
            max_restarts: 3,
        }
    }
}

impl Settings {
    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse and validate a settings file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.field_width.is_finite() || self.field_width < MIN_FIELD_WIDTH {
            return Err(SettingsError::Invalid(format!(
                "field_width must be at least {}, got {}",
                MIN_FIELD_WIDTH, self.field_width
            )));
        }
        if !self.field_height.is_finite() || self.field_height < MIN_FIELD_HEIGHT {
            return Err(SettingsError::Invalid(format!(
                "field_height must be at least {}, got {}",
                MIN_FIELD_HEIGHT, self.field_height
            )));
        }
        if self.tick_rate == 0 {
            return Err(SettingsError::Invalid("tick_rate must be positive".into()));
        }
        if self.max_substeps == 0 {
            return Err(SettingsError::Invalid("max_substeps must be positive".into()));
        }
        Ok(())
    }

    pub fn field(&self) -> Field {
        Field::new(self.field_width, self.field_height)
    }

    /// Wall-clock length of one tick
    pub fn tick_period(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.tick_rate.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let settings = Settings::default();
        assert_eq!(settings.field(), Field::default());
        assert_eq!(settings.tick_rate, 60);
        assert_eq!(settings.max_substeps, 8);
        assert!(settings.seed.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_missing_keys_fall_back() {
        let settings = Settings::from_json(r#"{ "seed": 42, "max_ticks": 600 }"#).unwrap();
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.max_ticks, Some(600));
        assert_eq!(settings.field_width, FIELD_WIDTH);
        assert_eq!(settings.max_restarts, 3);
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn test_rejects_invalid_values() {
        for json in [
            r#"{ "tick_rate": 0 }"#,
            r#"{ "max_substeps": 0 }"#,
            r#"{ "field_width": 50.0 }"#,
            r#"{ "field_height": 10.0 }"#,
        ] {
            assert!(
                matches!(Settings::from_json(json), Err(SettingsError::Invalid(_))),
                "{json} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Settings::from_json("{ seed: "),
            Err(SettingsError::Json(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "seed": "abc" }"#),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = Settings::load("/nonexistent/space-invaders/settings.json");
        assert!(matches!(result, Err(SettingsError::Io(_))));
    }

    #[test]
    fn test_tick_period() {
        let settings = Settings::default();
        assert_eq!(settings.tick_period(), Duration::from_nanos(16_666_666));
        let fast = Settings {
            tick_rate: 120,
            ..Default::default()
        };
        assert_eq!(fast.tick_period(), Duration::from_nanos(8_333_333));
    }

    #[test]
    fn test_settings_roundtrip_json() {
        let settings = Settings {
            seed: Some(7),
            field_width: 1024.0,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}
