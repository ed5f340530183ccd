//! Player preferences
//!
//! Persisted separately from tuning by the host; this crate only parses,
//! validates and serializes them.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Allowed steering sensitivity range (multiplier on move speed)
pub const MIN_SENSITIVITY: f32 = 0.5;
pub const MAX_SENSITIVITY: f32 = 3.0;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Steering sensitivity (0.5 - 3.0)
    pub sensitivity: f32,

    // === Visual Effects ===
    /// Camera shake on landings
    pub screen_shake: bool,

    // === Accessibility ===
    /// Reduced motion (suppresses shake)
    pub reduced_motion: bool,

    /// Fixed level seed; a fresh random seed per run when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sensitivity: 1.0,
            screen_shake: true,
            reduced_motion: false,
            seed: None,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SENSITIVITY..=MAX_SENSITIVITY).contains(&self.sensitivity) {
            return Err(ConfigError::OutOfRange {
                field: "sensitivity",
                value: self.sensitivity,
                min: MIN_SENSITIVITY,
                max: MAX_SENSITIVITY,
            });
        }
        Ok(())
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }
}
