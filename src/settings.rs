//! Simulation settings
//!
//! Defaults live in code; a JSON file can override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH, TICK_MS};

/// Play field dimensions (world units, origin at top-left)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSize {
    pub width: f32,
    pub height: f32,
}

impl Default for FieldSize {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
        }
    }
}

impl FieldSize {
    /// Centre of the field (player start)
    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Play field size
    pub field: FieldSize,
    /// Run seed for reproducibility
    pub seed: u64,

    // === Headless runner ===
    /// Milliseconds of game time per tick
    pub tick_ms: f64,
    /// Ticks to simulate before stopping
    pub max_ticks: u64,
    /// Let the built-in pilot fly the player ship
    pub autopilot: bool,
    /// Print the final state as JSON
    pub dump_state: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field: FieldSize::default(),
            seed: 0x5eed,

            tick_ms: TICK_MS,
            max_ticks: 60 * 120, // two minutes at 60 Hz
            autopilot: true,
            dump_state: false,
        }
    }
}

impl Settings {
    /// Parse settings from JSON, filling missing fields with defaults.
    /// The field must have a positive width and height.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Self = serde_json::from_str(json)?;
        let FieldSize { width, height } = settings.field;
        if !(width > 0.0 && height > 0.0) {
            return Err(serde::de::Error::custom(format!(
                "field must be larger than zero, got {width}x{height}"
            )));
        }
        Ok(settings)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
