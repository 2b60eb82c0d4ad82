//! Runtime configuration
//!
//! Read from a JSON file; anything missing falls back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::MapType;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulation tick period (ms)
    pub tick_ms: u32,
    /// Delay before movement input is accepted (ms)
    pub input_delay_ms: u64,
    /// Delay before the end-of-round overlay is shown (ms)
    pub overlay_delay_ms: u64,
    /// Rows in the high score table
    pub high_scores_shown: usize,
    /// Fixed RNG seed; random per run when unset
    pub seed: Option<u64>,
    /// Map used when none is given
    pub default_map: MapType,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            input_delay_ms: INPUT_DELAY_MS,
            overlay_delay_ms: OVERLAY_DELAY_MS,
            high_scores_shown: crate::highscores::MAX_SCORES_TO_SHOW,
            seed: None,
            default_map: MapType::Classic,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring bad settings file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// A zero tick period would never advance time
    fn sanitized(mut self) -> Self {
        if self.tick_ms == 0 {
            log::warn!("tick_ms must be positive, using {}", TICK_MS);
            self.tick_ms = TICK_MS;
        }
        self
    }
}
