//! Engine settings
//!
//! Loaded from a JSON file. Missing fields take their defaults and a missing
//! or unreadable file means all defaults.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::state::{WorldBounds, sanitize_scale};

/// Engine and demo settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,

    // === World ===
    pub world_width: f32,
    pub world_height: f32,
    /// Global entity size multiplier
    pub scale: f32,

    // === Demo runner ===
    /// Ticks the headless demo runs for
    pub demo_ticks: u64,
    /// Pace ticks at the nominal rate instead of running flat out
    pub realtime: bool,
    /// Where the high score is kept; `None` disables persistence
    pub high_score_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,

            world_width: DEFAULT_WORLD_WIDTH,
            world_height: DEFAULT_WORLD_HEIGHT,
            scale: 1.0,

            demo_ticks: TICK_RATE_HZ as u64 * 60,
            realtime: false,
            high_score_path: Some(PathBuf::from("rock-field-highscore.json")),
        }
    }
}

impl Settings {
    /// Parse settings from JSON, `None` if malformed
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(settings) => Some(settings),
            Err(e) => {
                log::warn!("Invalid settings JSON: {}", e);
                None
            }
        }
    }

    /// Load settings from a file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let loaded = std::fs::read_to_string(path)
            .map_err(|e| log::warn!("Could not read settings from {}: {}", path.display(), e))
            .ok()
            .and_then(|json| Self::from_json(&json));

        match loaded {
            Some(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> bool {
        let written = serde_json::to_string_pretty(self)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => {
                log::info!("Settings saved to {}", path.display());
                true
            }
            Err(e) => {
                log::warn!("Failed to save settings to {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Copy with every numeric field forced into a usable range
    pub fn sanitized(&self) -> Self {
        let bounds = WorldBounds::new(self.world_width, self.world_height);
        Self {
            seed: self.seed,
            world_width: bounds.width,
            world_height: bounds.height,
            scale: sanitize_scale(self.scale),
            demo_ticks: self.demo_ticks,
            realtime: self.realtime,
            high_score_path: self.high_score_path.clone(),
        }
    }

    pub fn bounds(&self) -> WorldBounds {
        WorldBounds::new(self.world_width, self.world_height)
    }

    /// The configured seed, or one derived from the clock
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }
}
