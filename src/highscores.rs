//! High score persistence
//!
//! The engine only carries the high score in memory. This store keeps it
//! between runs as a tiny JSON document.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u64,
}

/// File-backed high score
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored high score, 0 if there is none yet or it cannot be read
    pub fn load(&self) -> u64 {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(_) => {
                log::info!("No high score found, starting fresh");
                return 0;
            }
        };
        match serde_json::from_str::<HighScoreRecord>(&json) {
            Ok(record) => {
                log::info!("Loaded high score {}", record.high_score);
                record.high_score
            }
            Err(e) => {
                log::warn!("Ignoring corrupt high score file {}: {}", self.path.display(), e);
                0
            }
        }
    }

    /// Overwrite the stored value
    pub fn save(&self, high_score: u64) -> bool {
        let written = serde_json::to_string(&HighScoreRecord { high_score })
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&self.path, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => {
                log::info!("High score {} saved", high_score);
                true
            }
            Err(e) => {
                log::warn!("Failed to save high score to {}: {}", self.path.display(), e);
                false
            }
        }
    }

    /// Save only if `score` beats what is stored. Returns the resulting best.
    pub fn record(&self, score: u64) -> u64 {
        let stored = self.load();
        if score > stored {
            self.save(score);
            score
        } else {
            stored
        }
    }
}
