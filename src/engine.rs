//! Engine facade
//!
//! Owns the one `GameState` and exposes the small surface a front end needs:
//! tick with held controls, request a shot, start/restart, resize and take a
//! read-only snapshot between ticks.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::state::{Asteroid, Bullet, GameState, GameStatus, Powerup, Ship, WorldBounds};
use crate::sim::tick::{self, ControlInput, TickEvents, TickInput};

/// Owned copy of everything a renderer draws
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStateView {
    pub status: GameStatus,
    pub score: u64,
    pub high_score: u64,
    pub time_ticks: u64,
    pub bounds: WorldBounds,
    pub scale: f32,
    pub ship: Ship,
    pub asteroids: Vec<Asteroid>,
    pub bullets: Vec<Bullet>,
    pub powerups: Vec<Powerup>,
    pub background_asteroids: Vec<Asteroid>,
}

impl From<&GameState> for GameStateView {
    fn from(state: &GameState) -> Self {
        Self {
            status: state.status,
            score: state.score,
            high_score: state.high_score,
            time_ticks: state.time_ticks,
            bounds: state.bounds,
            scale: state.scale,
            ship: state.ship.clone(),
            asteroids: state.asteroids.clone(),
            bullets: state.bullets.clone(),
            powerups: state.powerups.clone(),
            background_asteroids: state.background_asteroids.clone(),
        }
    }
}

pub struct Engine {
    state: GameState,
    /// Fire request waiting for the next tick
    fire_queued: bool,
}

impl Engine {
    /// Build from settings (sanitized first) and a previously stored high score
    pub fn new(settings: &Settings, high_score: u64) -> Self {
        let settings = settings.sanitized();
        Self::with_seed(settings.resolve_seed(), settings.bounds(), settings.scale, high_score)
    }

    pub fn with_seed(seed: u64, bounds: WorldBounds, scale: f32, high_score: u64) -> Self {
        log::info!("Engine created with seed {}", seed);
        Self {
            state: GameState::new(seed, bounds, scale, high_score),
            fire_queued: false,
        }
    }

    /// Advance one tick with the given held controls
    pub fn tick(&mut self, controls: &ControlInput) -> TickEvents {
        let input = TickInput {
            controls: *controls,
            fire: std::mem::take(&mut self.fire_queued),
        };
        let events = tick::tick(&mut self.state, &input);
        if events.game_over {
            log::info!(
                "Game over at tick {}: score {}, high score {}",
                self.state.time_ticks,
                self.state.score,
                self.state.high_score
            );
        }
        events
    }

    /// Request a shot on the next tick
    ///
    /// Ignored unless playing. Whether it actually fires depends on the
    /// cooldown when that tick runs.
    pub fn fire(&mut self) {
        if self.state.status == GameStatus::Playing {
            self.fire_queued = true;
        }
    }

    /// Start or restart the game
    pub fn activate(&mut self) {
        if tick::activate(&mut self.state) {
            self.fire_queued = false;
        }
    }

    /// New world size: the ship is clamped inside, everything else wraps
    pub fn resize(&mut self, width: f32, height: f32) {
        let bounds = WorldBounds::new(width, height);
        log::debug!("Resize to {}x{}", bounds.width, bounds.height);
        self.state.set_bounds(bounds);
    }

    pub fn snapshot(&self) -> GameStateView {
        GameStateView::from(&self.state)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    /// High score as of the last game over (same value the snapshot reports)
    pub fn high_score(&self) -> u64 {
        self.state.high_score
    }
}
