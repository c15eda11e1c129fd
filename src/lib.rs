//! Rock Field - a wrap-around Asteroids arcade engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, spawning, game state)
//! - `engine`: Tick/fire/activate/snapshot facade over one owned game state
//! - `settings`: Engine configuration loaded from JSON
//! - `highscores`: Single high score persisted between runs
//! - `autopilot`: Idle/demo controller that plays the game

pub mod autopilot;
pub mod engine;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use engine::{Engine, GameStateView};
pub use highscores::HighScoreStore;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
///
/// All per-tick values are tuned for `TICK_RATE_HZ`. Driving the engine at a
/// different rate means rescaling every one of them.
pub mod consts {
    /// Nominal simulation rate
    pub const TICK_RATE_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default world dimensions
    pub const DEFAULT_WORLD_WIDTH: f32 = 800.0;
    pub const DEFAULT_WORLD_HEIGHT: f32 = 600.0;
    /// Scale factor limits (applied to every entity size)
    pub const MIN_SCALE: f32 = 0.1;
    pub const MAX_SCALE: f32 = 10.0;

    /// Ship
    pub const BASE_SHIP_SIZE: f32 = 20.0;
    pub const ROTATION_SPEED: f32 = 0.1;
    pub const THRUST_SPEED: f32 = 0.3;
    pub const FRICTION: f32 = 0.97;
    pub const MAX_VELOCITY: f32 = 6.0;
    /// Per-axis velocity below which the ship snaps to rest
    pub const MIN_VELOCITY: f32 = 0.05;
    pub const STARTING_SHIELDS: u32 = 0;

    /// Bullets
    pub const BULLET_SPEED: f32 = 7.0;
    pub const BULLET_TTL: u32 = 60;
    pub const SHOT_COOLDOWN_MS: u32 = 250;
    pub const SHOT_COOLDOWN_TICKS: u32 = ms_to_ticks(SHOT_COOLDOWN_MS);
    pub const RAPID_FIRE_COOLDOWN_TICKS: u32 = SHOT_COOLDOWN_TICKS / 2;

    /// Asteroids (large, medium, small)
    pub const BASE_ASTEROID_SIZES: [f32; 3] = [50.0, 25.0, 12.0];
    pub const ASTEROID_VERTEX_COUNT: usize = 8;
    pub const ASTEROID_SPIN: f32 = 0.02;
    pub const INITIAL_ASTEROID_COUNT: usize = 4;
    pub const MIN_ASTEROID_DISTANCE: f32 = 150.0;
    /// Rejection sampling cap for spawn positions
    pub const MAX_SPAWN_ATTEMPTS: u32 = 64;

    /// Asteroid spawn timer (ticks)
    pub const INITIAL_SPAWN_INTERVAL: u32 = 300;
    pub const MIN_SPAWN_INTERVAL: u32 = 120;
    pub const SPAWN_INTERVAL_DECREASE: u32 = 10;

    /// Power-ups
    pub const POWERUP_TTL: u32 = 600; // 10 seconds at 60 Hz
    pub const POWERUP_DURATION: u32 = 600;
    pub const POWERUP_SPAWN_CHANCE: f64 = 0.35;
    pub const BASE_POWERUP_RADIUS: f32 = 20.0;
    pub const POWERUP_DRIFT: f32 = 0.5;
    pub const MULTI_SHOT_COUNT: usize = 3;
    /// Angle between neighbouring multi-shot bullets (radians)
    pub const MULTI_SHOT_SPREAD: f32 = 0.2;
    pub const POWER_SHOT_MULTIPLIER: f32 = 2.0;
    pub const SHIELD_HITS: u32 = 3;

    /// Scoring
    pub const ASTEROID_SCORE: u64 = 100;
    pub const POWER_SHOT_BONUS: u64 = 100;
    pub const SHIELD_BLOCK_SCORE: u64 = 50;

    /// Decorative start-screen asteroids
    pub const BACKGROUND_ASTEROID_COUNT: usize = 15;
    pub const BACKGROUND_ASTEROID_SPEED: f32 = 1.5;
    pub const BACKGROUND_ASTEROID_OPACITY: f32 = 0.15;

    /// Convert a wall-clock duration to whole ticks at the nominal rate
    pub const fn ms_to_ticks(ms: u32) -> u32 {
        ms * TICK_RATE_HZ / 1000
    }
}

/// Wrap a coordinate into `[0, extent)` (toroidal world)
#[inline]
pub fn wrap_coord(value: f32, extent: f32) -> f32 {
    if !value.is_finite() || !extent.is_finite() || extent <= 0.0 {
        return 0.0;
    }
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if wrapped >= extent { 0.0 } else { wrapped }
}

/// Normalize angle to [-PI, PI)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return 0.0;
    }
    (angle + PI).rem_euclid(TAU) - PI
}

/// Unit vector pointing along `angle`
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Rescale `vel` so its length does not exceed `max`, preserving direction
#[inline]
pub fn limit_velocity(vel: Vec2, max: f32) -> Vec2 {
    let speed = vel.length();
    if speed > max {
        vel * (max / speed)
    } else {
        vel
    }
}
