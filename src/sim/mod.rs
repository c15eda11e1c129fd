//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Whole ticks only, every constant tuned per tick
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod grid;
pub mod physics;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod weapon;

pub use collision::{CollisionReport, SpawnRequest};
pub use grid::{EntityKind, SpatialGrid};
pub use spawner::new_game;
pub use state::{
    Asteroid, AsteroidTier, Bullet, EntityId, GameState, GameStatus, Powerup, PowerupKind, Ship,
    WorldBounds,
};
pub use tick::{ControlInput, TickEvents, TickInput, activate, tick};
