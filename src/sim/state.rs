//! Game state and core simulation types
//!
//! Plain data only. Behaviour lives in the sibling modules, which all mutate
//! the one `GameState` owned by the tick loop.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Stable entity identity (never reused within a process)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Title screen, only decorative asteroids move
    Start,
    /// Active gameplay
    Playing,
    /// Run ended, gameplay entities frozen
    GameOver,
}

/// World extents in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

impl WorldBounds {
    /// Smallest accepted extent on either axis
    pub const MIN_EXTENT: f32 = 1.0;

    /// Build bounds, clamping NaN, infinite and undersized extents
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: sanitize_extent(width),
            height: sanitize_extent(height),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Wrap a position onto the torus
    pub fn wrap(&self, pos: Vec2) -> Vec2 {
        Vec2::new(
            crate::wrap_coord(pos.x, self.width),
            crate::wrap_coord(pos.y, self.height),
        )
    }

    /// Clamp a position into the visible area (used after a resize)
    pub fn clamp(&self, pos: Vec2) -> Vec2 {
        if !pos.is_finite() {
            return self.center();
        }
        // Keep strictly below the far edge so wrap() leaves it alone
        let max_x = (self.width - f32::EPSILON * self.width).max(0.0);
        let max_y = (self.height - f32::EPSILON * self.height).max(0.0);
        Vec2::new(pos.x.clamp(0.0, max_x), pos.y.clamp(0.0, max_y))
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.x < self.width && pos.y >= 0.0 && pos.y < self.height
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self::new(DEFAULT_WORLD_WIDTH, DEFAULT_WORLD_HEIGHT)
    }
}

fn sanitize_extent(value: f32) -> f32 {
    if value.is_finite() {
        value.max(WorldBounds::MIN_EXTENT)
    } else {
        WorldBounds::MIN_EXTENT
    }
}

/// Clamp the global size multiplier into a usable range
pub fn sanitize_scale(scale: f32) -> f32 {
    if scale.is_finite() {
        scale.clamp(MIN_SCALE, MAX_SCALE)
    } else {
        1.0
    }
}

fn live() -> bool {
    true
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    MultiShot,
    PowerShot,
    RapidFire,
    Shield,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 4] = [
        PowerupKind::MultiShot,
        PowerupKind::PowerShot,
        PowerupKind::RapidFire,
        PowerupKind::Shield,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerupKind::MultiShot => "MULTI_SHOT",
            PowerupKind::PowerShot => "POWER_SHOT",
            PowerupKind::RapidFire => "RAPID_FIRE",
            PowerupKind::Shield => "SHIELD",
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    /// Regenerated on every new game
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub thrusting: bool,
    pub can_shoot: bool,
    /// Ticks until `can_shoot` is restored
    pub cooldown_ticks: u32,
    /// Asteroid hits absorbed before death
    pub shields: u32,
    /// Remaining ticks per active power-up (key present only while active)
    pub active_powerups: BTreeMap<PowerupKind, u32>,
}

impl Ship {
    pub fn new(id: EntityId, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
            thrusting: false,
            can_shoot: true,
            cooldown_ticks: 0,
            shields: STARTING_SHIELDS,
            active_powerups: BTreeMap::new(),
        }
    }

    pub fn has_powerup(&self, kind: PowerupKind) -> bool {
        self.active_powerups.contains_key(&kind)
    }
}

/// Asteroid size classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AsteroidTier {
    Large,
    Medium,
    Small,
}

impl AsteroidTier {
    pub const ALL: [AsteroidTier; 3] = [AsteroidTier::Large, AsteroidTier::Medium, AsteroidTier::Small];

    /// Unscaled radius
    pub fn base_size(&self) -> f32 {
        match self {
            AsteroidTier::Large => BASE_ASTEROID_SIZES[0],
            AsteroidTier::Medium => BASE_ASTEROID_SIZES[1],
            AsteroidTier::Small => BASE_ASTEROID_SIZES[2],
        }
    }

    /// Next smaller tier, `None` for the smallest
    pub fn split(&self) -> Option<AsteroidTier> {
        match self {
            AsteroidTier::Large => Some(AsteroidTier::Medium),
            AsteroidTier::Medium => Some(AsteroidTier::Small),
            AsteroidTier::Small => None,
        }
    }
}

/// An asteroid entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub tier: AsteroidTier,
    /// Collision radius: tier size times the global scale
    pub size: f32,
    /// Polygon offsets, fixed at creation
    pub vertices: Vec<Vec2>,
    pub opacity: f32,
    #[serde(skip, default = "live")]
    pub alive: bool,
}

/// A projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub ttl_ticks: u32,
    /// Damage multiplier; above 1 destroys any tier outright
    pub power: f32,
    #[serde(skip, default = "live")]
    pub alive: bool,
}

/// A collectible power-up floating in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Powerup {
    pub id: EntityId,
    pub kind: PowerupKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    /// World lifespan, unrelated to the applied effect duration
    pub ttl_ticks: u32,
    #[serde(skip, default = "live")]
    pub alive: bool,
}

/// Complete game state for one process
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub status: GameStatus,
    pub bounds: WorldBounds,
    /// Global entity size multiplier
    pub scale: f32,
    pub ship: Ship,
    /// Sorted by id at the end of every tick
    pub asteroids: Vec<Asteroid>,
    pub bullets: Vec<Bullet>,
    pub powerups: Vec<Powerup>,
    /// Decorative title-screen asteroids, never collide
    pub background_asteroids: Vec<Asteroid>,
    pub score: u64,
    pub high_score: u64,
    /// Ticks until the next periodic asteroid
    pub spawn_timer: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    next_id: u32,
}

impl GameState {
    /// Create the title-screen state with the given seed
    pub fn new(seed: u64, bounds: WorldBounds, scale: f32, high_score: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            status: GameStatus::Start,
            bounds,
            scale: sanitize_scale(scale),
            ship: Ship::new(EntityId(0), bounds.center()),
            asteroids: Vec::new(),
            bullets: Vec::new(),
            powerups: Vec::new(),
            background_asteroids: Vec::new(),
            score: 0,
            high_score,
            spawn_timer: INITIAL_SPAWN_INTERVAL,
            time_ticks: 0,
            next_id: 1,
        };
        state.ship.id = state.next_entity_id();
        super::spawner::populate_background(&mut state);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Ship collision diameter
    pub fn ship_size(&self) -> f32 {
        BASE_SHIP_SIZE * self.scale
    }

    pub fn powerup_radius(&self) -> f32 {
        BASE_POWERUP_RADIUS * self.scale
    }

    /// Largest radius that can take part in an overlap test
    pub fn max_collision_radius(&self) -> f32 {
        let largest_asteroid = BASE_ASTEROID_SIZES[0] * self.scale;
        let ship_half = self.ship_size() / 2.0;
        (largest_asteroid + ship_half).max(self.powerup_radius() + ship_half)
    }

    /// Drop dead entities in one pass
    pub fn compact(&mut self) {
        self.asteroids.retain(|a| a.alive);
        self.bullets.retain(|b| b.alive);
        self.powerups.retain(|p| p.alive);
    }

    /// Ensure collections are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.asteroids.sort_by_key(|a| a.id);
        self.bullets.sort_by_key(|b| b.id);
        self.powerups.sort_by_key(|p| p.id);
    }

    /// Replace the world bounds and pull every entity back inside them
    pub fn set_bounds(&mut self, bounds: WorldBounds) {
        self.bounds = bounds;
        self.ship.pos = bounds.clamp(self.ship.pos);
        for asteroid in &mut self.asteroids {
            asteroid.pos = bounds.wrap(asteroid.pos);
        }
        for bullet in &mut self.bullets {
            bullet.pos = bounds.wrap(bullet.pos);
        }
        for powerup in &mut self.powerups {
            powerup.pos = bounds.wrap(powerup.pos);
        }
    }
}
