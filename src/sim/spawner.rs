//! Entity creation: new games, periodic asteroids, fragments and drops
//!
//! All randomness comes from the state's seeded RNG, so the sequence of
//! spawns is reproducible for a given seed and input history.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::collision::SpawnRequest;
use super::state::{Asteroid, AsteroidTier, GameState, GameStatus, Powerup, PowerupKind, Ship, WorldBounds};
use crate::consts::*;
use crate::heading;

/// Fragments created when an asteroid splits
pub const FRAGMENTS_PER_SPLIT: usize = 2;

/// Ticks between periodic spawns at the given score
///
/// Shrinks by `SPAWN_INTERVAL_DECREASE` per 100 points, floored at
/// `MIN_SPAWN_INTERVAL`.
pub fn spawn_interval(score: u64) -> u32 {
    let decrease = (score / 100).saturating_mul(SPAWN_INTERVAL_DECREASE as u64);
    (INITIAL_SPAWN_INTERVAL as u64)
        .saturating_sub(decrease)
        .max(MIN_SPAWN_INTERVAL as u64) as u32
}

/// Irregular polygon: fixed vertex count at 80-120% of the radius
pub fn asteroid_vertices<R: Rng>(rng: &mut R, size: f32) -> Vec<Vec2> {
    (0..ASTEROID_VERTEX_COUNT)
        .map(|i| {
            let angle = i as f32 / ASTEROID_VERTEX_COUNT as f32 * TAU;
            let radius = size * (0.8 + rng.random::<f32>() * 0.4);
            heading(angle) * radius
        })
        .collect()
}

/// Random drift in `[-1, 1)` per axis
pub fn random_drift<R: Rng>(rng: &mut R) -> Vec2 {
    Vec2::new(
        (rng.random::<f32>() - 0.5) * 2.0,
        (rng.random::<f32>() - 0.5) * 2.0,
    )
}

/// Build an asteroid with a fresh id and shape (not yet added to the world)
pub fn create_asteroid(state: &mut GameState, tier: AsteroidTier, pos: Vec2, vel: Vec2) -> Asteroid {
    let id = state.next_entity_id();
    let size = tier.base_size() * state.scale;
    Asteroid {
        id,
        pos,
        vel,
        rotation: state.rng.random::<f32>() * TAU,
        tier,
        size,
        vertices: asteroid_vertices(&mut state.rng, size),
        opacity: 1.0,
        alive: true,
    }
}

/// Uniform position at least `min_distance` away from `avoid`
///
/// Rejection sampling is capped at `MAX_SPAWN_ATTEMPTS`; if the world is too
/// small to satisfy the distance, the farthest candidate seen is used.
pub fn safe_spawn_position<R: Rng>(rng: &mut R, bounds: &WorldBounds, avoid: Vec2, min_distance: f32) -> Vec2 {
    let mut best = (f32::NEG_INFINITY, bounds.center());
    for _ in 0..MAX_SPAWN_ATTEMPTS {
        let candidate = bounds.wrap(Vec2::new(
            rng.random::<f32>() * bounds.width,
            rng.random::<f32>() * bounds.height,
        ));
        let dist = candidate.distance(avoid);
        if dist >= min_distance {
            return candidate;
        }
        if dist > best.0 {
            best = (dist, candidate);
        }
    }
    log::warn!(
        "No spawn point {:.0}px from the ship in a {}x{} world, using farthest ({:.0}px)",
        min_distance,
        bounds.width,
        bounds.height,
        best.0
    );
    best.1
}

/// Fill the title screen with faint drifting rocks
pub fn populate_background(state: &mut GameState) {
    state.background_asteroids.clear();
    for _ in 0..BACKGROUND_ASTEROID_COUNT {
        let tier = AsteroidTier::ALL[state.rng.random_range(0..AsteroidTier::ALL.len())];
        let pos = Vec2::new(
            state.rng.random::<f32>() * state.bounds.width,
            state.rng.random::<f32>() * state.bounds.height,
        );
        let vel = heading(state.rng.random::<f32>() * TAU) * BACKGROUND_ASTEROID_SPEED;
        let mut rock = create_asteroid(state, tier, pos, vel);
        rock.opacity = BACKGROUND_ASTEROID_OPACITY;
        state.background_asteroids.push(rock);
    }
}

/// Reset everything for a fresh run
pub fn new_game(state: &mut GameState, high_score: u64) {
    let center = state.bounds.center();
    let id = state.next_entity_id();
    state.ship = Ship::new(id, center);

    state.asteroids.clear();
    state.bullets.clear();
    state.powerups.clear();
    state.background_asteroids.clear();

    state.score = 0;
    state.high_score = high_score;
    state.spawn_timer = INITIAL_SPAWN_INTERVAL;
    state.status = GameStatus::Playing;

    let min_distance = MIN_ASTEROID_DISTANCE * state.scale;
    for _ in 0..INITIAL_ASTEROID_COUNT {
        let pos = safe_spawn_position(&mut state.rng, &state.bounds, center, min_distance);
        let vel = random_drift(&mut state.rng);
        let asteroid = create_asteroid(state, AsteroidTier::Large, pos, vel);
        state.asteroids.push(asteroid);
    }

    log::info!(
        "New game: {} asteroids, high score {}",
        state.asteroids.len(),
        state.high_score
    );
}

/// Count down the spawn timer and add a small asteroid when it fires
///
/// Returns true when an asteroid was spawned.
pub fn spawn_if_due(state: &mut GameState) -> bool {
    if state.status != GameStatus::Playing {
        return false;
    }
    state.spawn_timer = state.spawn_timer.saturating_sub(1);
    if state.spawn_timer > 0 {
        return false;
    }

    let min_distance = MIN_ASTEROID_DISTANCE * state.scale;
    let pos = safe_spawn_position(&mut state.rng, &state.bounds, state.ship.pos, min_distance);
    let vel = random_drift(&mut state.rng);
    let asteroid = create_asteroid(state, AsteroidTier::Small, pos, vel);
    state.asteroids.push(asteroid);

    state.spawn_timer = spawn_interval(state.score);
    log::debug!("Periodic asteroid spawned, next in {} ticks", state.spawn_timer);
    true
}

/// Drop a power-up of the given kind at `pos`
pub fn spawn_powerup(state: &mut GameState, kind: PowerupKind, pos: Vec2) {
    let id = state.next_entity_id();
    let vel = random_drift(&mut state.rng) * POWERUP_DRIFT;
    state.powerups.push(Powerup {
        id,
        kind,
        pos,
        vel,
        rotation: 0.0,
        ttl_ticks: POWERUP_TTL,
        alive: true,
    });
}

/// Carry out the spawn requests produced by collision resolution
pub fn fulfill(state: &mut GameState, requests: &[SpawnRequest]) {
    for request in requests {
        match *request {
            SpawnRequest::Fragments { tier, pos, parent_vel } => {
                for _ in 0..FRAGMENTS_PER_SPLIT {
                    let vel = parent_vel + random_drift(&mut state.rng);
                    let fragment = create_asteroid(state, tier, pos, vel);
                    state.asteroids.push(fragment);
                }
            }
            SpawnRequest::PowerupDrop { pos } => {
                if state.rng.random_bool(POWERUP_SPAWN_CHANCE) {
                    let kind = PowerupKind::ALL[state.rng.random_range(0..PowerupKind::ALL.len())];
                    spawn_powerup(state, kind, pos);
                    log::debug!("Dropped {} power-up", kind.as_str());
                }
            }
        }
    }
}
