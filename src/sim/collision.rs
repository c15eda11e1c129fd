//! Collision detection and response
//!
//! Runs once per tick while playing. Every live asteroid, bullet and power-up
//! goes into a fresh `SpatialGrid`; each query then only looks at the 3x3
//! cells around the entity being tested.
//!
//! Hits mark entities dead instead of removing them, and new asteroids or
//! power-ups are emitted as `SpawnRequest`s for the spawner. Indices stay
//! valid for the whole pass and the collections are compacted once at the end.
//!
//! Ordering rules:
//! - bullets are processed in id order; the first bullet to reach an asteroid
//!   consumes it and a bullet consumes at most one asteroid
//! - a bullet overlapping several asteroids hits the nearest (ties: lower id)
//! - ship pickups and ship hits are processed in asteroid/power-up id order
//!
//! Overlaps use plain Euclidean distance and are not seam-aware: two entities
//! touching only across the wrap edge do not collide until one of them wraps.

use glam::Vec2;

use super::effects;
use super::grid::{EntityKind, SpatialGrid};
use super::state::{AsteroidTier, EntityId, GameState, GameStatus, PowerupKind};
use crate::consts::*;

/// Work for the spawner produced by a destruction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnRequest {
    /// Split into fragments of `tier` at `pos`, inheriting `parent_vel`
    Fragments {
        tier: AsteroidTier,
        pos: Vec2,
        parent_vel: Vec2,
    },
    /// Roll for a power-up drop at `pos`
    PowerupDrop { pos: Vec2 },
}

/// Outcome of one resolution pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    pub asteroids_destroyed: u32,
    pub bullets_spent: u32,
    pub powerups_collected: Vec<PowerupKind>,
    /// Asteroid hits absorbed by shields
    pub shield_hits: u32,
    pub ship_destroyed: bool,
    pub spawns: Vec<SpawnRequest>,
}

/// Build the broad-phase grid from the current live entities
pub fn build_grid(state: &GameState) -> SpatialGrid {
    let mut grid = SpatialGrid::new(&state.bounds, state.max_collision_radius());
    for (i, asteroid) in state.asteroids.iter().enumerate() {
        if asteroid.alive {
            grid.insert(EntityKind::Asteroid, i, asteroid.pos);
        }
    }
    for (i, bullet) in state.bullets.iter().enumerate() {
        if bullet.alive {
            grid.insert(EntityKind::Bullet, i, bullet.pos);
        }
    }
    for (i, powerup) in state.powerups.iter().enumerate() {
        if powerup.alive {
            grid.insert(EntityKind::Powerup, i, powerup.pos);
        }
    }
    grid
}

/// Detect and apply every collision for this tick
pub fn resolve(state: &mut GameState) -> CollisionReport {
    let mut report = CollisionReport::default();
    if state.status != GameStatus::Playing {
        return report;
    }

    let grid = build_grid(state);
    resolve_bullets(state, &grid, &mut report);
    resolve_pickups(state, &grid, &mut report);
    resolve_ship_hits(state, &grid, &mut report);

    state.compact();
    report
}

fn resolve_bullets(state: &mut GameState, grid: &SpatialGrid, report: &mut CollisionReport) {
    let mut order: Vec<usize> = (0..state.bullets.len()).collect();
    order.sort_by_key(|&i| state.bullets[i].id);

    for bi in order {
        if !state.bullets[bi].alive {
            continue;
        }
        let bullet_pos = state.bullets[bi].pos;

        let mut target: Option<(f32, EntityId, usize)> = None;
        for ai in grid.query(bullet_pos, EntityKind::Asteroid) {
            let asteroid = &state.asteroids[ai];
            if !asteroid.alive {
                continue;
            }
            let dist = bullet_pos.distance(asteroid.pos);
            if dist > asteroid.size {
                continue;
            }
            let closer = match target {
                None => true,
                Some((best, best_id, _)) => dist < best || (dist == best && asteroid.id < best_id),
            };
            if closer {
                target = Some((dist, asteroid.id, ai));
            }
        }

        if let Some((_, _, ai)) = target {
            state.bullets[bi].alive = false;
            report.bullets_spent += 1;
            let power = state.bullets[bi].power;
            destroy_asteroid(state, ai, power, report);
        }
    }
}

/// Kill an asteroid hit by a bullet of the given power
fn destroy_asteroid(state: &mut GameState, index: usize, power: f32, report: &mut CollisionReport) {
    let asteroid = &mut state.asteroids[index];
    asteroid.alive = false;
    let (id, tier, pos, vel) = (asteroid.id, asteroid.tier, asteroid.pos, asteroid.vel);

    report.asteroids_destroyed += 1;
    state.score = state.score.saturating_add(ASTEROID_SCORE);

    if power > 1.0 {
        // Power shot: no fragments, bigger payout
        state.score = state.score.saturating_add(POWER_SHOT_BONUS);
        log::debug!("Asteroid {:?} ({:?}) vaporised by power shot", id, tier);
    } else if let Some(next) = tier.split() {
        report.spawns.push(SpawnRequest::Fragments {
            tier: next,
            pos,
            parent_vel: vel,
        });
        log::debug!("Asteroid {:?} split into {:?}", id, next);
    }

    report.spawns.push(SpawnRequest::PowerupDrop { pos });
}

fn resolve_pickups(state: &mut GameState, grid: &SpatialGrid, report: &mut CollisionReport) {
    let ship_pos = state.ship.pos;
    let reach = state.powerup_radius() + state.ship_size() / 2.0;

    let mut touching: Vec<usize> = grid
        .query(ship_pos, EntityKind::Powerup)
        .into_iter()
        .filter(|&i| state.powerups[i].alive && ship_pos.distance(state.powerups[i].pos) <= reach)
        .collect();
    touching.sort_by_key(|&i| state.powerups[i].id);

    for pi in touching {
        let powerup = &mut state.powerups[pi];
        powerup.alive = false;
        effects::apply_pickup(&mut state.ship, powerup.kind);
        report.powerups_collected.push(powerup.kind);
        log::debug!("Picked up {}", powerup.kind.as_str());
    }
}

fn resolve_ship_hits(state: &mut GameState, grid: &SpatialGrid, report: &mut CollisionReport) {
    let ship_pos = state.ship.pos;
    let ship_half = state.ship_size() / 2.0;

    let mut hits: Vec<usize> = grid
        .query(ship_pos, EntityKind::Asteroid)
        .into_iter()
        .filter(|&i| {
            let asteroid = &state.asteroids[i];
            asteroid.alive && ship_pos.distance(asteroid.pos) < asteroid.size + ship_half
        })
        .collect();
    hits.sort_by_key(|&i| state.asteroids[i].id);

    for ai in hits {
        if state.ship.shields > 0 {
            state.ship.shields -= 1;
            state.asteroids[ai].alive = false;
            state.score = state.score.saturating_add(SHIELD_BLOCK_SCORE);
            report.shield_hits += 1;
            report.asteroids_destroyed += 1;
            log::debug!("Shield absorbed hit, {} left", state.ship.shields);
        } else {
            state.high_score = state.high_score.max(state.score);
            state.status = GameStatus::GameOver;
            report.ship_destroyed = true;
            log::info!("Ship destroyed: score {} (high score {})", state.score, state.high_score);
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawner;
    use crate::sim::state::{Asteroid, Bullet, Powerup, WorldBounds};

    /// Playing state with nothing in the world
    fn empty_game() -> GameState {
        let mut state = GameState::new(42, WorldBounds::new(1000.0, 1000.0), 1.0, 0);
        state.background_asteroids.clear();
        state.status = GameStatus::Playing;
        state.ship.pos = Vec2::new(900.0, 900.0);
        state
    }

    fn add_rock(state: &mut GameState, tier: AsteroidTier, pos: Vec2) -> EntityId {
        let asteroid = spawner::create_asteroid(state, tier, pos, Vec2::new(0.5, -0.25));
        let id = asteroid.id;
        state.asteroids.push(asteroid);
        id
    }

    fn add_bullet(state: &mut GameState, pos: Vec2, power: f32) -> EntityId {
        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
            ttl_ticks: BULLET_TTL,
            power,
            alive: true,
        });
        id
    }

    fn add_powerup(state: &mut GameState, kind: PowerupKind, pos: Vec2) {
        let id = state.next_entity_id();
        state.powerups.push(Powerup {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
            ttl_ticks: POWERUP_TTL,
            alive: true,
        });
    }

    fn fragments(report: &CollisionReport) -> Vec<AsteroidTier> {
        report
            .spawns
            .iter()
            .filter_map(|s| match s {
                SpawnRequest::Fragments { tier, .. } => Some(*tier),
                SpawnRequest::PowerupDrop { .. } => None,
            })
            .collect()
    }

    fn tiers(asteroids: &[Asteroid]) -> Vec<AsteroidTier> {
        asteroids.iter().map(|a| a.tier).collect()
    }

    #[test]
    fn test_large_asteroid_splits_in_two() {
        let mut state = empty_game();
        add_rock(&mut state, AsteroidTier::Large, Vec2::new(200.0, 200.0));
        add_bullet(&mut state, Vec2::new(210.0, 200.0), 1.0);

        let report = resolve(&mut state);
        assert_eq!(report.asteroids_destroyed, 1);
        assert_eq!(fragments(&report), vec![AsteroidTier::Medium]);
        assert!(state.asteroids.is_empty());
        assert!(state.bullets.is_empty());
        assert_eq!(state.score, ASTEROID_SCORE);

        spawner::fulfill(&mut state, &report.spawns);
        assert_eq!(tiers(&state.asteroids), vec![AsteroidTier::Medium, AsteroidTier::Medium]);
        for rock in &state.asteroids {
            assert_eq!(rock.pos, Vec2::new(200.0, 200.0));
            assert_eq!(rock.size, BASE_ASTEROID_SIZES[1]);
        }
    }

    #[test]
    fn test_small_asteroid_destroyed_outright() {
        let mut state = empty_game();
        add_rock(&mut state, AsteroidTier::Small, Vec2::new(300.0, 300.0));
        add_bullet(&mut state, Vec2::new(305.0, 300.0), 1.0);

        let report = resolve(&mut state);
        assert!(fragments(&report).is_empty());
        spawner::fulfill(&mut state, &report.spawns);
        assert!(state.asteroids.is_empty());
        assert_eq!(state.score, ASTEROID_SCORE);
    }

    #[test]
    fn test_power_shot_skips_split() {
        let mut state = empty_game();
        add_rock(&mut state, AsteroidTier::Large, Vec2::new(200.0, 200.0));
        add_bullet(&mut state, Vec2::new(200.0, 230.0), POWER_SHOT_MULTIPLIER);

        let report = resolve(&mut state);
        assert!(fragments(&report).is_empty());
        assert!(state.asteroids.is_empty());
        assert_eq!(state.score, ASTEROID_SCORE + POWER_SHOT_BONUS);
    }

    #[test]
    fn test_one_bullet_per_asteroid() {
        let mut state = empty_game();
        add_rock(&mut state, AsteroidTier::Small, Vec2::new(400.0, 400.0));
        let first = add_bullet(&mut state, Vec2::new(401.0, 400.0), 1.0);
        let second = add_bullet(&mut state, Vec2::new(399.0, 400.0), 1.0);

        let report = resolve(&mut state);
        assert_eq!(report.bullets_spent, 1);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bullets[0].id, second);
        assert_ne!(first, second);
    }

    #[test]
    fn test_bullet_hits_only_nearest() {
        let mut state = empty_game();
        let far = add_rock(&mut state, AsteroidTier::Large, Vec2::new(240.0, 200.0));
        let near = add_rock(&mut state, AsteroidTier::Large, Vec2::new(205.0, 200.0));
        add_bullet(&mut state, Vec2::new(200.0, 200.0), 1.0);

        let report = resolve(&mut state);
        assert_eq!(report.asteroids_destroyed, 1);
        assert_eq!(state.asteroids.len(), 1);
        assert_eq!(state.asteroids[0].id, far);
        assert_ne!(far, near);
    }

    #[test]
    fn test_bullet_order_does_not_matter() {
        let build = |reverse: bool| {
            let mut state = empty_game();
            add_rock(&mut state, AsteroidTier::Medium, Vec2::new(100.0, 100.0));
            add_rock(&mut state, AsteroidTier::Small, Vec2::new(600.0, 150.0));
            add_rock(&mut state, AsteroidTier::Large, Vec2::new(500.0, 700.0));
            add_bullet(&mut state, Vec2::new(102.0, 100.0), 1.0);
            add_bullet(&mut state, Vec2::new(600.0, 152.0), 1.0);
            add_bullet(&mut state, Vec2::new(50.0, 900.0), 1.0);
            if reverse {
                state.asteroids.reverse();
                state.bullets.reverse();
            }
            let report = resolve(&mut state);
            state.normalize_order();
            let ids: Vec<EntityId> = state.asteroids.iter().map(|a| a.id).collect();
            let bullets: Vec<EntityId> = state.bullets.iter().map(|b| b.id).collect();
            (report.asteroids_destroyed, ids, bullets, state.score)
        };
        assert_eq!(build(false), build(true));
    }

    #[test]
    fn test_unshielded_hit_ends_game() {
        let mut state = empty_game();
        state.score = 700;
        state.high_score = 500;
        let pos = state.ship.pos;
        add_rock(&mut state, AsteroidTier::Large, pos + Vec2::new(10.0, 0.0));

        let report = resolve(&mut state);
        assert!(report.ship_destroyed);
        assert_eq!(state.status, GameStatus::GameOver);
        assert_eq!(state.high_score, 700);
    }

    #[test]
    fn test_lower_score_keeps_high_score() {
        let mut state = empty_game();
        state.score = 100;
        state.high_score = 500;
        let pos = state.ship.pos;
        add_rock(&mut state, AsteroidTier::Small, pos);

        resolve(&mut state);
        assert_eq!(state.status, GameStatus::GameOver);
        assert_eq!(state.high_score, 500);
    }

    #[test]
    fn test_shield_absorbs_single_hit() {
        let mut state = empty_game();
        state.ship.shields = 2;
        let pos = state.ship.pos;
        add_rock(&mut state, AsteroidTier::Medium, pos + Vec2::new(0.0, 20.0));

        let report = resolve(&mut state);
        assert_eq!(report.shield_hits, 1);
        assert_eq!(state.ship.shields, 1);
        assert_eq!(state.status, GameStatus::Playing);
        assert!(state.asteroids.is_empty());
        assert_eq!(state.score, SHIELD_BLOCK_SCORE);
    }

    #[test]
    fn test_simultaneous_hits_consume_one_shield_each() {
        let mut state = empty_game();
        state.ship.shields = 1;
        let pos = state.ship.pos;
        add_rock(&mut state, AsteroidTier::Small, pos + Vec2::new(5.0, 0.0));
        add_rock(&mut state, AsteroidTier::Small, pos + Vec2::new(-5.0, 0.0));
        add_rock(&mut state, AsteroidTier::Small, pos + Vec2::new(0.0, 5.0));

        let report = resolve(&mut state);
        assert_eq!(report.shield_hits, 1);
        assert_eq!(state.ship.shields, 0);
        assert!(report.ship_destroyed);
        assert_eq!(state.status, GameStatus::GameOver);
        // One absorbed, the killing rock and the unprocessed one remain
        assert_eq!(state.asteroids.len(), 2);
    }

    #[test]
    fn test_bullet_kill_happens_before_ship_hit() {
        let mut state = empty_game();
        let pos = state.ship.pos;
        add_rock(&mut state, AsteroidTier::Small, pos + Vec2::new(10.0, 0.0));
        add_bullet(&mut state, pos + Vec2::new(12.0, 0.0), 1.0);

        let report = resolve(&mut state);
        assert!(!report.ship_destroyed);
        assert_eq!(state.status, GameStatus::Playing);
    }

    #[test]
    fn test_no_hit_across_wrap_seam() {
        let mut state = GameState::new(42, WorldBounds::new(800.0, 600.0), 1.0, 0);
        state.background_asteroids.clear();
        state.status = GameStatus::Playing;
        state.ship.pos = Vec2::new(2.0, 300.0);
        add_rock(&mut state, AsteroidTier::Large, Vec2::new(795.0, 300.0));

        let report = resolve(&mut state);
        assert!(!report.ship_destroyed);
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.asteroids.len(), 1);
    }

    #[test]
    fn test_pickups() {
        let mut state = empty_game();
        let pos = state.ship.pos;
        add_powerup(&mut state, PowerupKind::Shield, pos + Vec2::new(5.0, 0.0));
        add_powerup(&mut state, PowerupKind::MultiShot, pos + Vec2::new(0.0, 5.0));
        add_powerup(&mut state, PowerupKind::RapidFire, Vec2::new(10.0, 10.0));

        let report = resolve(&mut state);
        assert_eq!(report.powerups_collected, vec![PowerupKind::Shield, PowerupKind::MultiShot]);
        assert_eq!(state.ship.shields, SHIELD_HITS);
        assert_eq!(state.ship.active_powerups.get(&PowerupKind::MultiShot), Some(&POWERUP_DURATION));
        assert!(!state.ship.has_powerup(PowerupKind::Shield));
        assert_eq!(state.powerups.len(), 1);
    }

    #[test]
    fn test_nothing_happens_outside_playing() {
        let mut state = empty_game();
        state.status = GameStatus::GameOver;
        let pos = state.ship.pos;
        add_rock(&mut state, AsteroidTier::Large, pos);
        let report = resolve(&mut state);
        assert_eq!(report, CollisionReport::default());
        assert_eq!(state.asteroids.len(), 1);
    }
}
