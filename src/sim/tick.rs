//! Fixed timestep simulation tick
//!
//! One call advances the whole world by exactly one frame, in a fixed order:
//! ship, asteroids, weapon, bullets and power-ups, effect timers, collisions,
//! spawns. Collections are re-sorted by id at the end so the next tick
//! iterates them in the same order regardless of how they were built.

use serde::{Deserialize, Serialize};

use super::state::{GameState, GameStatus, PowerupKind};
use super::{collision, effects, physics, spawner, weapon};

/// Held controls for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlInput {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub thrust: bool,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub controls: ControlInput,
    /// One-shot fire request, honoured only if the weapon is ready
    pub fire: bool,
}

/// What happened during a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickEvents {
    pub shots_fired: usize,
    pub asteroids_destroyed: u32,
    pub shield_hits: u32,
    pub powerups_collected: Vec<PowerupKind>,
    pub powerups_expired: Vec<PowerupKind>,
    pub asteroid_spawned: bool,
    /// The ship was destroyed this tick
    pub game_over: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) -> TickEvents {
    let mut events = TickEvents::default();

    match state.status {
        GameStatus::Start => {
            state.time_ticks += 1;
            physics::integrate_background(state);
            return events;
        }
        GameStatus::GameOver => return events,
        GameStatus::Playing => {}
    }

    state.time_ticks += 1;

    physics::integrate_ship(&mut state.ship, &input.controls, &state.bounds);
    physics::integrate_asteroids(&mut state.asteroids, &state.bounds);

    weapon::update_cooldown(&mut state.ship);
    if input.fire {
        events.shots_fired = weapon::fire(state);
    }

    physics::integrate_bullets(state);
    physics::integrate_powerups(state);
    events.powerups_expired = effects::tick_effects(&mut state.ship);

    let report = collision::resolve(state);
    spawner::fulfill(state, &report.spawns);
    events.asteroids_destroyed = report.asteroids_destroyed;
    events.shield_hits = report.shield_hits;
    events.powerups_collected = report.powerups_collected;
    events.game_over = report.ship_destroyed;

    events.asteroid_spawned = spawner::spawn_if_due(state);

    state.normalize_order();
    events
}

/// Start or restart request
///
/// From the title screen or the game-over screen this begins a new game,
/// carrying the current high score over. Ignored while playing. Returns true
/// when a new game was started.
pub fn activate(state: &mut GameState) -> bool {
    match state.status {
        GameStatus::Start | GameStatus::GameOver => {
            let high_score = state.high_score.max(state.score);
            spawner::new_game(state, high_score);
            true
        }
        GameStatus::Playing => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{AsteroidTier, WorldBounds};
    use glam::Vec2;

    fn thrust() -> TickInput {
        TickInput {
            controls: ControlInput {
                thrust: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Put a small asteroid right on top of the ship
    fn ram_ship(state: &mut GameState) {
        let pos = state.ship.pos;
        let rock = spawner::create_asteroid(state, AsteroidTier::Small, pos, Vec2::ZERO);
        state.asteroids.push(rock);
    }

    #[test]
    fn test_new_game_then_thrust() {
        let mut state = GameState::new(12345, WorldBounds::default(), 1.0, 0);
        spawner::new_game(&mut state, 500);
        let center = state.bounds.center();

        tick(&mut state, &thrust());

        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.high_score, 500);
        assert!(state.ship.can_shoot);
        assert_eq!(state.ship.shields, STARTING_SHIELDS);
        assert!((state.ship.vel.x - THRUST_SPEED * FRICTION).abs() < 1e-6);
        assert_eq!(state.ship.vel.y, 0.0);
        assert!((state.ship.pos - (center + Vec2::new(THRUST_SPEED, 0.0))).length() < 1e-4);
    }

    #[test]
    fn test_start_screen_only_animates_background() {
        let mut state = GameState::new(5, WorldBounds::default(), 1.0, 0);
        let before: Vec<Vec2> = state.background_asteroids.iter().map(|a| a.pos).collect();
        let ship_before = state.ship.pos;

        let events = tick(
            &mut state,
            &TickInput {
                fire: true,
                ..thrust()
            },
        );

        assert_eq!(events.shots_fired, 0);
        assert_eq!(state.status, GameStatus::Start);
        assert_eq!(state.ship.pos, ship_before);
        assert!(state.bullets.is_empty());
        let after: Vec<Vec2> = state.background_asteroids.iter().map(|a| a.pos).collect();
        assert_ne!(before, after);
    }

    #[test]
    fn test_activate_transitions() {
        let mut state = GameState::new(5, WorldBounds::default(), 1.0, 0);
        assert!(activate(&mut state));
        assert_eq!(state.status, GameStatus::Playing);
        let ship_id = state.ship.id;

        // No effect while playing
        assert!(!activate(&mut state));
        assert_eq!(state.ship.id, ship_id);

        ram_ship(&mut state);
        let events = tick(&mut state, &TickInput::default());
        assert!(events.game_over);
        assert_eq!(state.status, GameStatus::GameOver);

        assert!(activate(&mut state));
        assert_eq!(state.status, GameStatus::Playing);
        assert_ne!(state.ship.id, ship_id);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_game_over_is_frozen() {
        let mut state = GameState::new(5, WorldBounds::default(), 1.0, 0);
        activate(&mut state);
        ram_ship(&mut state);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.status, GameStatus::GameOver);

        let frozen: Vec<Vec2> = state.asteroids.iter().map(|a| a.pos).collect();
        let ticks = state.time_ticks;
        tick(&mut state, &thrust());
        let after: Vec<Vec2> = state.asteroids.iter().map(|a| a.pos).collect();
        assert_eq!(frozen, after);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_shields_absorb_three_hits() {
        let mut state = GameState::new(31, WorldBounds::default(), 1.0, 0);
        activate(&mut state);
        state.ship.shields = 3;

        for remaining in (0..3).rev() {
            ram_ship(&mut state);
            let events = tick(&mut state, &TickInput::default());
            assert_eq!(events.shield_hits, 1);
            assert_eq!(state.ship.shields, remaining);
            assert_eq!(state.status, GameStatus::Playing);
        }

        ram_ship(&mut state);
        let events = tick(&mut state, &TickInput::default());
        assert!(events.game_over);
        assert_eq!(state.status, GameStatus::GameOver);
    }

    #[test]
    fn test_fire_through_tick_respects_cooldown() {
        let mut state = GameState::new(2, WorldBounds::default(), 1.0, 0);
        activate(&mut state);
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };

        let mut shots = Vec::new();
        for t in 0..(SHOT_COOLDOWN_TICKS * 2 + 1) {
            if tick(&mut state, &fire).shots_fired > 0 {
                shots.push(t);
            }
            if state.status != GameStatus::Playing {
                break;
            }
        }
        assert_eq!(shots, vec![0, SHOT_COOLDOWN_TICKS, SHOT_COOLDOWN_TICKS * 2]);
    }

    #[test]
    fn test_score_never_decreases() {
        let mut state = GameState::new(777, WorldBounds::default(), 1.0, 0);
        activate(&mut state);
        let input = TickInput {
            controls: ControlInput {
                rotate_right: true,
                ..Default::default()
            },
            fire: true,
        };
        let mut last = 0;
        for _ in 0..600 {
            tick(&mut state, &input);
            assert!(state.score >= last);
            last = state.score;
            if state.status == GameStatus::GameOver {
                assert!(state.high_score >= state.score);
                break;
            }
        }
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999, WorldBounds::default(), 1.0, 0);
        let mut state2 = GameState::new(99999, WorldBounds::default(), 1.0, 0);
        activate(&mut state1);
        activate(&mut state2);

        let inputs = [
            thrust(),
            TickInput {
                fire: true,
                ..Default::default()
            },
            TickInput {
                controls: ControlInput {
                    rotate_left: true,
                    thrust: true,
                    ..Default::default()
                },
                fire: true,
            },
            TickInput::default(),
        ];

        for i in 0..400 {
            let input = &inputs[i % inputs.len()];
            let e1 = tick(&mut state1, input);
            let e2 = tick(&mut state2, input);
            assert_eq!(e1, e2);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.ship, state2.ship);
        assert_eq!(state1.asteroids, state2.asteroids);
        assert_eq!(state1.bullets, state2.bullets);
        assert_eq!(state1.powerups, state2.powerups);
        assert_eq!(state1.score, state2.score);
    }
}
