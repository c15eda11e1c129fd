//! Ship weapon: cooldown and bullet creation

use super::state::{Bullet, GameState, GameStatus, PowerupKind, Ship};
use crate::consts::*;
use crate::heading;

/// Tick the shot cooldown, re-arming the ship when it reaches zero
pub fn update_cooldown(ship: &mut Ship) {
    ship.cooldown_ticks = ship.cooldown_ticks.saturating_sub(1);
    if ship.cooldown_ticks == 0 {
        ship.can_shoot = true;
    }
}

/// Firing angles for the ship's current loadout
fn shot_angles(ship: &Ship) -> Vec<f32> {
    if ship.has_powerup(PowerupKind::MultiShot) {
        let middle = (MULTI_SHOT_COUNT as f32 - 1.0) / 2.0;
        (0..MULTI_SHOT_COUNT)
            .map(|i| ship.rotation + (i as f32 - middle) * MULTI_SHOT_SPREAD)
            .collect()
    } else {
        vec![ship.rotation]
    }
}

/// Fire from the ship's nose if the weapon is ready
///
/// Bullets leave at `BULLET_SPEED` along their angle plus the ship's own
/// velocity. Returns the number of bullets created.
pub fn fire(state: &mut GameState) -> usize {
    if state.status != GameStatus::Playing || !state.ship.can_shoot {
        return 0;
    }

    let angles = shot_angles(&state.ship);
    let power = if state.ship.has_powerup(PowerupKind::PowerShot) {
        POWER_SHOT_MULTIPLIER
    } else {
        1.0
    };
    let (origin, ship_vel) = (state.ship.pos, state.ship.vel);

    for &angle in &angles {
        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos: origin,
            vel: heading(angle) * BULLET_SPEED + ship_vel,
            rotation: angle,
            ttl_ticks: BULLET_TTL,
            power,
            alive: true,
        });
    }

    state.ship.can_shoot = false;
    state.ship.cooldown_ticks = if state.ship.has_powerup(PowerupKind::RapidFire) {
        RAPID_FIRE_COOLDOWN_TICKS
    } else {
        SHOT_COOLDOWN_TICKS
    };
    angles.len()
}
