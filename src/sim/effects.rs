//! Active power-up effects on the ship

use super::state::{PowerupKind, Ship};
use crate::consts::*;

/// Apply a collected power-up
///
/// Shields are a hit counter rather than a timed effect. Every other kind
/// (re)starts its countdown at the full duration.
pub fn apply_pickup(ship: &mut Ship, kind: PowerupKind) {
    match kind {
        PowerupKind::Shield => ship.shields = SHIELD_HITS,
        timed => {
            ship.active_powerups.insert(timed, POWERUP_DURATION);
        }
    }
}

/// Count every active effect down one tick, returning the ones that ran out
pub fn tick_effects(ship: &mut Ship) -> Vec<PowerupKind> {
    let mut expired = Vec::new();
    for (kind, remaining) in ship.active_powerups.iter_mut() {
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            expired.push(*kind);
        }
    }
    ship.active_powerups.retain(|_, remaining| *remaining > 0);
    for kind in &expired {
        log::debug!("{} wore off", kind.as_str());
    }
    expired
}
