//! Idle/demo controller
//!
//! Plays the game from snapshots alone, the same way a front end would: it
//! sees a `GameStateView` and answers with held controls plus one-shot fire
//! and activate requests.
//!
//! Priorities, highest first:
//! 1. not playing: press activate
//! 2. an asteroid inside the panic range: turn away and burn
//! 3. nothing threatening and a power-up floating around: go grab it
//! 4. otherwise: lead the nearest asteroid and shoot when lined up

use glam::Vec2;

use crate::consts::*;
use crate::engine::GameStateView;
use crate::normalize_angle;
use crate::sim::state::{GameStatus, WorldBounds};
use crate::sim::tick::ControlInput;

/// One decision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PilotCommand {
    pub controls: ControlInput,
    pub fire: bool,
    pub activate: bool,
}

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Heading error (radians) inside which no turn is held
    pub aim_tolerance: f32,
    /// Hull-to-hull gap under which an asteroid counts as a threat
    pub danger_margin: f32,
    /// Hull-to-hull gap under which the pilot runs instead of shooting
    pub panic_margin: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            aim_tolerance: ROTATION_SPEED,
            danger_margin: 80.0,
            panic_margin: 25.0,
        }
    }
}

/// Shortest displacement from `from` to `to` on the torus
pub fn torus_delta(from: Vec2, to: Vec2, bounds: &WorldBounds) -> Vec2 {
    let wrap = |d: f32, extent: f32| {
        if d > extent / 2.0 {
            d - extent
        } else if d < -extent / 2.0 {
            d + extent
        } else {
            d
        }
    };
    Vec2::new(wrap(to.x - from.x, bounds.width), wrap(to.y - from.y, bounds.height))
}

impl Autopilot {
    pub fn decide(&self, view: &GameStateView) -> PilotCommand {
        if view.status != GameStatus::Playing {
            return PilotCommand {
                activate: true,
                ..Default::default()
            };
        }

        let ship = &view.ship;
        let ship_half = BASE_SHIP_SIZE * view.scale / 2.0;
        let mut command = PilotCommand::default();

        // Nearest asteroid by hull gap (ties: lower id)
        let nearest = view
            .asteroids
            .iter()
            .map(|a| {
                let delta = torus_delta(ship.pos, a.pos, &view.bounds);
                (a, delta, delta.length() - a.size - ship_half)
            })
            .min_by(|x, y| x.2.total_cmp(&y.2).then(x.0.id.cmp(&y.0.id)));

        let threatened = nearest.is_some_and(|(_, _, gap)| gap < self.danger_margin);

        // If safe, go grab the nearest pickup
        let pickup = if threatened {
            None
        } else {
            view.powerups
                .iter()
                .map(|p| torus_delta(ship.pos, p.pos, &view.bounds))
                .min_by(|a, b| a.length().total_cmp(&b.length()))
        };

        if let Some(delta) = pickup {
            let error = self.steer(&mut command.controls, ship.rotation, delta);
            command.controls.thrust = error.abs() < self.aim_tolerance * 3.0;
        } else if let Some((asteroid, delta, gap)) = nearest {
            if gap < self.panic_margin {
                let error = self.steer(&mut command.controls, ship.rotation, -delta);
                command.controls.thrust = error.abs() < std::f32::consts::FRAC_PI_2;
            } else {
                // Lead the target by the bullet's travel time
                let travel = delta.length() / BULLET_SPEED;
                let aim = delta + (asteroid.vel - ship.vel) * travel;
                let error = self.steer(&mut command.controls, ship.rotation, aim);
                command.fire = ship.can_shoot && error.abs() < self.aim_tolerance * 2.0;
            }
        }

        command
    }

    /// Hold the turn toward `direction`, returning the remaining heading error
    fn steer(&self, controls: &mut ControlInput, rotation: f32, direction: Vec2) -> f32 {
        let desired = direction.y.atan2(direction.x);
        let error = normalize_angle(desired - rotation);
        if error > self.aim_tolerance {
            controls.rotate_right = true;
        } else if error < -self.aim_tolerance {
            controls.rotate_left = true;
        }
        error
    }
}
