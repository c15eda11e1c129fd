//! Per-tick integration of positions and velocities
//!
//! Everything moves by whole ticks: velocities are in pixels per tick and
//! rotation speeds in radians per tick, tuned for the nominal tick rate.

use glam::Vec2;
use rand::Rng;

use super::state::{Asteroid, GameState, Ship, WorldBounds};
use super::tick::ControlInput;
use crate::consts::*;
use crate::{heading, limit_velocity};

/// Advance the ship one tick from the given controls
pub fn integrate_ship(ship: &mut Ship, controls: &ControlInput, bounds: &WorldBounds) {
    // Two independent steps: holding both keys cancels exactly
    if controls.rotate_left {
        ship.rotation -= ROTATION_SPEED;
    }
    if controls.rotate_right {
        ship.rotation += ROTATION_SPEED;
    }

    ship.thrusting = controls.thrust;
    if ship.thrusting {
        ship.vel += heading(ship.rotation) * THRUST_SPEED;
    }

    ship.vel = limit_velocity(sanitize(ship.vel), MAX_VELOCITY);
    ship.pos = bounds.wrap(ship.pos + ship.vel);

    ship.vel *= FRICTION;
    if ship.vel.x.abs() < MIN_VELOCITY {
        ship.vel.x = 0.0;
    }
    if ship.vel.y.abs() < MIN_VELOCITY {
        ship.vel.y = 0.0;
    }
}

/// Drift gameplay asteroids with wrap-around
pub fn integrate_asteroids(asteroids: &mut [Asteroid], bounds: &WorldBounds) {
    for asteroid in asteroids.iter_mut() {
        asteroid.vel = sanitize(asteroid.vel);
        asteroid.pos = bounds.wrap(asteroid.pos + asteroid.vel);
        asteroid.rotation += ASTEROID_SPIN;
    }
}

/// Move bullets and drop the ones whose time ran out
pub fn integrate_bullets(state: &mut GameState) {
    let bounds = state.bounds;
    for bullet in state.bullets.iter_mut() {
        bullet.pos = bounds.wrap(bullet.pos + sanitize(bullet.vel));
        bullet.ttl_ticks = bullet.ttl_ticks.saturating_sub(1);
    }
    state.bullets.retain(|b| b.ttl_ticks > 0);
}

/// Move world power-ups and drop the expired ones
pub fn integrate_powerups(state: &mut GameState) {
    let bounds = state.bounds;
    for powerup in state.powerups.iter_mut() {
        powerup.pos = bounds.wrap(powerup.pos + sanitize(powerup.vel));
        powerup.rotation += ASTEROID_SPIN;
        powerup.ttl_ticks = powerup.ttl_ticks.saturating_sub(1);
    }
    state.powerups.retain(|p| p.ttl_ticks > 0);
}

/// Animate the title-screen field
///
/// Background rocks do not wrap. Once one leaves the screen by more than its
/// own size plus a margin it re-enters from a random edge, so the field keeps
/// streaming in.
pub fn integrate_background(state: &mut GameState) {
    let bounds = state.bounds;
    let margin = BASE_ASTEROID_SIZES[0] * state.scale;
    for i in 0..state.background_asteroids.len() {
        let asteroid = &mut state.background_asteroids[i];
        asteroid.vel = sanitize(asteroid.vel);
        asteroid.pos += asteroid.vel;
        asteroid.rotation += ASTEROID_SPIN;

        let buffer = asteroid.size + margin;
        let p = asteroid.pos;
        let outside = !p.is_finite()
            || p.x < -buffer
            || p.x > bounds.width + buffer
            || p.y < -buffer
            || p.y > bounds.height + buffer;
        if outside {
            let (pos, vel) = edge_entry(&mut state.rng, &bounds, buffer);
            let asteroid = &mut state.background_asteroids[i];
            asteroid.pos = pos;
            asteroid.vel = vel;
        }
    }
}

/// Pick a point just outside a random edge and a heading back into the world
pub fn edge_entry<R: Rng>(rng: &mut R, bounds: &WorldBounds, offset: f32) -> (Vec2, Vec2) {
    let along_x = rng.random::<f32>() * bounds.width;
    let along_y = rng.random::<f32>() * bounds.height;
    // Inward base direction per edge, then up to ±45° of jitter
    let (pos, inward) = match rng.random_range(0..4u8) {
        0 => (Vec2::new(along_x, -offset), std::f32::consts::FRAC_PI_2),
        1 => (Vec2::new(bounds.width + offset, along_y), std::f32::consts::PI),
        2 => (Vec2::new(along_x, bounds.height + offset), -std::f32::consts::FRAC_PI_2),
        _ => (Vec2::new(-offset, along_y), 0.0),
    };
    let jitter = (rng.random::<f32>() - 0.5) * std::f32::consts::FRAC_PI_2;
    (pos, heading(inward + jitter) * BACKGROUND_ASTEROID_SPEED)
}

/// Replace non-finite vectors with zero so one bad value cannot poison the world
#[inline]
fn sanitize(v: Vec2) -> Vec2 {
    if v.is_finite() { v } else { Vec2::ZERO }
}
