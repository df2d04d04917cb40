//! Enemy behaviour: dodging, closing distance, and burst fire
//!
//! The brain runs before the generic ship update each tick. It nudges the
//! ship's velocity and owns all enemy firing decisions.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::module::Faction;
use super::projectile::Projectile;
use super::ship::GridShip;
use crate::consts::*;
use crate::sign;

/// Burst fire sub-state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FireState {
    /// Waiting for a target in range
    #[default]
    Ready,
    /// Firing a burst: one shot every `BURST_SHOT_INTERVAL` ticks
    Bursting { shots_left: u8, next_shot_in: u32 },
    /// Burst spent; back to `Ready` once the ship's fire cooldown runs out
    Cooldown,
}

/// Per-enemy difficulty and firing state, fixed at spawn from the wave number
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyBrain {
    /// Scales every steering impulse
    pub aggression: f32,
    /// Scales the post-burst cooldown (lower fires more often)
    pub fire_rate: f32,
    /// Chance per nearby player shot to sidestep it
    pub dodge_chance: f32,
    pub max_speed: f32,
    pub fire_state: FireState,
}

impl EnemyBrain {
    pub fn for_wave(wave: u32) -> Self {
        let w = wave as f32;
        Self {
            aggression: (1.0 + 0.1 * w).min(2.5),
            fire_rate: (1.5 - 0.05 * w).max(0.5),
            dodge_chance: (0.15 + 0.01 * w).min(0.5),
            max_speed: 2.0 + 0.1 * w,
            fire_state: FireState::Ready,
        }
    }
}

/// Run one tick of enemy behaviour. Returns shots fired by the burst machine.
///
/// Ships without a brain are left untouched.
pub fn think(
    ship: &mut GridShip,
    player_pos: Vec2,
    projectiles: &[Projectile],
    rng: &mut Pcg32,
) -> Vec<Projectile> {
    let Some(mut brain) = ship.brain else {
        return Vec::new();
    };

    let to_player = player_pos - ship.pos;
    let dist = to_player.length();

    steer(ship, &brain, to_player, projectiles, rng);
    let shots = run_burst(ship, &mut brain, player_pos, dist);

    ship.brain = Some(brain);
    shots
}

fn steer(
    ship: &mut GridShip,
    brain: &EnemyBrain,
    to_player: Vec2,
    projectiles: &[Projectile],
    rng: &mut Pcg32,
) {
    let dist = to_player.length();

    // One draw per threatening shot; the first success triggers a sidestep
    let threat = projectiles.iter().find(|p| {
        p.faction == Faction::Player
            && p.pos.distance(ship.pos) < AI_DODGE_RANGE
            && rng.random::<f32>() < brain.dodge_chance
    });

    if let Some(shot) = threat {
        let side = if shot.vel.x == 0.0 { 1.0 } else { sign(shot.vel.x) };
        ship.vel.x += side * AI_DODGE_IMPULSE * brain.aggression;
    } else {
        let heading = Vec2::new(sign(to_player.x), sign(to_player.y));
        if dist > AI_APPROACH_RANGE {
            ship.vel += heading * AI_APPROACH_ACCEL * brain.aggression;
        } else if dist < AI_RETREAT_RANGE {
            ship.vel -= heading * AI_RETREAT_ACCEL * brain.aggression;
        }
    }

    ship.vel = ship.vel.clamp_length_max(brain.max_speed);
}

fn run_burst(
    ship: &mut GridShip,
    brain: &mut EnemyBrain,
    player_pos: Vec2,
    dist: f32,
) -> Vec<Projectile> {
    if brain.fire_state == FireState::Cooldown && ship.fire_cooldown == 0 {
        brain.fire_state = FireState::Ready;
    }

    if brain.fire_state == FireState::Ready && ship.fire_cooldown == 0 && dist < AI_FIRE_RANGE {
        let shots_left = if dist < AI_CLOSE_RANGE {
            BURST_SHOTS_CLOSE
        } else {
            BURST_SHOTS_FAR
        };
        brain.fire_state = FireState::Bursting {
            shots_left,
            next_shot_in: 0,
        };
    }

    let mut shots = Vec::new();
    let mut burst_done = false;
    if let FireState::Bursting {
        shots_left,
        next_shot_in,
    } = &mut brain.fire_state
    {
        if *next_shot_in == 0 {
            shots = ship.fire(Some(player_pos));
            *shots_left = shots_left.saturating_sub(1);
            *next_shot_in = BURST_SHOT_INTERVAL;
        }
        *next_shot_in -= 1;
        burst_done = *shots_left == 0;
    }

    if burst_done {
        let base = if dist < AI_CLOSE_RANGE {
            BURST_COOLDOWN_CLOSE
        } else {
            BURST_COOLDOWN_FAR
        };
        ship.fire_cooldown = (base * brain.fire_rate).round() as u32;
        brain.fire_state = FireState::Cooldown;
    }

    shots
}
