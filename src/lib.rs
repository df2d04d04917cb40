//! Grid Raiders - a modular-ship arena shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ships, projectiles, AI, waves, economy)
//! - `settings`: Field size, seed and headless-run configuration
//!
//! Rendering, HUD and raw input capture live outside this crate. They read
//! the public state after each [`sim::tick`] and feed a [`sim::TickInput`] in.

pub mod settings;
pub mod sim;

pub use settings::{FieldSize, Settings};

use glam::Vec2;

/// Game tuning constants
pub mod consts {
    /// Nominal frame duration (one tick per display refresh at 60 Hz)
    pub const TICK_MS: f64 = 1000.0 / 60.0;

    /// Default play field dimensions
    pub const FIELD_WIDTH: f32 = 1024.0;
    pub const FIELD_HEIGHT: f32 = 720.0;

    /// Module pixel size per faction
    pub const PLAYER_MODULE_SIZE: f32 = 24.0;
    pub const ENEMY_MODULE_SIZE: f32 = 32.0; // Enemies get chunkier modules

    /// Velocity damping applied every tick
    pub const DAMPING: f32 = 0.95;

    /// Player thrust per tick (scaled by speed multiplier)
    pub const PLAYER_THRUST: f32 = 0.3;
    /// Reverse thrust is weaker
    pub const PLAYER_REVERSE_FACTOR: f32 = 0.5;

    /// Speed bonus per engine module
    pub const PLAYER_ENGINE_BONUS: f32 = 0.3;
    pub const ENEMY_ENGINE_BONUS: f32 = 0.4;

    /// Fire cooldowns (ticks)
    pub const PLAYER_FIRE_COOLDOWN: u32 = 15;
    pub const ENEMY_FIRE_COOLDOWN_MIN: u32 = 30;
    pub const ENEMY_FIRE_COOLDOWN_MAX: u32 = 60;

    /// Player needs more than this much power to fire
    pub const PLAYER_FIRE_POWER_MIN: f32 = 5.0;
    /// Power drained from the shared pool per enemy shot
    pub const ENEMY_SHOT_POWER_COST: f32 = 1.0;

    /// Projectile speeds and sizes
    pub const PLAYER_SHOT_SPEED: f32 = 8.0;
    pub const ENEMY_SHOT_SPEED: f32 = 6.0;
    pub const PLAYER_SHOT_SIZE: f32 = 4.0;
    pub const ENEMY_SHOT_SIZE: f32 = 6.0;
    /// Projectile lifetime (ticks)
    pub const PROJECTILE_LIFE: u32 = 60;

    /// Scrap pickups
    pub const PICKUP_LIFE: u32 = 300;
    pub const PICKUP_RADIUS: f32 = 30.0;
    pub const PICKUP_ATTRACT_RADIUS: f32 = 300.0;
    pub const PICKUP_DRIFT_SPEED: f32 = 2.0;

    /// Shield absorption
    pub const SHIELD_ABSORB_MIN: f32 = 10.0;
    pub const SHIELD_ABSORB_COST: f32 = 5.0;

    /// Health lost per destroyed player module
    pub const MODULE_LOSS_DAMAGE: f32 = 10.0;

    /// Reserve pools (power, shield, health)
    pub const RESERVE_MAX: f32 = 100.0;
    pub const POWER_REGEN: f32 = 0.1;
    pub const SHIELD_REGEN: f32 = 0.05;
    pub const HEALTH_REGEN: f32 = 0.02;

    /// Kill rewards: base + per remaining non-core module
    pub const KILL_SCORE_BASE: u64 = 20;
    pub const KILL_SCORE_PER_MODULE: u64 = 8;
    pub const KILL_SCRAP_BASE: u32 = 8;
    pub const KILL_SCRAP_PER_MODULE: u32 = 3;

    /// Starting economy
    pub const STARTING_SCRAP: u32 = 100;

    /// Enemy AI ranges
    pub const AI_DODGE_RANGE: f32 = 80.0;
    pub const AI_APPROACH_RANGE: f32 = 120.0;
    pub const AI_RETREAT_RANGE: f32 = 60.0;
    pub const AI_FIRE_RANGE: f32 = 350.0;
    pub const AI_CLOSE_RANGE: f32 = 120.0;
    pub const AI_DODGE_IMPULSE: f32 = 1.5;
    pub const AI_APPROACH_ACCEL: f32 = 0.08;
    pub const AI_RETREAT_ACCEL: f32 = 0.05;

    /// Burst fire
    pub const BURST_SHOTS_CLOSE: u8 = 3;
    pub const BURST_SHOTS_FAR: u8 = 1;
    pub const BURST_SHOT_INTERVAL: u32 = 5;
    pub const BURST_COOLDOWN_CLOSE: f32 = 10.0;
    pub const BURST_COOLDOWN_FAR: f32 = 30.0;

    /// Waves
    pub const INITIAL_SPAWN_INTERVAL_MS: f64 = 3000.0;
    pub const MIN_SPAWN_INTERVAL_MS: f64 = 800.0;
    pub const SPAWN_INTERVAL_STEP_MS: f64 = 200.0;
    pub const WAVE_DURATION_MS: f64 = 20_000.0;
    /// Extra spawns kick in after this wave
    pub const EXTRA_SPAWN_WAVE: u32 = 3;
    pub const EXTRA_SPAWN_CHANCE: f64 = 0.3;
    /// Enemies appear this far outside the field edge
    pub const SPAWN_MARGIN: f32 = 50.0;

    /// Build grid half-extent (cells -2..=2 on each axis)
    pub const BUILD_GRID_RADIUS: i32 = 2;
}

/// Sign of `x` with zero mapping to zero (unlike `f32::signum`)
#[inline]
pub fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Clamp a point into the `[0, width] x [0, height]` rectangle.
/// A degenerate field collapses to its origin edge.
#[inline]
pub fn clamp_to_field(pos: Vec2, field: FieldSize) -> Vec2 {
    Vec2::new(
        pos.x.clamp(0.0, field.width.max(0.0)),
        pos.y.clamp(0.0, field.height.max(0.0)),
    )
}

/// Axis-aligned overlap test between two boxes given by top-left corner and edge length
#[inline]
pub fn boxes_overlap(a: Vec2, a_size: f32, b: Vec2, b_size: f32) -> bool {
    a.x < b.x + b_size && a.x + a_size > b.x && a.y < b.y + b_size && a.y + a_size > b.y
}
