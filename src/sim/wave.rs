//! Enemy spawning and wave escalation
//!
//! Spawns are driven by elapsed game time (which stands still during build
//! mode). Each wave shortens the spawn interval and toughens new enemies.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::EnemyBrain;
use super::module::{Faction, ModuleKind};
use super::projectile::ShipId;
use super::ship::{GridCoord, GridShip};
use crate::FieldSize;
use crate::consts::*;

/// Fixed enemy module layouts (the core at (0,0) is implicit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyLayout {
    AggressiveBasic,
    FastFlanker,
    Tanky,
    GunnerBurst,
    Advanced,
}

impl EnemyLayout {
    pub const ALL: [EnemyLayout; 5] = [
        EnemyLayout::AggressiveBasic,
        EnemyLayout::FastFlanker,
        EnemyLayout::Tanky,
        EnemyLayout::GunnerBurst,
        EnemyLayout::Advanced,
    ];

    /// Non-core modules as (x, y, kind)
    pub fn modules(self) -> &'static [(i32, i32, ModuleKind)] {
        use ModuleKind::*;
        match self {
            EnemyLayout::AggressiveBasic => &[(1, 0, Gun), (-1, 0, Engine), (0, 1, Gun)],
            EnemyLayout::FastFlanker => &[
                (1, 0, Gun),
                (-1, 0, Engine),
                (-2, 0, Engine),
                (0, 1, Engine),
            ],
            EnemyLayout::Tanky => &[
                (1, 0, Gun),
                (-1, 0, Armor),
                (0, 1, Armor),
                (0, -1, Armor),
                (1, 1, Shield),
            ],
            EnemyLayout::GunnerBurst => &[(1, 0, Gun), (-1, 0, Gun), (0, 1, Gun), (0, -1, Engine)],
            EnemyLayout::Advanced => &[
                (1, 0, Gun),
                (-1, 0, Engine),
                (0, 1, Armor),
                (0, -1, Shield),
                (1, 1, Gun),
                (-1, -1, Engine),
            ],
        }
    }

    pub fn random(rng: &mut Pcg32) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Build an enemy ship with a layout and wave-scaled brain
pub fn build_enemy(id: ShipId, pos: Vec2, layout: EnemyLayout, wave: u32) -> GridShip {
    let mut ship = GridShip::new(id, pos, Faction::Enemy);
    for &(x, y, kind) in layout.modules() {
        ship.insert_module(GridCoord::new(x, y), kind);
    }
    ship.brain = Some(EnemyBrain::for_wave(wave));
    ship.refresh_speed_multiplier();
    ship
}

/// Random point just outside one of the four field edges
pub fn spawn_position(field: FieldSize, rng: &mut Pcg32) -> Vec2 {
    match rng.random_range(0..4) {
        0 => Vec2::new(rng.random::<f32>() * field.width, -SPAWN_MARGIN),
        1 => Vec2::new(field.width + SPAWN_MARGIN, rng.random::<f32>() * field.height),
        2 => Vec2::new(rng.random::<f32>() * field.width, field.height + SPAWN_MARGIN),
        _ => Vec2::new(-SPAWN_MARGIN, rng.random::<f32>() * field.height),
    }
}

/// Spawn timing and wave progression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveDirector {
    /// Current wave (1-based)
    pub wave: u32,
    pub spawn_interval_ms: f64,
    pub last_spawn_ms: f64,
    pub last_wave_increase_ms: f64,
}

impl Default for WaveDirector {
    fn default() -> Self {
        Self {
            wave: 1,
            spawn_interval_ms: INITIAL_SPAWN_INTERVAL_MS,
            last_spawn_ms: 0.0,
            last_wave_increase_ms: 0.0,
        }
    }
}

impl WaveDirector {
    /// Number of enemies to spawn at `now_ms` (0, 1, or 2)
    pub fn spawns_due(&mut self, now_ms: f64, rng: &mut Pcg32) -> u32 {
        if now_ms - self.last_spawn_ms <= self.spawn_interval_ms {
            return 0;
        }
        self.last_spawn_ms = now_ms;

        if self.wave > EXTRA_SPAWN_WAVE && rng.random_bool(EXTRA_SPAWN_CHANCE) {
            2
        } else {
            1
        }
    }

    /// Advance the wave if its time is up. Returns true on a new wave.
    pub fn advance_wave(&mut self, now_ms: f64) -> bool {
        if now_ms - self.last_wave_increase_ms <= WAVE_DURATION_MS {
            return false;
        }
        self.wave += 1;
        self.spawn_interval_ms =
            (self.spawn_interval_ms - SPAWN_INTERVAL_STEP_MS).max(MIN_SPAWN_INTERVAL_MS);
        self.last_wave_increase_ms = now_ms;
        true
    }
}
