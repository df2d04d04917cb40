//! Projectiles fired by gun modules

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::module::Faction;
use crate::consts::{ENEMY_SHOT_SIZE, PLAYER_SHOT_SIZE, PROJECTILE_LIFE};

/// Handle to a ship in the active set
///
/// Handles are never reused within a run, so a handle whose ship has been
/// destroyed simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShipId(pub u32);

/// A shot in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks until expiry
    pub life: u32,
    /// Edge length of the bounding box
    pub size: f32,
    /// Ship that fired this shot (non-owning)
    pub owner: ShipId,
    /// Side of the ship that fired it, captured at fire time
    pub faction: Faction,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2, owner: ShipId, faction: Faction) -> Self {
        let size = match faction {
            Faction::Player => PLAYER_SHOT_SIZE,
            Faction::Enemy => ENEMY_SHOT_SIZE,
        };
        Self {
            pos,
            vel,
            life: PROJECTILE_LIFE,
            size,
            owner,
            faction,
        }
    }

    /// Move one tick and age by one
    pub fn advance(&mut self) {
        self.pos += self.vel;
        self.life = self.life.saturating_sub(1);
    }

    /// Mark as spent (removed at the end of collision resolution)
    pub fn consume(&mut self) {
        self.life = 0;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }
}
