//! Scrap pickups dropped by destroyed modules

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{PICKUP_ATTRACT_RADIUS, PICKUP_DRIFT_SPEED, PICKUP_LIFE, PICKUP_RADIUS};

/// A floating scrap pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapPickup {
    pub pos: Vec2,
    pub amount: u32,
    pub life: u32,
}

impl ScrapPickup {
    pub fn new(pos: Vec2, amount: u32) -> Self {
        Self {
            pos,
            amount,
            life: PICKUP_LIFE,
        }
    }

    /// Age by one tick and drift toward the player when nearby
    pub fn update(&mut self, player_pos: Vec2) {
        self.life = self.life.saturating_sub(1);

        let to_player = player_pos - self.pos;
        let dist = to_player.length();
        if dist > 0.0 && dist < PICKUP_ATTRACT_RADIUS {
            self.pos += to_player / dist * PICKUP_DRIFT_SPEED;
        }
    }

    /// Whether the player is close enough to collect
    pub fn in_reach(&self, player_pos: Vec2) -> bool {
        self.pos.distance(player_pos) < PICKUP_RADIUS
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }
}
