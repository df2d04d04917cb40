//! Score, scrap, and the three regenerating reserve pools

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Score and spendable scrap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Economy {
    pub score: u64,
    pub scrap: u32,
}

impl Default for Economy {
    fn default() -> Self {
        Self {
            score: 0,
            scrap: STARTING_SCRAP,
        }
    }
}

impl Economy {
    /// Reward for destroying an enemy with `remaining` non-core modules
    pub fn reward_kill(&mut self, remaining: usize) {
        self.score += KILL_SCORE_BASE + KILL_SCORE_PER_MODULE * remaining as u64;
        self.scrap += KILL_SCRAP_BASE + KILL_SCRAP_PER_MODULE * remaining as u32;
    }

    pub fn add_scrap(&mut self, amount: u32) {
        self.scrap = self.scrap.saturating_add(amount);
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.scrap >= cost
    }

    /// Debit `cost` if affordable. Returns false (and spends nothing) otherwise.
    pub fn try_spend(&mut self, cost: u32) -> bool {
        match self.scrap.checked_sub(cost) {
            Some(rest) => {
                self.scrap = rest;
                true
            }
            None => false,
        }
    }
}

/// Power, shield and health pools, each kept within `0..=RESERVE_MAX`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reserves {
    /// Gates player fire; drained by enemy shots
    pub power: f32,
    /// Absorbs hits while the shield is raised
    pub shield: f32,
    pub health: f32,
}

impl Default for Reserves {
    fn default() -> Self {
        Self {
            power: RESERVE_MAX,
            shield: RESERVE_MAX,
            health: RESERVE_MAX,
        }
    }
}

impl Reserves {
    /// Passive per-tick regeneration
    pub fn regenerate(&mut self) {
        self.power = clamp_reserve(self.power + POWER_REGEN);
        self.shield = clamp_reserve(self.shield + SHIELD_REGEN);
        self.health = clamp_reserve(self.health + HEALTH_REGEN);
    }

    pub fn drain_power(&mut self, amount: f32) {
        self.power = clamp_reserve(self.power - amount);
    }

    pub fn damage_health(&mut self, amount: f32) {
        self.health = clamp_reserve(self.health - amount);
    }

    /// Whether a raised shield would stop the next hit
    pub fn shield_ready(&self) -> bool {
        self.shield > SHIELD_ABSORB_MIN
    }

    /// Spend shield to absorb a hit. Returns false if the shield is too weak.
    pub fn try_absorb(&mut self) -> bool {
        if !self.shield_ready() {
            return false;
        }
        self.shield = clamp_reserve(self.shield - SHIELD_ABSORB_COST);
        true
    }
}

#[inline]
fn clamp_reserve(value: f32) -> f32 {
    value.clamp(0.0, RESERVE_MAX)
}
