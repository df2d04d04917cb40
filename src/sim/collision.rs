//! Projectile hits and pickup collection
//!
//! Projectiles and modules are both axis-aligned squares, so every test here
//! is a plain box overlap. A projectile only ever tests ships of the opposing
//! faction and stops at the first module it touches.

use glam::Vec2;

use super::build;
use super::module::Faction;
use super::pickup::ScrapPickup;
use super::projectile::Projectile;
use super::ship::{GridCoord, GridShip};
use super::state::{GamePhase, GameState, SimEvent};
use crate::boxes_overlap;
use crate::consts::*;

/// First module of `ship` (in grid order) the projectile overlaps
pub fn first_module_hit(projectile: &Projectile, ship: &GridShip) -> Option<GridCoord> {
    let size = ship.module_size();
    ship.module_boxes()
        .find(|(_, origin)| boxes_overlap(projectile.pos, projectile.size, *origin, size))
        .map(|(coord, _)| coord)
}

/// Resolve every live projectile against the opposing faction.
///
/// Consumed projectiles are dropped from the state afterwards. Stops early
/// once the player's core is gone.
pub fn resolve_projectiles(state: &mut GameState) {
    let mut projectiles = std::mem::take(&mut state.projectiles);

    for projectile in projectiles.iter_mut() {
        if state.phase == GamePhase::GameOver {
            break;
        }
        if !projectile.is_alive() {
            continue;
        }

        match projectile.faction {
            Faction::Enemy => {
                if !state.player.is_alive() {
                    continue;
                }
                if let Some(coord) = first_module_hit(projectile, &state.player) {
                    projectile.consume();
                    hit_player(state, coord, projectile.pos);
                }
            }
            Faction::Player => {
                let hit = state.enemies.iter().enumerate().find_map(|(index, enemy)| {
                    first_module_hit(projectile, enemy).map(|coord| (index, coord))
                });
                if let Some((index, coord)) = hit {
                    projectile.consume();
                    hit_enemy(state, index, coord, projectile.pos);
                }
            }
        }
    }

    projectiles.retain(Projectile::is_alive);
    state.projectiles = projectiles;
}

fn hit_player(state: &mut GameState, coord: GridCoord, pos: Vec2) {
    if state.shield_active && state.reserves.try_absorb() {
        state.push_event(SimEvent::ShieldAbsorbed { pos });
        return;
    }

    state.push_event(SimEvent::Impact { pos });
    let destroyed = state
        .player
        .module_at_mut(coord)
        .is_some_and(|module| module.damage());
    if !destroyed {
        return;
    }

    if coord == GridCoord::CORE {
        state.player.take_core();
        state.game_over();
        return;
    }

    let module_pos = state.player.module_pos(coord);
    let Some(module) = state.player.remove_module(coord) else {
        return;
    };
    state.pickups.push(ScrapPickup::new(module_pos, module.kind.salvage()));
    state.reserves.damage_health(MODULE_LOSS_DAMAGE);
    state.push_event(SimEvent::ModuleDestroyed {
        ship: state.player.id,
        coord,
        kind: module.kind,
        pos: module_pos,
    });
    log::debug!("Player lost {} at {}", module.kind.as_str(), coord);

    if let Some(slot) = build::ensure_gun(&mut state.player) {
        log::debug!("Auto-repair placed a gun at {}", slot);
        state.push_event(SimEvent::GunRepaired { coord: slot });
    }
}

fn hit_enemy(state: &mut GameState, index: usize, coord: GridCoord, pos: Vec2) {
    state.push_event(SimEvent::Impact { pos });

    let Some(enemy) = state.enemies.get_mut(index) else {
        return;
    };
    let destroyed = enemy
        .module_at_mut(coord)
        .is_some_and(|module| module.damage());
    if !destroyed {
        return;
    }

    if coord == GridCoord::CORE {
        let wreck = state.enemies.remove(index);
        destroy_enemy(state, wreck);
        return;
    }

    let module_pos = enemy.module_pos(coord);
    let ship = enemy.id;
    if let Some(module) = enemy.remove_module(coord) {
        state.pickups.push(ScrapPickup::new(module_pos, module.kind.salvage()));
        state.push_event(SimEvent::ModuleDestroyed {
            ship,
            coord,
            kind: module.kind,
            pos: module_pos,
        });
    }
}

/// Pay out a kill and scatter the wreck's remaining modules as scrap
fn destroy_enemy(state: &mut GameState, wreck: GridShip) {
    let remaining = wreck.non_core_count();
    state.economy.reward_kill(remaining);

    for (coord, module) in wreck.modules().filter(|(_, m)| !m.is_core()) {
        state
            .pickups
            .push(ScrapPickup::new(wreck.module_pos(coord), module.kind.salvage()));
    }

    let size = wreck.module_size() * (remaining + 1) as f32;
    state.push_event(SimEvent::Explosion {
        pos: wreck.pos,
        size,
    });
    log::debug!(
        "Destroyed enemy {:?} with {} modules left (score {}, scrap {})",
        wreck.id,
        remaining,
        state.economy.score,
        state.economy.scrap
    );
}

/// Move pickups within reach of the player into scrap
pub fn collect_pickups(state: &mut GameState) {
    let player_pos = state.player.pos;
    let (collected, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut state.pickups)
        .into_iter()
        .partition(|pickup| pickup.in_reach(player_pos));
    state.pickups = kept;

    for pickup in collected {
        state.economy.add_scrap(pickup.amount);
        state.push_event(SimEvent::ScrapCollected {
            pos: pickup.pos,
            amount: pickup.amount,
        });
    }
}
