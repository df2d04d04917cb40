//! Demo pilot that plays the game through ordinary [`TickInput`]s
//!
//! Used by the headless runner. It only reads public state and never
//! touches the simulation directly, so a run driven by it is a normal run.

use glam::Vec2;

use super::build::REPAIR_SLOTS;
use super::module::{Faction, ModuleKind};
use super::ship::GridCoord;
use super::state::{GamePhase, GameState};
use super::tick::{Action, ActionSet, TickInput};
use crate::consts::BUILD_GRID_RADIUS;

/// Ticks of play between build breaks
pub const BUILD_PERIOD_TICKS: u64 = 600;
/// Scrap kept back after each purchase
pub const SCRAP_RESERVE: u32 = 20;

/// Preferred standoff range from the nearest enemy
const STANDOFF_MIN: f32 = 150.0;
const STANDOFF_MAX: f32 = 250.0;
/// Raise the shield when an enemy shot is this close
const SHIELD_THREAT_RANGE: f32 = 60.0;

/// Rotation of kinds the autopilot buys
const BUILD_ORDER: [ModuleKind; 4] = [
    ModuleKind::Gun,
    ModuleKind::Armor,
    ModuleKind::Engine,
    ModuleKind::Shield,
];

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    last_build_tick: u64,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide this tick's input
    pub fn input(&mut self, state: &GameState) -> TickInput {
        match state.phase {
            GamePhase::GameOver => TickInput::default(),
            GamePhase::Building => self.build_input(state),
            GamePhase::Playing => {
                let due = state.time_ticks >= self.last_build_tick + BUILD_PERIOD_TICKS;
                if due && state.economy.scrap >= SCRAP_RESERVE + ModuleKind::Gun.cost() {
                    self.last_build_tick = state.time_ticks;
                    return TickInput {
                        toggle_build: true,
                        ..Default::default()
                    };
                }
                fly(state)
            }
        }
    }

    /// Buy one module per tick while funds last, then leave build mode
    fn build_input(&self, state: &GameState) -> TickInput {
        let kind = BUILD_ORDER[state.player.module_count() % BUILD_ORDER.len()];
        let cell = free_cell(state);

        match cell {
            Some(cell) if state.economy.scrap >= kind.cost() + SCRAP_RESERVE => TickInput {
                selected_kind: Some(kind),
                hover_cell: Some(cell),
                click_cell: Some(cell),
                ..Default::default()
            },
            _ => TickInput {
                toggle_build: true,
                ..Default::default()
            },
        }
    }
}

/// First free cell, trying the ring around the core before the outer cells
fn free_cell(state: &GameState) -> Option<GridCoord> {
    let r = BUILD_GRID_RADIUS;
    let outer = (-r..=r).flat_map(|x| (-r..=r).map(move |y| GridCoord::new(x, y)));
    REPAIR_SLOTS
        .into_iter()
        .chain(outer)
        .find(|cell| !state.player.is_occupied(*cell))
}

/// Hold a standoff distance from the nearest enemy and keep firing
fn fly(state: &GameState) -> TickInput {
    let player = state.player.pos;
    let mut actions = ActionSet::empty();

    let nearest = state
        .enemies
        .iter()
        .map(|enemy| enemy.pos)
        .min_by(|a, b| {
            a.distance_squared(player)
                .partial_cmp(&b.distance_squared(player))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    if let Some(target) = nearest {
        let offset = target - player;
        let dist = offset.length();
        let heading = if dist > STANDOFF_MAX {
            offset
        } else if dist < STANDOFF_MIN {
            -offset
        } else {
            Vec2::ZERO
        };
        steer(&mut actions, heading);
        actions.insert(Action::Fire);
    } else {
        // Drift back toward the middle between waves
        steer(&mut actions, state.field.center() - player);
    }

    let threatened = state.projectiles.iter().any(|p| {
        p.faction == Faction::Enemy && p.pos.distance(player) < SHIELD_THREAT_RANGE
    });
    if threatened && state.reserves.shield_ready() {
        actions.insert(Action::Shield);
    }

    TickInput {
        actions,
        ..Default::default()
    }
}

fn steer(actions: &mut ActionSet, heading: Vec2) {
    const DEADZONE: f32 = 8.0;
    if heading.x > DEADZONE {
        actions.insert(Action::MoveRight);
    } else if heading.x < -DEADZONE {
        actions.insert(Action::MoveLeft);
    }
    if heading.y > DEADZONE {
        actions.insert(Action::MoveDown);
    } else if heading.y < -DEADZONE {
        actions.insert(Action::MoveUp);
    }
}
