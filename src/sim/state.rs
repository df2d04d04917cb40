//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in [`GameState`]. Renderers and
//! HUDs read it after each tick; nothing in here draws.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::build::{self, BuildError};
use super::economy::{Economy, Reserves};
use super::module::ModuleKind;
use super::pickup::ScrapPickup;
use super::projectile::{Projectile, ShipId};
use super::ship::{GridCoord, GridShip};
use super::wave::{self, EnemyLayout, WaveDirector};
use crate::{FieldSize, Settings};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active combat
    Playing,
    /// Build mode: simulation frozen, placement only
    Building,
    /// Player core destroyed; only a reset leaves this phase
    GameOver,
}

/// Cosmetic and UI cues produced during a tick
///
/// None of these feed back into the simulation. Consumers drain them with
/// [`GameState::drain_events`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Projectile struck a module
    Impact { pos: Vec2 },
    /// Player shield soaked a hit
    ShieldAbsorbed { pos: Vec2 },
    /// A non-core module was shot off
    ModuleDestroyed {
        ship: ShipId,
        coord: GridCoord,
        kind: ModuleKind,
        pos: Vec2,
    },
    /// An enemy core blew up
    Explosion { pos: Vec2, size: f32 },
    /// Auto-repair gave the player a new gun
    GunRepaired { coord: GridCoord },
    ScrapCollected { pos: Vec2, amount: u32 },
    ModulePlaced { coord: GridCoord, kind: ModuleKind },
    PlacementRejected(BuildError),
    EnemySpawned { ship: ShipId, layout: EnemyLayout },
    WaveAdvanced { wave: u32 },
    BuildModeChanged { active: bool },
    GameOver { score: u64 },
}

/// Maximum queued events before the oldest are dropped
pub const MAX_EVENTS: usize = 256;

/// The hovered build cell as the build overlay needs it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoverCell {
    pub coord: GridCoord,
    pub occupied: bool,
    pub cost: u32,
    pub affordable: bool,
}

/// Scalar status for the HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudStatus {
    pub score: u64,
    pub scrap: u32,
    pub wave: u32,
    pub power: f32,
    pub shield: f32,
    pub health: f32,
    pub running: bool,
    pub build_mode: bool,
    pub shield_active: bool,
    pub hover: Option<HoverCell>,
}

fn fresh_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub field: FieldSize,
    pub phase: GamePhase,
    /// Simulation ticks run (frozen ticks not counted)
    pub time_ticks: u64,
    /// Game clock driving spawns and waves
    pub elapsed_ms: f64,
    pub economy: Economy,
    pub reserves: Reserves,
    pub waves: WaveDirector,
    pub player: GridShip,
    /// Active enemies, in spawn order
    pub enemies: Vec<GridShip>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<ScrapPickup>,
    /// Shield raised and charged this tick
    pub shield_active: bool,
    /// Module type currently selected for building
    pub build_kind: ModuleKind,
    /// Build cell under the cursor (build mode only)
    pub build_hover: Option<GridCoord>,
    #[serde(skip)]
    pub(crate) events: Vec<SimEvent>,
    #[serde(skip, default = "fresh_rng")]
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a fresh game: starter player ship and two enemies
    pub fn new(seed: u64, field: FieldSize) -> Self {
        let mut state = Self {
            seed,
            field,
            phase: GamePhase::Playing,
            time_ticks: 0,
            elapsed_ms: 0.0,
            economy: Economy::default(),
            reserves: Reserves::default(),
            waves: WaveDirector::default(),
            player: GridShip::player(ShipId(0), field.center()),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            shield_active: false,
            build_kind: ModuleKind::default(),
            build_hover: None,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };

        state.spawn_enemy();
        state.spawn_enemy();

        state
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.seed, settings.field)
    }

    /// Restart the run with the same seed and field
    pub fn reset(&mut self) {
        log::info!("Resetting game (final score {})", self.economy.score);
        *self = Self::new(self.seed, self.field);
    }

    /// Allocate a new ship ID (never reused)
    pub fn next_ship_id(&mut self) -> ShipId {
        let id = ShipId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawn a random enemy layout just outside the field
    pub fn spawn_enemy(&mut self) -> ShipId {
        let layout = EnemyLayout::random(&mut self.rng);
        let pos = wave::spawn_position(self.field, &mut self.rng);
        self.spawn_enemy_with(layout, pos)
    }

    /// Spawn a specific layout at `pos`
    pub fn spawn_enemy_with(&mut self, layout: EnemyLayout, pos: Vec2) -> ShipId {
        let id = self.next_ship_id();
        let ship = wave::build_enemy(id, pos, layout, self.waves.wave);
        log::debug!("Spawned {:?} enemy {:?} at {}", layout, id, pos);
        self.enemies.push(ship);
        self.push_event(SimEvent::EnemySpawned { ship: id, layout });
        id
    }

    /// Resolve a ship handle; stale handles resolve to `None`
    pub fn ship(&self, id: ShipId) -> Option<&GridShip> {
        if self.player.id == id {
            return Some(&self.player);
        }
        self.enemies.iter().find(|s| s.id == id)
    }

    pub fn is_running(&self) -> bool {
        self.phase != GamePhase::GameOver
    }

    pub fn is_building(&self) -> bool {
        self.phase == GamePhase::Building
    }

    /// Flip build mode. Leaving it re-arms the player's trigger.
    /// Returns the new build-mode flag.
    pub fn toggle_build_mode(&mut self) -> bool {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Building;
            }
            GamePhase::Building => {
                self.phase = GamePhase::Playing;
                self.player.fire_cooldown = 0;
                self.build_hover = None;
            }
            GamePhase::GameOver => return false,
        }
        let active = self.is_building();
        log::debug!("Build mode {}", if active { "on" } else { "off" });
        self.push_event(SimEvent::BuildModeChanged { active });
        active
    }

    /// Place a module on the player ship (build mode only)
    pub fn place_module(&mut self, coord: GridCoord, kind: ModuleKind) -> Result<(), BuildError> {
        match self.phase {
            GamePhase::GameOver => return Err(BuildError::GameOver),
            GamePhase::Playing => return Err(BuildError::NotBuilding),
            GamePhase::Building => {}
        }
        build::place_module(&mut self.player, &mut self.economy, coord, kind)?;
        log::debug!("Placed {} at {} ({} scrap left)", kind.as_str(), coord, self.economy.scrap);
        self.push_event(SimEvent::ModulePlaced { coord, kind });
        Ok(())
    }

    /// Enter the terminal phase
    pub(crate) fn game_over(&mut self) {
        self.reserves.health = 0.0;
        self.phase = GamePhase::GameOver;
        log::info!(
            "Game over: score {}, wave {}",
            self.economy.score,
            self.waves.wave
        );
        self.push_event(SimEvent::GameOver {
            score: self.economy.score,
        });
    }

    pub(crate) fn push_event(&mut self, event: SimEvent) {
        if self.events.len() >= MAX_EVENTS {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Scalar status for the HUD
    pub fn hud(&self) -> HudStatus {
        let hover = self.build_hover.map(|coord| {
            let cost = self.build_kind.cost();
            HoverCell {
                coord,
                occupied: self.player.is_occupied(coord),
                cost,
                affordable: self.economy.can_afford(cost),
            }
        });
        HudStatus {
            score: self.economy.score,
            scrap: self.economy.scrap,
            wave: self.waves.wave,
            power: self.reserves.power,
            shield: self.reserves.shield,
            health: self.reserves.health,
            running: self.is_running(),
            build_mode: self.is_building(),
            shield_active: self.shield_active,
            hover,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::STARTING_SCRAP;

    fn new_state() -> GameState {
        GameState::new(7, FieldSize::default())
    }

    #[test]
    fn test_initial_state() {
        let state = new_state();
        let hud = state.hud();
        assert_eq!(hud.score, 0);
        assert_eq!(hud.scrap, STARTING_SCRAP);
        assert_eq!(hud.wave, 1);
        assert_eq!((hud.power, hud.shield, hud.health), (100.0, 100.0, 100.0));
        assert!(hud.running && !hud.build_mode);
        assert_eq!(state.player.module_count(), 3);
        assert_eq!(state.player.pos, FieldSize::default().center());
        assert_eq!(state.enemies.len(), 2);
    }

    #[test]
    fn test_ship_handles_go_stale() {
        let mut state = new_state();
        let id = state.enemies[0].id;
        assert!(state.ship(id).is_some());
        state.enemies.remove(0);
        assert!(state.ship(id).is_none());
        // IDs are never reused
        assert!(state.next_ship_id().0 > id.0);
    }

    #[test]
    fn test_place_requires_build_mode() {
        let mut state = new_state();
        assert_eq!(
            state.place_module(GridCoord::new(0, 1), ModuleKind::Gun),
            Err(BuildError::NotBuilding)
        );
        state.toggle_build_mode();
        assert!(state.place_module(GridCoord::new(0, 1), ModuleKind::Gun).is_ok());
        assert_eq!(state.economy.scrap, STARTING_SCRAP - 5);
    }

    #[test]
    fn test_hover_reports_cost() {
        let mut state = new_state();
        state.toggle_build_mode();
        state.build_kind = ModuleKind::Shield;
        state.build_hover = Some(GridCoord::new(1, 0));
        let hover = state.hud().hover.unwrap();
        assert!(hover.occupied);
        assert_eq!(hover.cost, 15);
        assert!(hover.affordable);
    }

    #[test]
    fn test_reset_restores_start() {
        let mut state = new_state();
        state.economy.score = 500;
        state.waves.wave = 6;
        state.enemies.clear();
        state.game_over();
        assert!(!state.is_running());
        assert!(!state.toggle_build_mode());

        state.reset();
        assert!(state.is_running());
        assert_eq!(state.economy.score, 0);
        assert_eq!(state.waves.wave, 1);
        assert_eq!(state.reserves.health, 100.0);
        assert_eq!(state.enemies.len(), 2);
    }

    #[test]
    fn test_event_queue_is_bounded() {
        let mut state = new_state();
        state.drain_events();
        for wave in 0..(MAX_EVENTS as u32 + 10) {
            state.push_event(SimEvent::WaveAdvanced { wave });
        }
        let events = state.drain_events();
        assert_eq!(events.len(), MAX_EVENTS);
        assert_eq!(events[0], SimEvent::WaveAdvanced { wave: 10 });
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_state_serializes() {
        let state = new_state();
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.enemies.len(), 2);
        assert_eq!(back.player.module_count(), 3);
    }
}
