//! Fixed timestep simulation tick
//!
//! One call advances the whole game by one step. The order of the steps is
//! fixed so a seed plus an input sequence always replays the same run.

use serde::{Deserialize, Serialize};

use super::ai;
use super::collision;
use super::module::ModuleKind;
use super::ship::{GridCoord, Helm, Pilot};
use super::state::{GamePhase, GameState, SimEvent};
use crate::consts::*;

/// Held-key actions sampled once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Fire,
    Shield,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::MoveUp,
        Action::MoveDown,
        Action::MoveLeft,
        Action::MoveRight,
        Action::Fire,
        Action::Shield,
    ];

    #[inline]
    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of held actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionSet(u8);

impl ActionSet {
    const MASK: u8 = 0b0011_1111;

    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build from raw bits; unknown bits are dropped
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    pub fn with(mut self, action: Action) -> Self {
        self.insert(action);
        self
    }

    pub fn insert(&mut self, action: Action) {
        self.0 |= action.bit();
    }

    pub fn remove(&mut self, action: Action) {
        self.0 &= !action.bit();
    }

    pub fn contains(self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Thrust directions for the player's ship
    pub fn helm(self) -> Helm {
        Helm {
            up: self.contains(Action::MoveUp),
            down: self.contains(Action::MoveDown),
            left: self.contains(Action::MoveLeft),
            right: self.contains(Action::MoveRight),
        }
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Keys held this tick
    pub actions: ActionSet,
    /// Build-mode toggle pressed (edge, not level)
    pub toggle_build: bool,
    /// Module type picked in the build palette
    pub selected_kind: Option<ModuleKind>,
    /// Grid cell under the cursor, relative to the player core
    pub hover_cell: Option<GridCoord>,
    /// Grid cell clicked this tick, relative to the player core
    pub click_cell: Option<GridCoord>,
}

/// Advance the game state by one step of `dt_ms` game time
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f64) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    if let Some(kind) = input.selected_kind {
        state.build_kind = kind;
    }

    // The toggle consumes the whole tick
    if input.toggle_build {
        state.toggle_build_mode();
        return;
    }

    if state.phase == GamePhase::Building {
        handle_build_input(state, input);
        return;
    }

    state.time_ticks += 1;
    state.elapsed_ms += dt_ms;
    state.shield_active =
        input.actions.contains(Action::Shield) && state.reserves.shield_ready();

    // Player
    let pilot = Pilot::Player {
        helm: input.actions.helm(),
        trigger: input.actions.contains(Action::Fire),
        power: state.reserves.power,
    };
    let field = state.field;
    let shots = state.player.update(pilot, field);
    state.projectiles.extend(shots);

    update_enemies(state);

    for projectile in state.projectiles.iter_mut() {
        projectile.advance();
    }
    state.projectiles.retain(|p| p.is_alive());

    collision::resolve_projectiles(state);
    if state.phase == GamePhase::GameOver {
        return;
    }

    let player_pos = state.player.pos;
    for pickup in state.pickups.iter_mut() {
        pickup.update(player_pos);
    }
    state.pickups.retain(|p| p.is_alive());
    collision::collect_pickups(state);

    run_waves(state);

    state.reserves.regenerate();
}

/// Brain then physics for every enemy. Each enemy shot drains player power.
fn update_enemies(state: &mut GameState) {
    let player_pos = state.player.pos;
    let field = state.field;
    let mut shots = Vec::new();

    for enemy in state.enemies.iter_mut() {
        shots.extend(ai::think(enemy, player_pos, &state.projectiles, &mut state.rng));
        let pilot = Pilot::Enemy {
            target: player_pos,
            rng: &mut state.rng,
        };
        shots.extend(enemy.update(pilot, field));
    }

    if !shots.is_empty() {
        state
            .reserves
            .drain_power(ENEMY_SHOT_POWER_COST * shots.len() as f32);
        state.projectiles.extend(shots);
    }
}

/// Hover and click handling while the simulation is frozen
fn handle_build_input(state: &mut GameState, input: &TickInput) {
    state.build_hover = input.hover_cell.filter(|cell| cell.in_build_range());

    let Some(cell) = input.click_cell else {
        return;
    };
    // Clicks off the grid are not placement attempts
    if !cell.in_build_range() {
        return;
    }

    let kind = state.build_kind;
    if let Err(err) = state.place_module(cell, kind) {
        log::debug!("Placement of {} at {} rejected: {}", kind.as_str(), cell, err);
        state.push_event(SimEvent::PlacementRejected(err));
    }
}

fn run_waves(state: &mut GameState) {
    let now = state.elapsed_ms;

    let due = state.waves.spawns_due(now, &mut state.rng);
    for _ in 0..due {
        state.spawn_enemy();
    }

    if state.waves.advance_wave(now) {
        let wave = state.waves.wave;
        log::info!(
            "Wave {} begins, spawning every {} ms",
            wave,
            state.waves.spawn_interval_ms
        );
        state.push_event(SimEvent::WaveAdvanced { wave });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldSize;
    use crate::sim::build::BuildError;
    use crate::sim::module::Faction;
    use crate::sim::projectile::ShipId;
    use crate::sim::ship::GridShip;
    use glam::Vec2;
    use proptest::prelude::*;

    const DT: f64 = TICK_MS;

    fn new_state() -> GameState {
        GameState::new(12345, FieldSize::default())
    }

    /// No enemies and an empty event queue
    fn quiet_state() -> GameState {
        let mut state = new_state();
        state.enemies.clear();
        state.drain_events();
        state
    }

    fn toggle() -> TickInput {
        TickInput {
            toggle_build: true,
            ..Default::default()
        }
    }

    fn click(x: i32, y: i32) -> TickInput {
        TickInput {
            click_cell: Some(GridCoord::new(x, y)),
            ..Default::default()
        }
    }

    fn held(actions: &[Action]) -> TickInput {
        TickInput {
            actions: actions.iter().copied().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_action_set() {
        let set: ActionSet = [Action::Fire, Action::MoveUp].into_iter().collect();
        assert!(set.contains(Action::Fire));
        assert!(!set.contains(Action::Shield));
        assert!(set.helm().up && !set.helm().down);

        let mut set = set;
        set.remove(Action::Fire);
        assert!(!set.contains(Action::Fire));
        assert_eq!(
            ActionSet::from_bits(0xff),
            Action::ALL.into_iter().collect::<ActionSet>()
        );
        assert!(ActionSet::empty().is_empty());
    }

    #[test]
    fn test_toggle_consumes_tick() {
        let mut state = new_state();
        let before = serde_json::to_string(&state).unwrap();

        let mut input = toggle();
        input.actions = ActionSet::empty().with(Action::MoveUp).with(Action::Fire);
        tick(&mut state, &input, DT);

        assert_eq!(state.phase, GamePhase::Building);
        state.phase = GamePhase::Playing;
        assert_eq!(serde_json::to_string(&state).unwrap(), before);
    }

    #[test]
    fn test_build_round_trip_only_rearms_trigger() {
        let mut state = new_state();
        for _ in 0..5 {
            tick(&mut state, &held(&[Action::Fire, Action::MoveLeft]), DT);
        }
        assert!(state.player.fire_cooldown > 0);
        let mut expected = state.clone();
        expected.player.fire_cooldown = 0;

        tick(&mut state, &toggle(), DT);
        tick(&mut state, &toggle(), DT);
        assert_eq!(
            serde_json::to_string(&state).unwrap(),
            serde_json::to_string(&expected).unwrap()
        );
    }

    #[test]
    fn test_build_mode_freezes_simulation() {
        let mut state = new_state();
        tick(&mut state, &toggle(), DT);
        let before = serde_json::to_string(&state).unwrap();

        let input = held(&[Action::MoveUp, Action::Fire, Action::Shield]);
        for _ in 0..120 {
            tick(&mut state, &input, DT);
        }
        assert_eq!(serde_json::to_string(&state).unwrap(), before);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.elapsed_ms, 0.0);
    }

    #[test]
    fn test_leaving_build_mode_rearms_trigger() {
        let mut state = quiet_state();
        tick(&mut state, &held(&[Action::Fire]), DT);
        assert_eq!(state.player.fire_cooldown, PLAYER_FIRE_COOLDOWN);
        assert_eq!(state.projectiles.len(), 1);

        tick(&mut state, &toggle(), DT);
        tick(&mut state, &toggle(), DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.fire_cooldown, 0);

        tick(&mut state, &held(&[Action::Fire]), DT);
        assert_eq!(state.projectiles.len(), 2);
    }

    #[test]
    fn test_click_places_selected_module() {
        let mut state = quiet_state();
        tick(&mut state, &toggle(), DT);

        let mut input = click(0, 1);
        input.selected_kind = Some(ModuleKind::Armor);
        tick(&mut state, &input, DT);

        assert_eq!(
            state.player.module_at(GridCoord::new(0, 1)).map(|m| m.kind),
            Some(ModuleKind::Armor)
        );
        assert_eq!(state.economy.scrap, STARTING_SCRAP - 8);
        assert!(state.drain_events().contains(&SimEvent::ModulePlaced {
            coord: GridCoord::new(0, 1),
            kind: ModuleKind::Armor,
        }));
    }

    #[test]
    fn test_rejected_placements_report_and_change_nothing() {
        let mut state = quiet_state();
        tick(&mut state, &toggle(), DT);
        state.drain_events();

        tick(&mut state, &click(0, 0), DT);
        tick(&mut state, &click(1, 0), DT);
        state.economy.scrap = 3;
        tick(&mut state, &click(0, 1), DT);

        assert_eq!(
            state.drain_events(),
            vec![
                SimEvent::PlacementRejected(BuildError::CoreSlot),
                SimEvent::PlacementRejected(BuildError::OccupiedSlot(GridCoord::new(1, 0))),
                SimEvent::PlacementRejected(BuildError::InsufficientFunds {
                    kind: ModuleKind::Gun,
                    cost: 5,
                    available: 3,
                }),
            ]
        );
        assert_eq!(state.player.module_count(), 3);
        assert_eq!(state.economy.scrap, 3);
    }

    #[test]
    fn test_off_grid_clicks_and_hover_ignored() {
        let mut state = quiet_state();
        tick(&mut state, &toggle(), DT);
        state.drain_events();

        let input = TickInput {
            hover_cell: Some(GridCoord::new(3, 0)),
            click_cell: Some(GridCoord::new(-3, 1)),
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert!(state.drain_events().is_empty());
        assert_eq!(state.build_hover, None);

        let input = TickInput {
            hover_cell: Some(GridCoord::new(2, -2)),
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        let hover = state.hud().hover.unwrap();
        assert_eq!(hover.coord, GridCoord::new(2, -2));
        assert!(!hover.occupied && hover.affordable);

        // Leaving build mode clears the hover
        tick(&mut state, &toggle(), DT);
        assert_eq!(state.hud().hover, None);
    }

    #[test]
    fn test_spawn_timer_is_strict() {
        let mut state = quiet_state();
        for _ in 0..3 {
            tick(&mut state, &TickInput::default(), 1000.0);
        }
        assert!(state.enemies.is_empty());

        tick(&mut state, &TickInput::default(), 1000.0);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.waves.last_spawn_ms, 4000.0);
    }

    #[test]
    fn test_wave_advances_with_game_time() {
        let mut state = quiet_state();
        tick(&mut state, &TickInput::default(), 20_001.0);

        assert_eq!(state.waves.wave, 2);
        assert_eq!(state.waves.spawn_interval_ms, 2800.0);
        assert_eq!(state.enemies.len(), 1);
        assert!(state.drain_events().contains(&SimEvent::WaveAdvanced { wave: 2 }));
    }

    #[test]
    fn test_build_mode_pauses_game_clock() {
        let mut state = quiet_state();
        tick(&mut state, &toggle(), DT);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), 5000.0);
        }
        assert!(state.enemies.is_empty());
        assert_eq!(state.waves.wave, 1);
    }

    #[test]
    fn test_enemy_shots_drain_power() {
        let mut state = quiet_state();
        let id = state.next_ship_id();
        let mut gunner = GridShip::new(id, Vec2::new(100.0, 100.0), Faction::Enemy);
        gunner.insert_module(GridCoord::new(1, 0), ModuleKind::Gun);
        gunner.insert_module(GridCoord::new(0, 1), ModuleKind::Gun);
        state.enemies.push(gunner);

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.projectiles.len(), 2);
        // -2 for the shots, +0.1 regen
        assert!((state.reserves.power - 98.1).abs() < 1e-4);
    }

    #[test]
    fn test_shield_needs_charge() {
        let mut state = quiet_state();
        tick(&mut state, &held(&[Action::Shield]), DT);
        assert!(state.hud().shield_active);

        state.reserves.shield = 8.0;
        tick(&mut state, &held(&[Action::Shield]), DT);
        assert!(!state.hud().shield_active);

        state.reserves.shield = 80.0;
        tick(&mut state, &TickInput::default(), DT);
        assert!(!state.hud().shield_active);
    }

    #[test]
    fn test_regen_runs_each_tick() {
        let mut state = quiet_state();
        state.reserves.health = 50.0;
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!((state.reserves.health - 50.2).abs() < 1e-4);
    }

    #[test]
    fn test_scrap_drops_drift_and_get_collected() {
        let mut state = quiet_state();
        let start = state.player.pos + Vec2::new(100.0, 0.0);
        state.pickups.push(crate::sim::pickup::ScrapPickup::new(start, 6));

        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(state.pickups.is_empty());
        assert_eq!(state.economy.scrap, STARTING_SCRAP + 6);
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut state = quiet_state();
        state.game_over();
        let ticks = state.time_ticks;

        tick(&mut state, &toggle(), DT);
        tick(&mut state, &held(&[Action::Fire]), DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.time_ticks, ticks);
        assert!(state.projectiles.is_empty());
        assert!(!state.hud().running);
    }

    #[test]
    fn test_player_shot_hits_enemy_in_front() {
        let mut state = quiet_state();
        let id = state.next_ship_id();
        // Enemy core overlaps the first step of the gun's shot
        let target = GridShip::new(id, state.player.pos + Vec2::new(30.0, 0.0), Faction::Enemy);
        state.enemies.push(target);

        tick(&mut state, &held(&[Action::Fire]), DT);
        let hits = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, SimEvent::Impact { .. }))
            .count();
        assert_eq!(hits, 1);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_degenerate_field_does_not_panic() {
        let field = FieldSize {
            width: -10.0,
            height: 300.0,
        };
        let mut state = GameState::new(1, field);
        for _ in 0..10 {
            tick(&mut state, &held(&[Action::MoveRight, Action::Fire]), DT);
        }
        assert_eq!(state.player.pos.x, 0.0);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(99999, FieldSize::default());
        let mut b = GameState::new(99999, FieldSize::default());

        let script = [
            held(&[Action::MoveUp, Action::Fire]),
            held(&[Action::MoveLeft, Action::Fire, Action::Shield]),
            TickInput::default(),
            held(&[Action::MoveRight, Action::MoveDown]),
        ];
        for i in 0..900 {
            let input = &script[(i / 30) % script.len()];
            tick(&mut a, input, DT);
            tick(&mut b, input, DT);
        }

        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
        assert_eq!(a.drain_events(), b.drain_events());
    }

    #[test]
    fn test_kill_reward_through_tick() {
        let mut state = quiet_state();
        let id = state.next_ship_id();
        let mut wreck = GridShip::new(id, state.player.pos + Vec2::new(30.0, -2.0), Faction::Enemy);
        if let Some(core) = wreck.module_at_mut(GridCoord::CORE) {
            for _ in 0..9 {
                core.damage();
            }
        }
        state.enemies.push(wreck);

        tick(&mut state, &held(&[Action::Fire]), DT);
        assert!(state.ship(id).is_none());
        assert_eq!(state.economy.score, KILL_SCORE_BASE);
        assert_eq!(state.economy.scrap, STARTING_SCRAP + KILL_SCRAP_BASE);
        assert_eq!(state.player.id, ShipId(0));
    }

    proptest! {
        #[test]
        fn prop_core_invariant_holds(
            seed in any::<u64>(),
            inputs in prop::collection::vec((any::<u8>(), any::<bool>(), -3i32..=3, -3i32..=3), 1..400),
        ) {
            let mut state = GameState::new(seed, FieldSize::default());
            for (bits, toggle_build, x, y) in inputs {
                let input = TickInput {
                    actions: ActionSet::from_bits(bits),
                    toggle_build: toggle_build && bits % 16 == 0,
                    click_cell: Some(GridCoord::new(x, y)),
                    ..Default::default()
                };
                tick(&mut state, &input, DT);

                if state.player.is_alive() {
                    prop_assert_eq!(state.player.count_kind(ModuleKind::Core), 1);
                    prop_assert!(state.player.count_kind(ModuleKind::Gun) >= 1);
                } else {
                    prop_assert_eq!(state.phase, GamePhase::GameOver);
                }
                for enemy in &state.enemies {
                    prop_assert!(enemy.is_alive());
                    prop_assert_eq!(enemy.count_kind(ModuleKind::Core), 1);
                }
                for value in [state.reserves.power, state.reserves.shield, state.reserves.health] {
                    prop_assert!((0.0..=RESERVE_MAX).contains(&value));
                }
                prop_assert!(state.player.fire_cooldown <= PLAYER_FIRE_COOLDOWN);
            }
        }
    }
}
