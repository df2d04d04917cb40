//! Grid ships: a core plus modules on an integer grid around it

use std::collections::BTreeMap;
use std::fmt;

use glam::{IVec2, Vec2};
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::EnemyBrain;
use super::module::{Faction, Module, ModuleKind};
use super::projectile::{Projectile, ShipId};
use crate::consts::*;
use crate::{FieldSize, clamp_to_field};

/// Integer grid offset of a module relative to its ship origin
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    /// The core cell
    pub const CORE: GridCoord = GridCoord { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Inside the player's ±2 build grid
    pub fn in_build_range(self) -> bool {
        self.x.abs() <= BUILD_GRID_RADIUS && self.y.abs() <= BUILD_GRID_RADIUS
    }

    pub fn as_vec2(self) -> Vec2 {
        IVec2::new(self.x, self.y).as_vec2()
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for GridCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Directional thrust requested by the player this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Helm {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Who is flying a ship during [`GridShip::update`]
pub enum Pilot<'a> {
    /// Player input: thrust, trigger, and current power reserve
    Player { helm: Helm, trigger: bool, power: f32 },
    /// Enemy: the player's position to aim at, and the run RNG for cooldown rolls
    Enemy { target: Vec2, rng: &'a mut Pcg32 },
}

/// A modular ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridShip {
    pub id: ShipId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub faction: Faction,
    /// Ticks until the next shot is allowed
    pub fire_cooldown: u32,
    /// Derived from engine count every tick
    pub speed_multiplier: f32,
    /// AI state (enemies spawned by the wave director)
    #[serde(default)]
    pub brain: Option<EnemyBrain>,
    #[serde(with = "module_list")]
    modules: BTreeMap<GridCoord, Module>,
}

impl GridShip {
    /// Create a ship with only its core
    pub fn new(id: ShipId, pos: Vec2, faction: Faction) -> Self {
        let mut modules = BTreeMap::new();
        modules.insert(GridCoord::CORE, Module::new(ModuleKind::Core, faction));
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            faction,
            fire_cooldown: 0,
            speed_multiplier: 1.0,
            brain: None,
            modules,
        }
    }

    /// Starting player ship: core, gun to the right, engine to the left
    pub fn player(id: ShipId, pos: Vec2) -> Self {
        let mut ship = Self::new(id, pos, Faction::Player);
        ship.insert_module(GridCoord::new(1, 0), ModuleKind::Gun);
        ship.insert_module(GridCoord::new(-1, 0), ModuleKind::Engine);
        ship.refresh_speed_multiplier();
        ship
    }

    /// Alive while the core cell holds a core
    pub fn is_alive(&self) -> bool {
        self.modules
            .get(&GridCoord::CORE)
            .is_some_and(|m| m.is_core())
    }

    pub fn modules(&self) -> impl Iterator<Item = (GridCoord, &Module)> {
        self.modules.iter().map(|(c, m)| (*c, m))
    }

    pub fn module_at(&self, coord: GridCoord) -> Option<&Module> {
        self.modules.get(&coord)
    }

    pub fn module_at_mut(&mut self, coord: GridCoord) -> Option<&mut Module> {
        self.modules.get_mut(&coord)
    }

    pub fn is_occupied(&self, coord: GridCoord) -> bool {
        self.modules.contains_key(&coord)
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Modules other than the core
    pub fn non_core_count(&self) -> usize {
        self.modules.values().filter(|m| !m.is_core()).count()
    }

    pub fn count_kind(&self, kind: ModuleKind) -> usize {
        self.modules.values().filter(|m| m.kind == kind).count()
    }

    /// Add a fresh module at `coord`. Returns false if the cell is taken or a
    /// second core was requested.
    pub fn insert_module(&mut self, coord: GridCoord, kind: ModuleKind) -> bool {
        if self.is_occupied(coord) || kind == ModuleKind::Core {
            return false;
        }
        self.modules.insert(coord, Module::new(kind, self.faction));
        true
    }

    /// Detach a non-core module. The core only leaves through [`Self::take_core`].
    pub fn remove_module(&mut self, coord: GridCoord) -> Option<Module> {
        if coord == GridCoord::CORE {
            return None;
        }
        self.modules.remove(&coord)
    }

    /// Remove the core, killing the ship
    pub fn take_core(&mut self) -> Option<Module> {
        self.modules.remove(&GridCoord::CORE)
    }

    /// Edge length of one module cell
    pub fn module_size(&self) -> f32 {
        self.faction.module_size()
    }

    /// World position of the module cell at `coord` (top-left of its box)
    pub fn module_pos(&self, coord: GridCoord) -> Vec2 {
        self.pos + coord.as_vec2() * self.module_size()
    }

    /// World boxes of every module, in grid order
    pub fn module_boxes(&self) -> impl Iterator<Item = (GridCoord, Vec2)> + '_ {
        self.modules.keys().map(|c| (*c, self.module_pos(*c)))
    }

    /// Recompute speed from engine count
    pub fn refresh_speed_multiplier(&mut self) {
        let bonus = match self.faction {
            Faction::Player => PLAYER_ENGINE_BONUS,
            Faction::Enemy => ENEMY_ENGINE_BONUS,
        };
        self.speed_multiplier = 1.0 + self.count_kind(ModuleKind::Engine) as f32 * bonus;
    }

    /// Apply player thrust for one tick
    pub fn apply_helm(&mut self, helm: Helm) {
        let thrust = PLAYER_THRUST * self.speed_multiplier;
        if helm.up {
            self.vel.y -= thrust;
        }
        if helm.down {
            self.vel.y += thrust * PLAYER_REVERSE_FACTOR;
        }
        if helm.left {
            self.vel.x -= thrust;
        }
        if helm.right {
            self.vel.x += thrust;
        }
    }

    /// Advance one tick: derive speed, steer, integrate, count down, maybe fire.
    ///
    /// Returns the shots fired this tick. Enemies carrying a brain never fire
    /// from here; their burst logic calls [`Self::fire`] directly.
    pub fn update(&mut self, pilot: Pilot<'_>, field: FieldSize) -> Vec<Projectile> {
        self.refresh_speed_multiplier();
        if let Pilot::Player { helm, .. } = &pilot {
            self.apply_helm(*helm);
        }

        self.pos += self.vel;
        self.vel *= DAMPING;
        self.pos = clamp_to_field(self.pos, field);

        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);
        if self.fire_cooldown > 0 {
            return Vec::new();
        }

        match pilot {
            Pilot::Player { trigger, power, .. } => {
                if trigger && power > PLAYER_FIRE_POWER_MIN {
                    self.fire_cooldown = PLAYER_FIRE_COOLDOWN;
                    return self.fire(None);
                }
            }
            Pilot::Enemy { target, rng } => {
                if self.brain.is_none() {
                    self.fire_cooldown =
                        rng.random_range(ENEMY_FIRE_COOLDOWN_MIN..ENEMY_FIRE_COOLDOWN_MAX);
                    return self.fire(Some(target));
                }
            }
        }
        Vec::new()
    }

    /// One shot per gun module.
    ///
    /// Player guns fire outward along their grid offset (straight up from the
    /// core cell). Enemy guns aim at `target` from the gun's world position.
    pub fn fire(&self, target: Option<Vec2>) -> Vec<Projectile> {
        self.modules
            .iter()
            .filter(|(_, m)| m.kind == ModuleKind::Gun)
            .map(|(coord, _)| {
                let origin = self.module_pos(*coord);
                let vel = match (self.faction, target) {
                    (Faction::Enemy, Some(target)) => {
                        (target - origin).try_normalize().unwrap_or(Vec2::NEG_Y) * ENEMY_SHOT_SPEED
                    }
                    (Faction::Enemy, None) => Vec2::NEG_Y * ENEMY_SHOT_SPEED,
                    (Faction::Player, _) => {
                        coord.as_vec2().try_normalize().unwrap_or(Vec2::NEG_Y) * PLAYER_SHOT_SPEED
                    }
                };
                Projectile::new(origin, vel, self.id, self.faction)
            })
            .collect()
    }
}

/// Module maps serialize as `[coord, module]` pairs since JSON keys must be strings
mod module_list {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serializer};

    use super::{GridCoord, Module};

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<GridCoord, Module>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(map.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<GridCoord, Module>, D::Error> {
        let entries: Vec<(GridCoord, Module)> = Vec::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}
