//! Ship modules - the building blocks of every ship

use serde::{Deserialize, Serialize};

use crate::consts::{ENEMY_MODULE_SIZE, PLAYER_MODULE_SIZE};

/// Which side a ship (and its modules and shots) fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Enemy,
}

impl Faction {
    /// Edge length of one module cell in world units
    pub fn module_size(self) -> f32 {
        match self {
            Faction::Player => PLAYER_MODULE_SIZE,
            Faction::Enemy => ENEMY_MODULE_SIZE,
        }
    }

    pub fn is_player(self) -> bool {
        self == Faction::Player
    }
}

/// Module types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModuleKind {
    Core,
    Engine,
    #[default]
    Gun,
    Armor,
    Shield,
}

impl ModuleKind {
    /// Every module type, in build-menu order
    pub const ALL: [ModuleKind; 5] = [
        ModuleKind::Core,
        ModuleKind::Engine,
        ModuleKind::Gun,
        ModuleKind::Armor,
        ModuleKind::Shield,
    ];

    /// Hit points for a player-faction module
    pub fn base_hp(self) -> u8 {
        match self {
            ModuleKind::Core => 5,
            ModuleKind::Engine => 2,
            ModuleKind::Gun => 2,
            ModuleKind::Armor => 4,
            ModuleKind::Shield => 3,
        }
    }

    /// Scrap cost to build
    pub fn cost(self) -> u32 {
        match self {
            ModuleKind::Core => 0,
            ModuleKind::Engine => 10,
            ModuleKind::Gun => 5,
            ModuleKind::Armor => 8,
            ModuleKind::Shield => 15,
        }
    }

    /// Scrap dropped when a module of this type is destroyed
    pub fn salvage(self) -> u32 {
        self.cost() / 2
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::Core => "core",
            ModuleKind::Engine => "engine",
            ModuleKind::Gun => "gun",
            ModuleKind::Armor => "armor",
            ModuleKind::Shield => "shield",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "core" => Some(ModuleKind::Core),
            "engine" => Some(ModuleKind::Engine),
            "gun" => Some(ModuleKind::Gun),
            "armor" | "armour" => Some(ModuleKind::Armor),
            "shield" => Some(ModuleKind::Shield),
            _ => None,
        }
    }
}

/// A single module on a ship grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub kind: ModuleKind,
    pub faction: Faction,
    hp: u8,
}

impl Module {
    /// Create a module at full health for its faction
    pub fn new(kind: ModuleKind, faction: Faction) -> Self {
        let mut module = Self { kind, faction, hp: 0 };
        module.hp = module.max_hp();
        module
    }

    /// Maximum hit points (enemies are twice as tough)
    pub fn max_hp(&self) -> u8 {
        if self.faction.is_player() {
            self.kind.base_hp()
        } else {
            self.kind.base_hp() * 2
        }
    }

    pub fn hp(&self) -> u8 {
        self.hp
    }

    /// Remaining health as a 0..1 fraction (for damage bars)
    pub fn hp_fraction(&self) -> f32 {
        self.hp as f32 / self.max_hp() as f32
    }

    /// Apply one point of damage. Returns true if the module is destroyed.
    pub fn damage(&mut self) -> bool {
        self.hp = self.hp.saturating_sub(1);
        self.is_destroyed()
    }

    pub fn is_destroyed(&self) -> bool {
        self.hp == 0
    }

    pub fn is_core(&self) -> bool {
        self.kind == ModuleKind::Core
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_modules_have_double_hp() {
        for kind in ModuleKind::ALL {
            let player = Module::new(kind, Faction::Player);
            let enemy = Module::new(kind, Faction::Enemy);
            assert_eq!(enemy.hp(), player.hp() * 2);
        }
        assert_eq!(Module::new(ModuleKind::Core, Faction::Player).hp(), 5);
        assert_eq!(Module::new(ModuleKind::Armor, Faction::Enemy).hp(), 8);
    }

    #[test]
    fn test_salvage_is_half_cost_rounded_down() {
        assert_eq!(ModuleKind::Gun.salvage(), 2);
        assert_eq!(ModuleKind::Engine.salvage(), 5);
        assert_eq!(ModuleKind::Armor.salvage(), 4);
        assert_eq!(ModuleKind::Shield.salvage(), 7);
        assert_eq!(ModuleKind::Core.salvage(), 0);
    }

    #[test]
    fn test_damage_never_underflows() {
        let mut gun = Module::new(ModuleKind::Gun, Faction::Player);
        assert!(!gun.damage());
        assert!(gun.damage());
        assert!(gun.damage());
        assert_eq!(gun.hp(), 0);
        assert!(gun.hp() <= gun.max_hp());
    }

    #[test]
    fn test_hp_fraction_tracks_damage() {
        assert!(Faction::Player.is_player());
        assert!(!Faction::Enemy.is_player());

        let mut gun = Module::new(ModuleKind::Gun, Faction::Player);
        assert_eq!(gun.hp_fraction(), 1.0);
        gun.damage();
        assert_eq!(gun.hp_fraction(), 0.5);
        gun.damage();
        assert_eq!(gun.hp_fraction(), 0.0);

        let mut armor = Module::new(ModuleKind::Armor, Faction::Enemy);
        armor.damage();
        assert_eq!(armor.hp_fraction(), 0.875);
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in ModuleKind::ALL {
            assert_eq!(ModuleKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(ModuleKind::from_str("laser"), None);
    }
}
