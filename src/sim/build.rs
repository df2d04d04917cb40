//! Build mode placement rules and the auto-repair gun rule

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::economy::Economy;
use super::module::ModuleKind;
use super::ship::{GridCoord, GridShip};

/// Slots tried, in order, when the player loses their last gun
pub const REPAIR_SLOTS: [GridCoord; 8] = [
    GridCoord::new(1, 0),
    GridCoord::new(-1, 0),
    GridCoord::new(0, 1),
    GridCoord::new(0, -1),
    GridCoord::new(1, 1),
    GridCoord::new(-1, -1),
    GridCoord::new(1, -1),
    GridCoord::new(-1, 1),
];

/// Why a placement was rejected. Rejections never change any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BuildError {
    #[error("you cannot build on the ship's core")]
    CoreSlot,
    #[error("slot {0} is already occupied")]
    OccupiedSlot(GridCoord),
    #[error("{kind:?} costs {cost} scrap but only {available} is available")]
    InsufficientFunds {
        kind: ModuleKind,
        cost: u32,
        available: u32,
    },
    #[error("cell {0} is outside the build grid")]
    OutOfGridRange(GridCoord),
    #[error("a ship has exactly one core")]
    CoreNotBuildable,
    #[error("build mode is not active")]
    NotBuilding,
    #[error("the game is over")]
    GameOver,
}

impl BuildError {
    /// Either occupied-slot variant (core or regular)
    pub fn is_occupied(&self) -> bool {
        matches!(self, BuildError::CoreSlot | BuildError::OccupiedSlot(_))
    }
}

/// Check a placement without applying it
pub fn validate_placement(
    ship: &GridShip,
    economy: &Economy,
    coord: GridCoord,
    kind: ModuleKind,
) -> Result<(), BuildError> {
    if !coord.in_build_range() {
        return Err(BuildError::OutOfGridRange(coord));
    }
    if ship.is_occupied(coord) {
        return Err(if coord == GridCoord::CORE {
            BuildError::CoreSlot
        } else {
            BuildError::OccupiedSlot(coord)
        });
    }
    if kind == ModuleKind::Core {
        return Err(BuildError::CoreNotBuildable);
    }
    if !economy.can_afford(kind.cost()) {
        return Err(BuildError::InsufficientFunds {
            kind,
            cost: kind.cost(),
            available: economy.scrap,
        });
    }
    Ok(())
}

/// Place a module, paying for it. Resets the ship's fire cooldown so the
/// trigger works straight away after leaving build mode.
pub fn place_module(
    ship: &mut GridShip,
    economy: &mut Economy,
    coord: GridCoord,
    kind: ModuleKind,
) -> Result<(), BuildError> {
    validate_placement(ship, economy, coord, kind)?;

    // Funds were checked above, so the spend cannot fail
    let paid = economy.try_spend(kind.cost());
    debug_assert!(paid, "validated placement could not pay {}", kind.cost());
    ship.insert_module(coord, kind);
    ship.fire_cooldown = 0;
    ship.refresh_speed_multiplier();
    Ok(())
}

/// Give a gunless ship a fresh gun in the first free repair slot
pub fn ensure_gun(ship: &mut GridShip) -> Option<GridCoord> {
    if ship.count_kind(ModuleKind::Gun) > 0 {
        return None;
    }
    let slot = REPAIR_SLOTS
        .into_iter()
        .find(|coord| !ship.is_occupied(*coord))?;
    ship.insert_module(slot, ModuleKind::Gun);
    Some(slot)
}
