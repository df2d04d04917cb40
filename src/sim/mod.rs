//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed step per call to [`tick`]
//! - Seeded RNG only
//! - Stable iteration order (grid order for modules, spawn order for ships)
//! - No rendering or platform dependencies

pub mod ai;
pub mod autopilot;
pub mod build;
pub mod collision;
pub mod economy;
pub mod module;
pub mod pickup;
pub mod projectile;
pub mod ship;
pub mod state;
pub mod tick;
pub mod wave;

pub use ai::{EnemyBrain, FireState};
pub use autopilot::Autopilot;
pub use build::BuildError;
pub use economy::{Economy, Reserves};
pub use module::{Faction, Module, ModuleKind};
pub use pickup::ScrapPickup;
pub use projectile::{Projectile, ShipId};
pub use ship::{GridCoord, GridShip};
pub use state::{GamePhase, GameState, HoverCell, HudStatus, SimEvent};
pub use tick::{Action, ActionSet, TickInput, tick};
pub use wave::{EnemyLayout, WaveDirector};
