//! Units, movement and combat on the regional layer
//!
//! Units hold only a tile reference; the regional layer never owns them.

pub mod constants;
pub mod movement;
pub mod resolution;
pub mod unit_type;
pub mod units;

// Re-exports for convenient access
pub use constants::*;
pub use movement::{entry_cost, move_unit, plan_path, step_cost, MovementResult};
pub use resolution::{
    effective_defense, resolve_city_attack, resolve_combat, resolve_unit_combat, CityCombatResult,
    CombatResult, UnitCombatResult,
};
pub use unit_type::{UnitClass, UnitProperties, UnitType};
pub use units::Unit;
