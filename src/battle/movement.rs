//! Unit movement on the regional layer
//!
//! Land units pay each tile's movement cost and embark when entering water.
//! Naval units stay on water. A unit with any points left may always enter a
//! passable tile, spending whatever remains.

use crate::battle::constants::WATER_STEP_COST;
use crate::battle::units::Unit;
use crate::core::error::MoveError;
use crate::core::types::GlobalCoord;
use crate::spatial::pathfinding::find_path;
use crate::worldgen::cells::RegionalCell;
use crate::worldgen::layer::RegionalLayer;

/// Result of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementResult {
    pub from: GlobalCoord,
    pub to: GlobalCoord,
    pub cost_spent: u32,
    pub embarked: bool,
    pub disembarked: bool,
}

/// Full cost of entering `to`, ignoring remaining movement
///
/// `None` when the unit can never enter the tile.
pub fn entry_cost(unit: &Unit, to: &RegionalCell) -> Option<u32> {
    if unit.unit_type.is_naval() {
        return to.is_water().then_some(WATER_STEP_COST);
    }
    if to.is_water() {
        return Some(WATER_STEP_COST);
    }
    if to.impassable {
        return None;
    }
    Some(to.movement_cost.max(1))
}

/// Step-cost function for A* over the layer
pub fn step_cost<'a>(unit: &'a Unit, layer: &'a RegionalLayer) -> impl Fn(GlobalCoord, GlobalCoord) -> Option<u32> + 'a {
    move |_from, to| layer.get(to).and_then(|cell| entry_cost(unit, cell))
}

/// Move a unit one hex
///
/// Occupancy is the caller's concern; this only checks adjacency, terrain
/// and the unit's movement budget.
pub fn move_unit(unit: &mut Unit, to: GlobalCoord, layer: &RegionalLayer) -> Result<MovementResult, MoveError> {
    if !unit.can_move() {
        return Err(MoveError::NoMovementLeft);
    }
    if unit.location.direction_to(&to).is_none() {
        return Err(MoveError::NotAdjacent);
    }
    let cell = layer.get(to).ok_or(MoveError::Impassable)?;
    let cost = entry_cost(unit, cell).ok_or(MoveError::Impassable)?;
    let spent = cost.min(unit.movement);

    let from = unit.location;
    let was_embarked = unit.embarked;
    unit.location = to;
    unit.spend_movement(spent);
    unit.garrisoned = false;
    if !unit.unit_type.is_naval() {
        unit.embarked = cell.is_water();
    }

    tracing::trace!("{} moved {} -> {} for {}", unit.id, from, to, spent);

    Ok(MovementResult {
        from,
        to,
        cost_spent: spent,
        embarked: !was_embarked && unit.embarked,
        disembarked: was_embarked && !unit.embarked,
    })
}

/// Cheapest path for this unit to `goal`, including the start tile
pub fn plan_path(unit: &Unit, layer: &RegionalLayer, goal: GlobalCoord) -> Result<Vec<GlobalCoord>, MoveError> {
    if !layer.contains(goal) {
        return Err(MoveError::OutOfRange);
    }
    find_path(unit.location, goal, step_cost(unit, layer)).ok_or(MoveError::NoPath)
}
