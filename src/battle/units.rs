//! Mobile units on the regional layer

use serde::{Deserialize, Serialize};

use crate::battle::constants::UNIT_MAX_HP;
use crate::battle::unit_type::{UnitClass, UnitType};
use crate::core::config::SimulationRules;
use crate::core::error::MoveError;
use crate::core::types::{GlobalCoord, NationId, Turn, UnitId};

/// A unit owned by a nation
///
/// Invariants: `movement <= max_movement`, `hp <= max_hp`, and a unit that
/// moved this turn is never fortified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub owner: NationId,
    pub unit_type: UnitType,
    pub location: GlobalCoord,

    pub movement: u32,
    pub max_movement: u32,

    pub strength: f64,
    pub ranged_strength: f64,
    pub range: u32,

    pub hp: u32,
    pub max_hp: u32,

    pub fortified: bool,
    /// Whole turns spent fortified since the last move
    pub fortify_turns: u32,
    pub garrisoned: bool,
    pub embarked: bool,

    pub has_moved: bool,
    pub has_attacked: bool,

    /// Last turn whose start-of-turn reset ran
    pub last_reset: Option<Turn>,
}

impl Unit {
    pub fn new(id: UnitId, owner: NationId, unit_type: UnitType, location: GlobalCoord) -> Self {
        let props = unit_type.default_properties();
        Self {
            id,
            owner,
            unit_type,
            location,
            movement: props.movement,
            max_movement: props.movement,
            strength: props.strength,
            ranged_strength: props.ranged_strength,
            range: props.range,
            hp: UNIT_MAX_HP,
            max_hp: UNIT_MAX_HP,
            fortified: false,
            fortify_turns: 0,
            garrisoned: false,
            embarked: false,
            has_moved: false,
            has_attacked: false,
            last_reset: None,
        }
    }

    pub fn class(&self) -> UnitClass {
        self.unit_type.class()
    }

    pub fn is_destroyed(&self) -> bool {
        self.hp == 0
    }

    pub fn can_move(&self) -> bool {
        self.movement > 0 && !self.is_destroyed()
    }

    pub fn is_combatant(&self) -> bool {
        !self.unit_type.is_civilian()
    }

    /// Start-of-turn reset, applied at most once per turn
    ///
    /// Returns false when this turn's reset already ran.
    pub fn advance_turn(&mut self, turn: Turn, rules: &SimulationRules) -> bool {
        if self.last_reset == Some(turn) {
            return false;
        }
        self.last_reset = Some(turn);

        if self.fortified || self.garrisoned {
            self.heal(rules.unit_heal);
        }
        if self.fortified {
            self.fortify_turns += 1;
        }

        self.movement = self.max_movement;
        self.has_moved = false;
        self.has_attacked = false;
        true
    }

    /// Spend movement for a step and drop fortification
    pub fn spend_movement(&mut self, cost: u32) {
        self.movement = self.movement.saturating_sub(cost);
        self.has_moved = true;
        self.fortified = false;
        self.fortify_turns = 0;
    }

    pub fn fortify(&mut self) -> Result<(), MoveError> {
        if !self.is_combatant() {
            return Err(MoveError::NotCombatant);
        }
        if self.has_moved {
            return Err(MoveError::CannotFortifyAfterMoving);
        }
        if !self.fortified {
            self.fortified = true;
            self.fortify_turns = 0;
        }
        Ok(())
    }

    /// Defence multiplier bonus from fortification, as a fraction
    pub fn fortification_bonus(&self, rules: &SimulationRules) -> f64 {
        if !self.fortified {
            return 0.0;
        }
        (rules.fortify_per_turn * self.fortify_turns as f64).min(rules.fortify_cap)
    }

    /// Apply damage, clamped at zero; returns true if the unit was destroyed
    pub fn take_damage(&mut self, damage: u32) -> bool {
        self.hp = self.hp.saturating_sub(damage);
        self.is_destroyed()
    }

    pub fn heal(&mut self, amount: u32) {
        if self.is_destroyed() {
            return;
        }
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
    }
}
