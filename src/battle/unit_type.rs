//! Unit types and their default properties

use serde::{Deserialize, Serialize};

/// Type of unit a city can train
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UnitType {
    // Civilian
    Settler,
    Worker,

    // Recon
    Scout,

    // Melee
    Warrior,
    Spearman,
    Swordsman,

    // Ranged and siege
    Archer,
    Catapult,

    // Mounted
    Horseman,

    // Naval
    Trireme,
}

/// Broad role that decides how a unit moves and fights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitClass {
    Civilian,
    Recon,
    Melee,
    Mounted,
    Ranged,
    Siege,
    Naval,
}

/// Default properties for a unit type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitProperties {
    /// Melee (and defence) strength
    pub strength: f64,
    /// Ranged attack strength, 0 for units without a ranged attack
    pub ranged_strength: f64,
    /// Ranged attack reach in hexes
    pub range: u32,
    /// Movement points per turn
    pub movement: u32,
    /// Production cost to train
    pub cost: i32,
}

impl UnitType {
    pub const ALL: [UnitType; 10] = [
        UnitType::Settler,
        UnitType::Worker,
        UnitType::Scout,
        UnitType::Warrior,
        UnitType::Spearman,
        UnitType::Swordsman,
        UnitType::Archer,
        UnitType::Catapult,
        UnitType::Horseman,
        UnitType::Trireme,
    ];

    pub fn class(self) -> UnitClass {
        match self {
            UnitType::Settler | UnitType::Worker => UnitClass::Civilian,
            UnitType::Scout => UnitClass::Recon,
            UnitType::Warrior | UnitType::Spearman | UnitType::Swordsman => UnitClass::Melee,
            UnitType::Archer => UnitClass::Ranged,
            UnitType::Catapult => UnitClass::Siege,
            UnitType::Horseman => UnitClass::Mounted,
            UnitType::Trireme => UnitClass::Naval,
        }
    }

    /// Get default properties for this unit type
    pub fn default_properties(self) -> UnitProperties {
        let (strength, ranged_strength, range, movement, cost) = match self {
            UnitType::Settler => (0.0, 0.0, 0, 2, 60),
            UnitType::Worker => (0.0, 0.0, 0, 2, 40),
            UnitType::Scout => (5.0, 0.0, 0, 3, 20),
            UnitType::Warrior => (8.0, 0.0, 0, 2, 30),
            UnitType::Spearman => (11.0, 0.0, 0, 2, 45),
            UnitType::Swordsman => (14.0, 0.0, 0, 2, 60),
            UnitType::Archer => (5.0, 7.0, 2, 2, 40),
            UnitType::Catapult => (4.0, 14.0, 2, 1, 65),
            UnitType::Horseman => (12.0, 0.0, 0, 4, 55),
            UnitType::Trireme => (10.0, 0.0, 0, 4, 45),
        };
        UnitProperties {
            strength,
            ranged_strength,
            range,
            movement,
            cost,
        }
    }

    pub fn cost(self) -> i32 {
        self.default_properties().cost
    }

    pub fn is_civilian(self) -> bool {
        self.class() == UnitClass::Civilian
    }

    pub fn is_naval(self) -> bool {
        self.class() == UnitClass::Naval
    }

    pub fn has_ranged_attack(self) -> bool {
        matches!(self.class(), UnitClass::Ranged | UnitClass::Siege)
    }

    pub fn name(self) -> &'static str {
        match self {
            UnitType::Settler => "settler",
            UnitType::Worker => "worker",
            UnitType::Scout => "scout",
            UnitType::Warrior => "warrior",
            UnitType::Spearman => "spearman",
            UnitType::Swordsman => "swordsman",
            UnitType::Archer => "archer",
            UnitType::Catapult => "catapult",
            UnitType::Horseman => "horseman",
            UnitType::Trireme => "trireme",
        }
    }
}
