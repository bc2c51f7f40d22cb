//! City buildings

use serde::{Deserialize, Serialize};

use crate::core::types::Yields;

/// Buildings a city can construct once
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BuildingType {
    Monument,
    Granary,
    Library,
    Market,
    Workshop,
    Walls,
}

impl BuildingType {
    pub const ALL: [BuildingType; 6] = [
        BuildingType::Monument,
        BuildingType::Granary,
        BuildingType::Library,
        BuildingType::Market,
        BuildingType::Workshop,
        BuildingType::Walls,
    ];

    /// Production cost
    pub fn cost(self) -> i32 {
        match self {
            BuildingType::Monument => 40,
            BuildingType::Granary => 60,
            BuildingType::Library => 75,
            BuildingType::Market => 80,
            BuildingType::Workshop => 80,
            BuildingType::Walls => 60,
        }
    }

    /// Flat yields added to the city every turn
    pub fn yield_bonus(self) -> Yields {
        match self {
            BuildingType::Monument => Yields {
                culture: 2,
                ..Yields::ZERO
            },
            BuildingType::Granary => Yields::new(2, 0, 0),
            BuildingType::Library => Yields {
                science: 2,
                ..Yields::ZERO
            },
            BuildingType::Market => Yields::new(0, 0, 2),
            BuildingType::Workshop => Yields::new(0, 2, 0),
            BuildingType::Walls => Yields::ZERO,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BuildingType::Monument => "monument",
            BuildingType::Granary => "granary",
            BuildingType::Library => "library",
            BuildingType::Market => "market",
            BuildingType::Workshop => "workshop",
            BuildingType::Walls => "walls",
        }
    }
}
