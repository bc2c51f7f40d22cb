//! Terrain features and constructed improvements

use serde::{Deserialize, Serialize};

use crate::core::types::Yields;

/// Vegetation or ice layered on top of the base terrain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Feature {
    #[default]
    None,
    Forest,
    Jungle,
    Marsh,
    Ice,
    Oasis,
}

impl Feature {
    /// Yield modifiers (can be negative)
    pub fn yield_modifier(self) -> Yields {
        match self {
            Feature::None | Feature::Ice => Yields::ZERO,
            Feature::Forest => Yields::new(0, 1, 0),
            Feature::Jungle => Yields::new(1, -1, 0),
            Feature::Marsh => Yields::new(1, 0, 0),
            Feature::Oasis => Yields::new(2, 0, 1),
        }
    }

    /// Defence bonus in percent
    pub fn defense_bonus(self) -> i32 {
        match self {
            Feature::Forest | Feature::Jungle => 25,
            Feature::Marsh => 10,
            _ => 0,
        }
    }

    pub fn movement_cost(self) -> u32 {
        match self {
            Feature::Forest | Feature::Jungle | Feature::Ice => 2,
            Feature::Marsh => 3,
            Feature::None | Feature::Oasis => 1,
        }
    }
}

/// Constructed tile modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Improvement {
    Farm,
    Mine,
    Pasture,
    Plantation,
    Camp,
    LumberMill,
    Quarry,
    FishingBoats,
    TradingPost,
    Academy,
    Landmark,
    Fort,
    Citadel,
}

impl Improvement {
    pub fn yield_bonus(self) -> Yields {
        match self {
            Improvement::Farm | Improvement::FishingBoats => Yields::new(1, 0, 0),
            Improvement::Mine
            | Improvement::Pasture
            | Improvement::LumberMill
            | Improvement::Quarry => Yields::new(0, 1, 0),
            Improvement::Plantation | Improvement::Camp => Yields::new(0, 0, 1),
            Improvement::TradingPost => Yields::new(0, 0, 2),
            Improvement::Academy => Yields {
                science: 3,
                ..Yields::ZERO
            },
            Improvement::Landmark => Yields {
                culture: 2,
                ..Yields::ZERO
            },
            Improvement::Fort | Improvement::Citadel => Yields::ZERO,
        }
    }

    /// Defence bonus in percent, stacked on top of terrain and feature
    pub fn defense_bonus(self) -> i32 {
        match self {
            Improvement::Fort => 50,
            Improvement::Citadel => 100,
            _ => 0,
        }
    }
}
