//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Game turn counter (simulation time unit)
pub type Turn = u32;

/// Unique identifier for nations (owners of cities and units)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NationId(pub u32);

/// Unique identifier for cities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CityId(pub u32);

/// Unique identifier for units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Unique identifier for continent groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContinentId(pub u32);

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "city#{}", self.0)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

/// Position of a cell on the planetary layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Position of a cell on the regional layer, unique across the whole planet.
///
/// Doubles as the tile id: cities, units and ownership records all refer to
/// regional cells through this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct GlobalCoord {
    pub x: i32,
    pub y: i32,
}

impl GlobalCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GlobalCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Error parsing an `"x,y"` tile key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed tile key: {0:?}")]
pub struct TileKeyError(pub String);

impl FromStr for GlobalCoord {
    type Err = TileKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s.split_once(',').ok_or_else(|| TileKeyError(s.to_string()))?;
        let x = x.trim().parse().map_err(|_| TileKeyError(s.to_string()))?;
        let y = y.trim().parse().map_err(|_| TileKeyError(s.to_string()))?;
        Ok(Self { x, y })
    }
}

/// Per-turn economic output of a tile or a city
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Yields {
    pub food: i32,
    pub production: i32,
    pub gold: i32,
    pub science: i32,
    pub culture: i32,
}

impl Yields {
    pub const ZERO: Yields = Yields {
        food: 0,
        production: 0,
        gold: 0,
        science: 0,
        culture: 0,
    };

    pub fn new(food: i32, production: i32, gold: i32) -> Self {
        Self {
            food,
            production,
            gold,
            ..Self::ZERO
        }
    }

    /// Clamp every component at zero
    pub fn non_negative(self) -> Self {
        Self {
            food: self.food.max(0),
            production: self.production.max(0),
            gold: self.gold.max(0),
            science: self.science.max(0),
            culture: self.culture.max(0),
        }
    }
}

impl std::ops::Add for Yields {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            food: self.food + rhs.food,
            production: self.production + rhs.production,
            gold: self.gold + rhs.gold,
            science: self.science + rhs.science,
            culture: self.culture + rhs.culture,
        }
    }
}

impl std::ops::AddAssign for Yields {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for Yields {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, y| acc + y)
    }
}
