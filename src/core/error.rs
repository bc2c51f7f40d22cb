use thiserror::Error;

use crate::core::types::{CityId, GlobalCoord, UnitId};

#[derive(Error, Debug)]
pub enum WorldError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid grid dimensions: {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("Unknown planet archetype: {0}")]
    UnknownArchetype(String),

    #[error("Generation cancelled")]
    Cancelled,

    #[error("Tile out of bounds: {0}")]
    TileOutOfBounds(GlobalCoord),

    #[error("City not found: {0}")]
    UnknownCity(CityId),

    #[error("Unit not found: {0}")]
    UnknownUnit(UnitId),

    #[error("Command rejected: {0}")]
    Rejected(String),

    #[error("Illegal move: {0}")]
    Movement(#[from] MoveError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Rejected unit commands
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("target tile is not adjacent")]
    NotAdjacent,
    #[error("target tile is impassable for this unit")]
    Impassable,
    #[error("no movement points left")]
    NoMovementLeft,
    #[error("target tile is occupied")]
    Occupied,
    #[error("target is out of range")]
    OutOfRange,
    #[error("unit has already attacked this turn")]
    AlreadyAttacked,
    #[error("unit has moved this turn and cannot fortify")]
    CannotFortifyAfterMoving,
    #[error("unit cannot fight")]
    NotCombatant,
    #[error("no path to target")]
    NoPath,
    #[error("nothing to attack on the target tile")]
    NoTarget,
}

pub type Result<T> = std::result::Result<T, WorldError>;
