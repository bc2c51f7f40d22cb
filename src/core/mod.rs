pub mod config;
pub mod error;
pub mod types;

pub use config::{GenerationConfig, SimulationRules};
pub use error::{MoveError, Result, WorldError};
pub use types::{CityId, ContinentId, GlobalCoord, GridCoord, NationId, Turn, UnitId, Yields};
