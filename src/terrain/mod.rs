//! Terrain vocabulary and the hex yield model

pub mod feature;
pub mod kinds;
pub mod resource;
pub mod yields;

pub use feature::{Feature, Improvement};
pub use kinds::{Terrain, TerrainGroup};
pub use resource::{BonusResource, LuxuryResource, ResourceTier, StrategicResource};
pub use yields::{HexYieldModel, IMPASSABLE_COST, RIVER_GOLD};
