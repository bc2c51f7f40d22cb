//! City layer - growth, production, buildings and border expansion

pub mod building;
pub mod expansion;
pub mod production;
pub mod settlement;

pub use building::BuildingType;
pub use expansion::{expansion_candidates, workable_tiles, ExpansionPolicy, YieldWeightedPolicy};
pub use production::{BuildItem, ProductionQueue, QueuedItem};
pub use settlement::{City, CityTurnReport, FoodOutcome};
