//! Turn simulation - cities and units acting on the regional layer

pub mod events;
pub mod snapshot;
pub mod tick;
pub mod world;

pub use events::{EventLog, GameEvent, LoggedEvent};
pub use snapshot::WorldSnapshot;
pub use tick::TurnSummary;
pub use world::{AttackOutcome, GameWorld};
