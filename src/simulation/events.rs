//! Game events and the running event log

use serde::{Deserialize, Serialize};

use crate::battle::unit_type::UnitType;
use crate::city::production::BuildItem;
use crate::core::types::{CityId, GlobalCoord, NationId, Turn, UnitId};
use crate::terrain::Improvement;

/// Something that happened in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    // Cities
    CityFounded { city: CityId, owner: NationId, location: GlobalCoord },
    CityGrew { city: CityId, population: u32 },
    CityStarved { city: CityId, population: u32 },
    ProductionCompleted { city: CityId, item: BuildItem },
    BorderExpanded { city: CityId, tile: GlobalCoord },
    CityCaptured { city: CityId, from: NationId, to: NationId },

    // Units
    UnitSpawned { unit: UnitId, city: Option<CityId>, unit_type: UnitType, location: GlobalCoord },
    /// A finished unit had no free tile; it stays at the head of the queue
    SpawnBlocked { city: CityId, unit_type: UnitType },
    UnitMoved { unit: UnitId, from: GlobalCoord, to: GlobalCoord },
    UnitFortified { unit: UnitId },
    Combat { attacker: UnitId, target: GlobalCoord, damage: u32, counter_damage: u32, ranged: bool },
    UnitDestroyed { unit: UnitId, owner: NationId, location: GlobalCoord },
    SettlerSettled { unit: UnitId, city: CityId },

    // Tiles
    ImprovementBuilt { tile: GlobalCoord, improvement: Improvement },
    TilePillaged { tile: GlobalCoord, improvement: Improvement },
    TileRepaired { tile: GlobalCoord, improvement: Improvement },
}

impl GameEvent {
    /// City this event concerns, if any
    pub fn city(&self) -> Option<CityId> {
        match self {
            GameEvent::CityFounded { city, .. }
            | GameEvent::CityGrew { city, .. }
            | GameEvent::CityStarved { city, .. }
            | GameEvent::ProductionCompleted { city, .. }
            | GameEvent::BorderExpanded { city, .. }
            | GameEvent::CityCaptured { city, .. }
            | GameEvent::SpawnBlocked { city, .. }
            | GameEvent::SettlerSettled { city, .. } => Some(*city),
            GameEvent::UnitSpawned { city, .. } => *city,
            _ => None,
        }
    }
}

/// An event stamped with the turn it happened on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub id: u32,
    pub turn: Turn,
    pub event: GameEvent,
}

/// Append-only record of everything that happened
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    pub events: Vec<LoggedEvent>,
    next_event_id: u32,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, turn: Turn, event: GameEvent) -> u32 {
        let id = self.next_event_id;
        self.next_event_id += 1;
        self.events.push(LoggedEvent { id, turn, event });
        id
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events_for_turn(&self, turn: Turn) -> impl Iterator<Item = &LoggedEvent> {
        self.events.iter().filter(move |e| e.turn == turn)
    }

    pub fn events_for_city(&self, city: CityId) -> impl Iterator<Item = &LoggedEvent> {
        self.events.iter().filter(move |e| e.event.city() == Some(city))
    }
}
