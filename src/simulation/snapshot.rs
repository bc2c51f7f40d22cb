//! Full game persistence: planet snapshot plus cities, units and counters

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::battle::units::Unit;
use crate::city::settlement::City;
use crate::core::config::SimulationRules;
use crate::core::error::Result;
use crate::core::types::{NationId, Turn};
use crate::simulation::events::EventLog;
use crate::simulation::world::GameWorld;
use crate::worldgen::snapshot::PlanetSnapshot;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub planet: PlanetSnapshot,
    pub rules: SimulationRules,
    pub cities: Vec<City>,
    pub units: Vec<Unit>,
    pub nations: BTreeSet<NationId>,
    pub turn: Turn,
    #[serde(default)]
    pub log: EventLog,
    pub next_city_id: u32,
    pub next_unit_id: u32,
}

impl WorldSnapshot {
    pub fn capture(world: &GameWorld) -> Self {
        Self {
            planet: PlanetSnapshot::capture(&world.config, &world.planet, &world.layer),
            rules: world.rules.clone(),
            cities: world.cities.values().cloned().collect(),
            units: world.units.values().cloned().collect(),
            nations: world.nations.clone(),
            turn: world.turn,
            log: world.log.clone(),
            next_city_id: world.next_city_id,
            next_unit_id: world.next_unit_id,
        }
    }

    /// Rebuild the world, regenerating the regional layer from the planet
    ///
    /// The expansion policy is reset to the default.
    pub fn restore(self) -> Result<GameWorld> {
        self.rules.validate()?;
        let layer = self.planet.restore_layer()?;

        let mut world = GameWorld::new(self.planet.planet, layer, self.planet.config, self.rules);
        world.cities = self.cities.into_iter().map(|c| (c.id, c)).collect();
        world.units = self.units.into_iter().map(|u| (u.id, u)).collect();
        world.nations = self.nations;
        world.turn = self.turn;
        world.log = self.log;
        world.next_city_id = self.next_city_id;
        world.next_unit_id = self.next_unit_id;

        tracing::info!(
            "Restored turn {} with {} cities and {} units",
            world.turn,
            world.cities.len(),
            world.units.len()
        );
        Ok(world)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.rules.validate()?;
        snapshot.planet.validate()?;
        Ok(snapshot)
    }
}

impl GameWorld {
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(self)
    }
}
