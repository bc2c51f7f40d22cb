//! Turn loop - advances every nation, its units and its cities by one turn
//!
//! Nations act in ascending id order. For each nation: reset its units
//! (exactly once per turn), then advance each of its cities and place any
//! units they finished.

use std::collections::BTreeMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::battle::unit_type::UnitType;
use crate::city::production::{BuildItem, QueuedItem};
use crate::city::settlement::CityTurnReport;
use crate::core::types::{CityId, GlobalCoord, NationId, Turn};
use crate::simulation::events::GameEvent;
use crate::simulation::world::GameWorld;

/// Everything that happened during one turn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnSummary {
    pub turn: Turn,
    pub events: Vec<GameEvent>,
    pub cities: BTreeMap<CityId, CityTurnReport>,
    pub units_reset: usize,
}

impl TurnSummary {
    pub fn grown(&self) -> usize {
        self.cities.values().filter(|r| r.grew).count()
    }

    pub fn completed(&self) -> impl Iterator<Item = (CityId, BuildItem)> + '_ {
        self.cities
            .iter()
            .filter_map(|(id, r)| r.completed_item.map(|item| (*id, item)))
    }
}

impl GameWorld {
    /// Advance the whole world by one turn
    pub fn advance_turn(&mut self) -> TurnSummary {
        let start = Instant::now();
        self.turn += 1;
        let mut summary = TurnSummary {
            turn: self.turn,
            ..Default::default()
        };

        let nations: Vec<NationId> = self.nations.iter().copied().collect();
        for nation in nations {
            summary.units_reset += self.reset_units(nation);
            self.advance_cities(nation, &mut summary);
        }

        for event in &summary.events {
            self.log.record(self.turn, event.clone());
        }

        tracing::info!(
            "Turn {}: {} cities, {} units, {} grew, {} events in {:?}",
            self.turn,
            self.cities.len(),
            self.units.len(),
            summary.grown(),
            summary.events.len(),
            start.elapsed()
        );

        summary
    }

    /// Start-of-turn reset for one nation's units
    fn reset_units(&mut self, nation: NationId) -> usize {
        let turn = self.turn;
        let rules = &self.rules;
        self.units
            .values_mut()
            .filter(|u| u.owner == nation)
            .map(|u| u.advance_turn(turn, rules))
            .filter(|reset| *reset)
            .count()
    }

    fn advance_cities(&mut self, nation: NationId, summary: &mut TurnSummary) {
        let ids: Vec<CityId> = self.cities_of(nation).map(|c| c.id).collect();

        for id in ids {
            let Some(city) = self.cities.get_mut(&id) else {
                continue;
            };
            let report = city.advance_turn(&mut self.layer, &self.rules, self.policy.as_ref());
            let population = city.population;

            if report.grew {
                summary.events.push(GameEvent::CityGrew { city: id, population });
            }
            if report.starved {
                summary.events.push(GameEvent::CityStarved { city: id, population });
            }
            if let Some(tile) = report.acquired_tile {
                summary.events.push(GameEvent::BorderExpanded { city: id, tile });
            }
            if let Some(item) = report.completed_item {
                summary.events.push(GameEvent::ProductionCompleted { city: id, item });
                if let BuildItem::Unit(unit_type) = item {
                    self.deliver_unit(id, nation, unit_type, summary);
                }
            }

            summary.cities.insert(id, report);
        }
    }

    /// Place a finished unit on the city tile or the first free adjacent tile
    ///
    /// With no room the item goes back to the head of the queue, fully paid,
    /// and is placed as soon as a tile frees up.
    fn deliver_unit(&mut self, city_id: CityId, owner: NationId, unit_type: UnitType, summary: &mut TurnSummary) {
        let Some(location) = self.cities.get(&city_id).map(|c| c.location) else {
            return;
        };

        let mut sites: Vec<GlobalCoord> = vec![location];
        sites.extend(location.neighbors());

        for site in sites {
            if self.unit_at(site).is_some() {
                continue;
            }
            if let Ok(unit) = self.insert_unit(owner, unit_type, site) {
                summary.events.push(GameEvent::UnitSpawned {
                    unit,
                    city: Some(city_id),
                    unit_type,
                    location: site,
                });
                return;
            }
        }

        tracing::debug!("{} has no room for a {}", city_id, unit_type.name());
        if let Some(city) = self.cities.get_mut(&city_id) {
            let item = BuildItem::Unit(unit_type);
            city.production.push_front(QueuedItem {
                item,
                progress: item.cost(),
            });
        }
        summary.events.push(GameEvent::SpawnBlocked { city: city_id, unit_type });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::building::BuildingType;
    use crate::simulation::world::tests::test_world;

    #[test]
    fn test_units_reset_once_per_turn() {
        let mut world = test_world();
        let id = world.spawn_unit(NationId(1), UnitType::Warrior, GlobalCoord::new(1, 1)).unwrap();
        world.move_unit(id, GlobalCoord::new(1, 2)).unwrap();
        assert_eq!(world.unit(id).unwrap().movement, 1);

        let summary = world.advance_turn();
        assert_eq!(summary.units_reset, 1);
        let unit = world.unit(id).unwrap();
        assert_eq!(unit.movement, unit.max_movement);
        assert!(!unit.has_moved);
        assert_eq!(unit.last_reset, Some(1));

        // A second reset for the same turn is refused
        let rules = world.rules.clone();
        assert!(!world.unit_mut(id).unwrap().advance_turn(1, &rules));
    }

    #[test]
    fn test_completed_unit_spawns_on_city_tile() {
        let mut world = test_world();
        let city = world.found_city(NationId(1), "Alpha", GlobalCoord::new(3, 3)).unwrap();
        world.city_mut(city).unwrap().production.push_front(QueuedItem {
            item: BuildItem::Unit(UnitType::Scout),
            progress: 19,
        });

        let summary = world.advance_turn();
        assert!(summary
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::UnitSpawned { location, .. } if *location == GlobalCoord::new(3, 3))));
        let scout = world.unit_at(GlobalCoord::new(3, 3)).unwrap();
        assert_eq!(scout.unit_type, UnitType::Scout);
        assert!(scout.garrisoned);
    }

    #[test]
    fn test_blocked_spawn_stays_at_head() {
        let mut world = test_world();
        let centre = GlobalCoord::new(3, 3);
        let city = world.found_city(NationId(1), "Alpha", centre).unwrap();
        world.spawn_unit(NationId(2), UnitType::Warrior, centre).unwrap();
        for n in centre.neighbors() {
            world.spawn_unit(NationId(2), UnitType::Warrior, n).unwrap();
        }
        world.city_mut(city).unwrap().production.push_front(QueuedItem {
            item: BuildItem::Unit(UnitType::Warrior),
            progress: 29,
        });

        let summary = world.advance_turn();
        assert!(summary
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::SpawnBlocked { .. })));
        let head = *world.city(city).unwrap().production.current().unwrap();
        assert_eq!(head.item, BuildItem::Unit(UnitType::Warrior));
        assert_eq!(head.progress, head.item.cost());
    }

    #[test]
    fn test_buildings_complete_through_the_loop() {
        let mut world = test_world();
        let city = world.found_city(NationId(1), "Alpha", GlobalCoord::new(3, 3)).unwrap();
        world.enqueue(city, BuildItem::Building(BuildingType::Walls)).unwrap();

        let mut done = None;
        for _ in 0..80 {
            let summary = world.advance_turn();
            if summary.completed().any(|(_, item)| item == BuildItem::Building(BuildingType::Walls)) {
                done = Some(summary.turn);
                break;
            }
        }
        assert!(done.is_some());
        assert!(world.city(city).unwrap().has_building(BuildingType::Walls));
        assert!(world.log.events_for_city(city).count() > 1);
    }

    #[test]
    fn test_turn_events_are_logged_with_turn() {
        let mut world = test_world();
        let city = world.found_city(NationId(1), "Alpha", GlobalCoord::new(3, 3)).unwrap();
        world.city_mut(city).unwrap().stored_food = 100;
        world.city_mut(city).unwrap().buildings.insert(BuildingType::Granary);
        world.advance_turn();
        assert!(world
            .log
            .events_for_turn(1)
            .any(|e| matches!(e.event, GameEvent::CityGrew { .. })));
    }
}
