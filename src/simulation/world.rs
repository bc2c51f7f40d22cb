//! GameWorld - owns the regional layer plus every city and unit on it
//!
//! Cells only carry owner back-references; cities and units live here and
//! are addressed by id.

use std::collections::{BTreeMap, BTreeSet};

use crate::battle::movement::{self, entry_cost, plan_path, MovementResult};
use crate::battle::resolution::{resolve_city_attack, resolve_unit_combat, CityCombatResult, UnitCombatResult};
use crate::battle::unit_type::UnitType;
use crate::battle::units::Unit;
use crate::city::expansion::{ExpansionPolicy, YieldWeightedPolicy};
use crate::city::production::BuildItem;
use crate::city::settlement::City;
use crate::core::config::{GenerationConfig, SimulationRules};
use crate::core::error::{MoveError, Result, WorldError};
use crate::core::types::{CityId, GlobalCoord, NationId, Turn, UnitId};
use crate::simulation::events::{EventLog, GameEvent};
use crate::terrain::Improvement;
use crate::worldgen::layer::RegionalLayer;
use crate::worldgen::pipeline::GeneratedWorld;
use crate::worldgen::planetary::PlanetaryGrid;

/// Result of an attack command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    Unit(UnitCombatResult),
    City {
        city: CityId,
        result: CityCombatResult,
        captured: bool,
    },
}

/// The simulation state for one generated planet
pub struct GameWorld {
    pub config: GenerationConfig,
    pub rules: SimulationRules,
    pub planet: PlanetaryGrid,
    pub layer: RegionalLayer,

    pub cities: BTreeMap<CityId, City>,
    pub units: BTreeMap<UnitId, Unit>,
    /// Nations that take part in the turn order
    pub nations: BTreeSet<NationId>,

    /// Last completed turn
    pub turn: Turn,
    pub log: EventLog,

    pub(crate) policy: Box<dyn ExpansionPolicy>,
    pub(crate) next_city_id: u32,
    pub(crate) next_unit_id: u32,
}

impl GameWorld {
    pub fn new(
        planet: PlanetaryGrid,
        layer: RegionalLayer,
        config: GenerationConfig,
        rules: SimulationRules,
    ) -> Self {
        Self {
            config,
            rules,
            planet,
            layer,
            cities: BTreeMap::new(),
            units: BTreeMap::new(),
            nations: BTreeSet::new(),
            turn: 0,
            log: EventLog::new(),
            policy: Box::new(YieldWeightedPolicy::default()),
            next_city_id: 1,
            next_unit_id: 1,
        }
    }

    pub fn from_generated(world: GeneratedWorld, config: GenerationConfig, rules: SimulationRules) -> Self {
        Self::new(world.planet, world.regional, config, rules)
    }

    /// Replace the tile selection policy
    pub fn with_policy(mut self, policy: Box<dyn ExpansionPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &dyn ExpansionPolicy {
        self.policy.as_ref()
    }

    /// Generate a new unique CityId
    pub fn next_city_id(&mut self) -> CityId {
        let id = CityId(self.next_city_id);
        self.next_city_id += 1;
        id
    }

    /// Generate a new unique UnitId
    pub fn next_unit_id(&mut self) -> UnitId {
        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;
        id
    }

    pub fn add_nation(&mut self, nation: NationId) {
        self.nations.insert(nation);
    }

    pub(crate) fn record(&mut self, event: GameEvent) {
        self.log.record(self.turn, event);
    }

    pub fn city(&self, id: CityId) -> Result<&City> {
        self.cities.get(&id).ok_or(WorldError::UnknownCity(id))
    }

    pub fn city_mut(&mut self, id: CityId) -> Result<&mut City> {
        self.cities.get_mut(&id).ok_or(WorldError::UnknownCity(id))
    }

    pub fn unit(&self, id: UnitId) -> Result<&Unit> {
        self.units.get(&id).ok_or(WorldError::UnknownUnit(id))
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Result<&mut Unit> {
        self.units.get_mut(&id).ok_or(WorldError::UnknownUnit(id))
    }

    pub fn city_at(&self, tile: GlobalCoord) -> Option<&City> {
        self.cities.values().find(|c| c.location == tile)
    }

    /// Units are one per tile
    pub fn unit_at(&self, tile: GlobalCoord) -> Option<&Unit> {
        self.units.values().find(|u| u.location == tile)
    }

    pub fn cities_of(&self, nation: NationId) -> impl Iterator<Item = &City> {
        self.cities.values().filter(move |c| c.owner == nation)
    }

    pub fn units_of(&self, nation: NationId) -> impl Iterator<Item = &Unit> {
        self.units.values().filter(move |u| u.owner == nation)
    }

    // === CITIES ===

    /// Found a city and claim its centre plus unowned adjacent tiles
    pub fn found_city(&mut self, owner: NationId, name: impl Into<String>, location: GlobalCoord) -> Result<CityId> {
        let centre = self.layer.tile(location)?;
        if centre.is_water() || centre.impassable {
            return Err(WorldError::Rejected(format!("cannot found a city on {}", centre.terrain.name())));
        }
        if self.city_at(location).is_some() {
            return Err(WorldError::Rejected(format!("a city already stands at {}", location)));
        }
        if centre.owner_nation.is_some_and(|n| n != owner) {
            return Err(WorldError::Rejected(format!("{} is claimed by another nation", location)));
        }

        let id = self.next_city_id();
        let mut city = City::new(id, owner, name.into(), location);

        let mut claimed = vec![location];
        claimed.extend(location.neighbors());
        for tile in claimed {
            if let Some(cell) = self.layer.get_mut(tile) {
                if tile == location || cell.owner_nation.is_none() {
                    city.claim_tile(cell);
                }
            }
        }

        tracing::info!("Nation {} founded {} ({}) at {}", owner.0, city.name, id, location);

        // A unit standing on the site garrisons the new city
        if let Some(unit) = self.units.values_mut().find(|u| u.location == location && u.owner == owner) {
            unit.garrisoned = true;
        }

        self.cities.insert(id, city);
        self.nations.insert(owner);
        self.record(GameEvent::CityFounded { city: id, owner, location });
        Ok(id)
    }

    /// Consume a settler to found a city where it stands
    pub fn settle(&mut self, settler: UnitId, name: impl Into<String>) -> Result<CityId> {
        let unit = self.unit(settler)?;
        if unit.unit_type != UnitType::Settler {
            return Err(WorldError::Rejected(format!("{} cannot found cities", unit.unit_type.name())));
        }
        let (owner, location) = (unit.owner, unit.location);

        // The settler must leave the tile before the city checks garrisons
        let removed = self.units.remove(&settler);
        match self.found_city(owner, name, location) {
            Ok(city) => {
                self.record(GameEvent::SettlerSettled { unit: settler, city });
                Ok(city)
            }
            Err(e) => {
                if let Some(unit) = removed {
                    self.units.insert(settler, unit);
                }
                Err(e)
            }
        }
    }

    /// Append an item to a city's production queue
    pub fn enqueue(&mut self, city_id: CityId, item: BuildItem) -> Result<()> {
        let coastal = {
            let city = self.city(city_id)?;
            self.layer.tile(city.location)?.coastal
        };
        let city = self.city_mut(city_id)?;

        match item {
            BuildItem::Building(building) => {
                let queued = city.production.iter().any(|q| q.item == item);
                if city.has_building(building) || queued {
                    return Err(WorldError::Rejected(format!(
                        "{} already has or is building a {}",
                        city.name,
                        building.name()
                    )));
                }
            }
            BuildItem::Unit(unit_type) => {
                if unit_type.is_naval() && !coastal {
                    return Err(WorldError::Rejected(format!("{} is not coastal", city.name)));
                }
            }
        }

        city.production.push(item);
        Ok(())
    }

    /// Hand a city to a new owner, along with its territory
    pub fn capture_city(&mut self, city_id: CityId, new_owner: NationId) -> Result<()> {
        let city = self.cities.get_mut(&city_id).ok_or(WorldError::UnknownCity(city_id))?;
        let previous = city.owner;
        city.conquer(new_owner, &self.rules);

        for tile in &city.territory {
            if let Some(cell) = self.layer.get_mut(*tile) {
                if cell.owner_city == Some(city_id) {
                    cell.owner_nation = Some(new_owner);
                }
            }
        }

        tracing::info!("{} captured by nation {} from nation {}", city.name, new_owner.0, previous.0);

        self.nations.insert(new_owner);
        self.record(GameEvent::CityCaptured { city: city_id, from: previous, to: new_owner });
        Ok(())
    }

    // === UNITS ===

    /// Place a new unit on the map
    pub fn spawn_unit(&mut self, owner: NationId, unit_type: UnitType, location: GlobalCoord) -> Result<UnitId> {
        let id = self.insert_unit(owner, unit_type, location)?;
        self.record(GameEvent::UnitSpawned { unit: id, city: None, unit_type, location });
        Ok(id)
    }

    /// Add a unit without recording an event
    pub(crate) fn insert_unit(&mut self, owner: NationId, unit_type: UnitType, location: GlobalCoord) -> Result<UnitId> {
        if self.unit_at(location).is_some() {
            return Err(MoveError::Occupied.into());
        }
        let id = UnitId(self.next_unit_id);
        let mut unit = Unit::new(id, owner, unit_type, location);

        let cell = self.layer.tile(location)?;
        if entry_cost(&unit, cell).is_none() {
            return Err(MoveError::Impassable.into());
        }
        if !unit_type.is_naval() {
            unit.embarked = cell.is_water();
        }
        unit.garrisoned = self.city_at(location).is_some_and(|c| c.owner == owner);
        // Fresh units start with full movement; no reset is owed this turn
        unit.last_reset = Some(self.turn);

        self.next_unit_id += 1;
        self.units.insert(id, unit);
        self.nations.insert(owner);
        Ok(id)
    }

    /// Move a unit one hex
    pub fn move_unit(&mut self, id: UnitId, to: GlobalCoord) -> Result<MovementResult> {
        let owner = self.unit(id)?.owner;
        if self.unit_at(to).is_some() {
            return Err(MoveError::Occupied.into());
        }
        let garrison = match self.city_at(to) {
            Some(city) if city.owner != owner => return Err(MoveError::Occupied.into()),
            Some(_) => true,
            None => false,
        };

        let unit = self.units.get_mut(&id).ok_or(WorldError::UnknownUnit(id))?;
        let result = movement::move_unit(unit, to, &self.layer)?;
        unit.garrisoned = garrison;

        self.record(GameEvent::UnitMoved { unit: id, from: result.from, to: result.to });
        Ok(result)
    }

    /// Walk a unit toward `goal` as far as its movement allows
    ///
    /// Stops early on an occupied tile; fails only if no step was taken.
    pub fn move_unit_along(&mut self, id: UnitId, goal: GlobalCoord) -> Result<Vec<MovementResult>> {
        let path = plan_path(self.unit(id)?, &self.layer, goal)?;
        let mut steps = Vec::new();

        for next in path.into_iter().skip(1) {
            if !self.unit(id)?.can_move() {
                break;
            }
            match self.move_unit(id, next) {
                Ok(step) => steps.push(step),
                Err(e) if steps.is_empty() => return Err(e),
                Err(_) => break,
            }
        }
        Ok(steps)
    }

    pub fn fortify(&mut self, id: UnitId) -> Result<()> {
        self.unit_mut(id)?.fortify()?;
        self.record(GameEvent::UnitFortified { unit: id });
        Ok(())
    }

    /// Attack whatever enemy stands on `target`
    ///
    /// A unit on the tile is fought before the city under it. A melee
    /// attacker that takes a city moves in and the city changes hands.
    pub fn attack(&mut self, attacker_id: UnitId, target: GlobalCoord) -> Result<AttackOutcome> {
        let owner = self.unit(attacker_id)?.owner;

        if let Some(defender_id) = self.unit_at(target).map(|u| u.id) {
            if self.unit(defender_id)?.owner == owner {
                return Err(MoveError::NoTarget.into());
            }
            return self.attack_unit(attacker_id, defender_id);
        }

        match self.city_at(target).map(|c| (c.id, c.owner)) {
            Some((city_id, city_owner)) if city_owner != owner => self.attack_city(attacker_id, city_id),
            _ => Err(MoveError::NoTarget.into()),
        }
    }

    fn attack_unit(&mut self, attacker_id: UnitId, defender_id: UnitId) -> Result<AttackOutcome> {
        let mut attacker = self.units.remove(&attacker_id).ok_or(WorldError::UnknownUnit(attacker_id))?;
        let Some(mut defender) = self.units.remove(&defender_id) else {
            self.units.insert(attacker_id, attacker);
            return Err(WorldError::UnknownUnit(defender_id));
        };

        let outcome = match self.layer.tile(defender.location) {
            Ok(tile) => resolve_unit_combat(&mut attacker, &mut defender, tile, &self.rules).map_err(WorldError::from),
            Err(e) => Err(e),
        };
        let target = defender.location;

        let survivors = [(attacker_id, attacker), (defender_id, defender)];
        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                self.units.extend(survivors);
                return Err(e);
            }
        };

        self.record(GameEvent::Combat {
            attacker: attacker_id,
            target,
            damage: result.damage,
            counter_damage: result.counter_damage,
            ranged: result.ranged,
        });
        for (id, unit) in survivors {
            if unit.is_destroyed() {
                self.record(GameEvent::UnitDestroyed { unit: id, owner: unit.owner, location: unit.location });
            } else {
                self.units.insert(id, unit);
            }
        }

        Ok(AttackOutcome::Unit(result))
    }

    fn attack_city(&mut self, attacker_id: UnitId, city_id: CityId) -> Result<AttackOutcome> {
        let city = self.cities.get_mut(&city_id).ok_or(WorldError::UnknownCity(city_id))?;
        let attacker = self.units.get_mut(&attacker_id).ok_or(WorldError::UnknownUnit(attacker_id))?;
        let tile = self.layer.tile(city.location)?;

        let result = resolve_city_attack(attacker, city, tile, &self.rules)?;
        let (owner, location, target) = (attacker.owner, attacker.location, city.location);

        self.record(GameEvent::Combat {
            attacker: attacker_id,
            target,
            damage: result.damage,
            counter_damage: result.counter_damage,
            ranged: result.ranged,
        });

        if result.attacker_destroyed {
            self.units.remove(&attacker_id);
            self.record(GameEvent::UnitDestroyed { unit: attacker_id, owner, location });
        }

        let captured = result.city_falls;
        if captured {
            self.capture_city(city_id, owner)?;
            if let Some(unit) = self.units.get_mut(&attacker_id) {
                unit.location = target;
                unit.garrisoned = true;
                unit.embarked = false;
            }
            self.record(GameEvent::UnitMoved { unit: attacker_id, from: location, to: target });
        }

        Ok(AttackOutcome::City { city: city_id, result, captured })
    }

    // === TILES ===

    /// Build an improvement, replacing whatever was there
    pub fn build_improvement(&mut self, tile: GlobalCoord, improvement: Improvement) -> Result<()> {
        let cell = self.layer.tile_mut(tile)?;
        let water_only = improvement == Improvement::FishingBoats;
        if cell.is_water() != water_only || (cell.impassable && !cell.is_water()) {
            return Err(WorldError::Rejected(format!(
                "{:?} cannot be built on {}",
                improvement,
                cell.terrain.name()
            )));
        }
        cell.improvement = Some(improvement);
        cell.pillaged = false;
        self.layer.recompute(tile)?;
        self.record(GameEvent::ImprovementBuilt { tile, improvement });
        Ok(())
    }

    /// Disable a tile's improvement until repaired
    pub fn pillage(&mut self, tile: GlobalCoord) -> Result<Improvement> {
        let cell = self.layer.tile_mut(tile)?;
        let improvement = match cell.improvement {
            Some(improvement) if !cell.pillaged => improvement,
            _ => return Err(WorldError::Rejected(format!("nothing to pillage at {}", tile))),
        };
        cell.pillaged = true;
        self.layer.recompute(tile)?;
        self.record(GameEvent::TilePillaged { tile, improvement });
        Ok(improvement)
    }

    pub fn repair(&mut self, tile: GlobalCoord) -> Result<Improvement> {
        let cell = self.layer.tile_mut(tile)?;
        let improvement = match cell.improvement {
            Some(improvement) if cell.pillaged => improvement,
            _ => return Err(WorldError::Rejected(format!("nothing to repair at {}", tile))),
        };
        cell.pillaged = false;
        self.layer.recompute(tile)?;
        self.record(GameEvent::TileRepaired { tile, improvement });
        Ok(improvement)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::types::GridCoord;
    use crate::terrain::{HexYieldModel, Terrain};
    use crate::worldgen::archetype::PlanetArchetype;
    use crate::worldgen::cells::{PlanetaryCell, RegionalCell};

    /// One plains planetary hex expanded into an 8×8 layer, with a lake column at x = 7
    pub(crate) fn test_world() -> GameWorld {
        let mut cells = Vec::new();
        for y in 0..8 {
            for x in 0..8 {
                let terrain = if x == 7 { Terrain::Lake } else { Terrain::Plains };
                let mut cell =
                    RegionalCell::new(GridCoord::new(0, 0), x as u32, y as u32, GlobalCoord::new(x, y), terrain, 1);
                cell.coastal = x == 6;
                HexYieldModel::recompute(&mut cell);
                cells.push(cell);
            }
        }
        let layer = RegionalLayer::assemble(1, 1, 8, vec![cells]).unwrap();
        let planet = PlanetaryGrid {
            seed: 1,
            archetype: PlanetArchetype::EarthLike,
            width: 1,
            height: 1,
            cells: vec![PlanetaryCell {
                coord: GridCoord::new(0, 0),
                elevation: 2,
                temperature: 50.0,
                dryness: 50.0,
                terrain: Terrain::Plains,
                continent: None,
            }],
        };
        GameWorld::new(planet, layer, GenerationConfig::default(), SimulationRules::default())
    }

    #[test]
    fn test_found_city_claims_ring() {
        let mut world = test_world();
        let id = world.found_city(NationId(1), "Alpha", GlobalCoord::new(3, 3)).unwrap();
        let city = world.city(id).unwrap();
        assert_eq!(city.territory.len(), 7);
        for tile in &city.territory {
            assert_eq!(world.layer.get(*tile).unwrap().owner_city, Some(id));
        }
        assert!(world.nations.contains(&NationId(1)));
    }

    #[test]
    fn test_found_city_rejections() {
        let mut world = test_world();
        assert!(matches!(
            world.found_city(NationId(1), "Wet", GlobalCoord::new(7, 3)),
            Err(WorldError::Rejected(_))
        ));
        assert!(matches!(
            world.found_city(NationId(1), "Nowhere", GlobalCoord::new(20, 20)),
            Err(WorldError::TileOutOfBounds(_))
        ));
        world.found_city(NationId(1), "Alpha", GlobalCoord::new(3, 3)).unwrap();
        assert!(matches!(
            world.found_city(NationId(2), "Beta", GlobalCoord::new(3, 4)),
            Err(WorldError::Rejected(_))
        ));
    }

    #[test]
    fn test_units_are_one_per_tile() {
        let mut world = test_world();
        let a = world.spawn_unit(NationId(1), UnitType::Warrior, GlobalCoord::new(1, 1)).unwrap();
        assert!(matches!(
            world.spawn_unit(NationId(2), UnitType::Warrior, GlobalCoord::new(1, 1)),
            Err(WorldError::Movement(MoveError::Occupied))
        ));
        world.spawn_unit(NationId(1), UnitType::Scout, GlobalCoord::new(1, 2)).unwrap();
        assert!(matches!(
            world.move_unit(a, GlobalCoord::new(1, 2)),
            Err(WorldError::Movement(MoveError::Occupied))
        ));
    }

    #[test]
    fn test_naval_spawn_needs_water() {
        let mut world = test_world();
        assert!(matches!(
            world.spawn_unit(NationId(1), UnitType::Trireme, GlobalCoord::new(2, 2)),
            Err(WorldError::Movement(MoveError::Impassable))
        ));
        assert!(world.spawn_unit(NationId(1), UnitType::Trireme, GlobalCoord::new(7, 2)).is_ok());
    }

    #[test]
    fn test_move_into_own_city_garrisons() {
        let mut world = test_world();
        world.found_city(NationId(1), "Alpha", GlobalCoord::new(3, 3)).unwrap();
        let id = world.spawn_unit(NationId(1), UnitType::Warrior, GlobalCoord::new(3, 4)).unwrap();
        world.move_unit(id, GlobalCoord::new(3, 3)).unwrap();
        assert!(world.unit(id).unwrap().garrisoned);
        world.move_unit(id, GlobalCoord::new(3, 2)).unwrap();
        assert!(!world.unit(id).unwrap().garrisoned);
    }

    #[test]
    fn test_move_along_path() {
        let mut world = test_world();
        let id = world.spawn_unit(NationId(1), UnitType::Horseman, GlobalCoord::new(0, 0)).unwrap();
        let steps = world.move_unit_along(id, GlobalCoord::new(0, 6)).unwrap();
        // Four movement points over plains
        assert_eq!(steps.len(), 4);
        assert_eq!(world.unit(id).unwrap().location, GlobalCoord::new(0, 4));
        assert_eq!(world.unit(id).unwrap().movement, 0);
    }

    #[test]
    fn test_settler_founds_city() {
        let mut world = test_world();
        let settler = world.spawn_unit(NationId(3), UnitType::Settler, GlobalCoord::new(2, 5)).unwrap();
        let city = world.settle(settler, "Gamma").unwrap();
        assert!(world.unit(settler).is_err());
        assert_eq!(world.city(city).unwrap().location, GlobalCoord::new(2, 5));

        let warrior = world.spawn_unit(NationId(3), UnitType::Warrior, GlobalCoord::new(5, 5)).unwrap();
        assert!(matches!(world.settle(warrior, "Nope"), Err(WorldError::Rejected(_))));
    }

    #[test]
    fn test_melee_kill_does_not_advance() {
        let mut world = test_world();
        let attacker = world.spawn_unit(NationId(1), UnitType::Swordsman, GlobalCoord::new(2, 2)).unwrap();
        let victim = world.spawn_unit(NationId(2), UnitType::Warrior, GlobalCoord::new(2, 3)).unwrap();
        world.unit_mut(victim).unwrap().hp = 1;

        let outcome = world.attack(attacker, GlobalCoord::new(2, 3)).unwrap();
        match outcome {
            AttackOutcome::Unit(result) => assert!(result.defender_destroyed),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(world.unit(victim).is_err());
        assert_eq!(world.unit(attacker).unwrap().location, GlobalCoord::new(2, 2));
        assert!(world
            .log
            .events
            .iter()
            .any(|e| matches!(e.event, GameEvent::UnitDestroyed { unit, .. } if unit == victim)));
    }

    #[test]
    fn test_cannot_attack_own_units_or_empty_tiles() {
        let mut world = test_world();
        let a = world.spawn_unit(NationId(1), UnitType::Warrior, GlobalCoord::new(2, 2)).unwrap();
        world.spawn_unit(NationId(1), UnitType::Warrior, GlobalCoord::new(2, 3)).unwrap();
        assert!(matches!(
            world.attack(a, GlobalCoord::new(2, 3)),
            Err(WorldError::Movement(MoveError::NoTarget))
        ));
        assert!(matches!(
            world.attack(a, GlobalCoord::new(3, 2)),
            Err(WorldError::Movement(MoveError::NoTarget))
        ));
    }

    #[test]
    fn test_capture_city_moves_attacker_in() {
        let mut world = test_world();
        let city = world.found_city(NationId(2), "Target", GlobalCoord::new(4, 4)).unwrap();
        world.city_mut(city).unwrap().population = 5;
        world.city_mut(city).unwrap().hp = 3;
        let attacker = world.spawn_unit(NationId(1), UnitType::Swordsman, GlobalCoord::new(4, 5)).unwrap();

        let outcome = world.attack(attacker, GlobalCoord::new(4, 4)).unwrap();
        assert!(matches!(outcome, AttackOutcome::City { captured: true, .. }));

        let captured = world.city(city).unwrap();
        assert_eq!(captured.owner, NationId(1));
        assert!(captured.puppet);
        assert!(captured.hp > 0);
        assert_eq!(captured.hp, captured.max_hp() / 2);
        assert_eq!(captured.population, 4);
        for tile in &captured.territory {
            assert_eq!(world.layer.get(*tile).unwrap().owner_nation, Some(NationId(1)));
        }
        let unit = world.unit(attacker).unwrap();
        assert_eq!(unit.location, GlobalCoord::new(4, 4));
        assert!(unit.garrisoned);
    }

    #[test]
    fn test_pillage_and_repair_recompute_yields() {
        let mut world = test_world();
        let tile = GlobalCoord::new(1, 1);
        let bare = world.layer.get(tile).unwrap().yields;

        world.build_improvement(tile, Improvement::Farm).unwrap();
        assert_eq!(world.layer.get(tile).unwrap().yields.food, bare.food + 1);

        assert_eq!(world.pillage(tile).unwrap(), Improvement::Farm);
        assert_eq!(world.layer.get(tile).unwrap().yields, bare);
        assert!(world.pillage(tile).is_err());

        world.repair(tile).unwrap();
        assert_eq!(world.layer.get(tile).unwrap().yields.food, bare.food + 1);
    }

    #[test]
    fn test_fishing_boats_only_on_water() {
        let mut world = test_world();
        assert!(world.build_improvement(GlobalCoord::new(1, 1), Improvement::FishingBoats).is_err());
        assert!(world.build_improvement(GlobalCoord::new(7, 1), Improvement::FishingBoats).is_ok());
        assert!(world.build_improvement(GlobalCoord::new(7, 2), Improvement::Farm).is_err());
    }

    #[test]
    fn test_enqueue_rules() {
        let mut world = test_world();
        let inland = world.found_city(NationId(1), "Inland", GlobalCoord::new(1, 1)).unwrap();
        let port = world.found_city(NationId(1), "Port", GlobalCoord::new(6, 5)).unwrap();

        world.enqueue(inland, BuildItem::Building(crate::city::BuildingType::Library)).unwrap();
        assert!(world.enqueue(inland, BuildItem::Building(crate::city::BuildingType::Library)).is_err());
        assert!(world.enqueue(inland, BuildItem::Unit(UnitType::Trireme)).is_err());
        assert!(world.enqueue(port, BuildItem::Unit(UnitType::Trireme)).is_ok());
        assert!(matches!(
            world.enqueue(CityId(99), BuildItem::Unit(UnitType::Warrior)),
            Err(WorldError::UnknownCity(_))
        ));
    }
}
