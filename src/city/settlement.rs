//! Cities and their per-turn state machine
//!
//! A city is growing while its food surplus is positive and starving while
//! it is negative. Growth and starvation, production, border expansion and
//! healing are all advanced by `City::advance_turn`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::battle::constants::{
    CITY_BASE_HP, CITY_BASE_STRENGTH, CITY_STRENGTH_PER_POP, WALLS_HP_BONUS, WALLS_STRENGTH_BONUS,
};
use crate::city::building::BuildingType;
use crate::city::expansion::{expansion_candidates, workable_tiles, ExpansionPolicy};
use crate::city::production::{BuildItem, ProductionQueue};
use crate::core::config::SimulationRules;
use crate::core::types::{CityId, GlobalCoord, NationId, Yields};
use crate::worldgen::cells::RegionalCell;
use crate::worldgen::layer::RegionalLayer;

/// What happened to one city during a turn
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CityTurnReport {
    pub grew: bool,
    pub starved: bool,
    pub production_completed: bool,
    pub completed_item: Option<BuildItem>,
    pub expanded: bool,
    pub acquired_tile: Option<GlobalCoord>,
}

/// Result of applying one turn's food balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FoodOutcome {
    pub grew: bool,
    pub starved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
    pub owner: NationId,
    pub founder: NationId,
    pub location: GlobalCoord,

    /// Never below 1
    pub population: u32,
    pub stored_food: i32,
    /// Consecutive turns with a food deficit
    pub starving_turns: u32,

    pub culture: u32,
    pub tiles_acquired: u32,

    pub production: ProductionQueue,
    pub buildings: BTreeSet<BuildingType>,

    /// Claimed tiles, centre included
    pub territory: BTreeSet<GlobalCoord>,
    /// Tiles worked by citizens, centre excluded
    pub worked_tiles: Vec<GlobalCoord>,

    pub hp: u32,
    pub puppet: bool,
}

impl City {
    pub fn new(id: CityId, owner: NationId, name: String, location: GlobalCoord) -> Self {
        Self {
            id,
            name,
            owner,
            founder: owner,
            location,
            population: 1,
            stored_food: 0,
            starving_turns: 0,
            culture: 0,
            tiles_acquired: 0,
            production: ProductionQueue::new(),
            buildings: BTreeSet::new(),
            territory: BTreeSet::from([location]),
            worked_tiles: Vec::new(),
            hp: CITY_BASE_HP,
            puppet: false,
        }
    }

    pub fn has_building(&self, building: BuildingType) -> bool {
        self.buildings.contains(&building)
    }

    pub fn max_hp(&self) -> u32 {
        if self.has_building(BuildingType::Walls) {
            CITY_BASE_HP + WALLS_HP_BONUS
        } else {
            CITY_BASE_HP
        }
    }

    /// Defence strength before terrain
    pub fn defense_strength(&self) -> f64 {
        let walls = if self.has_building(BuildingType::Walls) {
            WALLS_STRENGTH_BONUS
        } else {
            0.0
        };
        CITY_BASE_STRENGTH + CITY_STRENGTH_PER_POP * self.population as f64 + walls
    }

    /// Yields of the centre tile, worked tiles and buildings
    ///
    /// The centre always yields at least one food and one production.
    pub fn gather_yields(&self, layer: &RegionalLayer) -> Yields {
        let centre = layer
            .get(self.location)
            .map(|c| c.yields)
            .unwrap_or(Yields::ZERO);
        let centre = Yields {
            food: centre.food.max(1),
            production: centre.production.max(1),
            ..centre
        };

        let worked: Yields = self
            .worked_tiles
            .iter()
            .filter_map(|t| layer.get(*t))
            .map(|c| c.yields)
            .sum();
        let buildings: Yields = self.buildings.iter().map(|b| b.yield_bonus()).sum();

        centre + worked + buildings
    }

    /// Food surplus after feeding every citizen
    pub fn food_surplus(&self, yields: &Yields, rules: &SimulationRules) -> i32 {
        yields.food - rules.food_per_citizen * self.population as i32
    }

    /// Apply one turn's food balance
    ///
    /// Growth resets stored food to zero. Starvation drains the store first;
    /// after `starvation_turns` consecutive deficits a citizen is lost, but
    /// never the last one.
    pub fn apply_food(&mut self, surplus: i32, rules: &SimulationRules) -> FoodOutcome {
        let mut outcome = FoodOutcome::default();

        if surplus >= 0 {
            self.starving_turns = 0;
            self.stored_food += surplus;
            if surplus > 0 && self.stored_food >= rules.growth_threshold(self.population) {
                self.population += 1;
                self.stored_food = 0;
                outcome.grew = true;
            }
            return outcome;
        }

        self.stored_food = (self.stored_food + surplus).max(0);
        self.starving_turns += 1;
        if self.starving_turns >= rules.starvation_turns {
            self.starving_turns = 0;
            if self.population > 1 {
                self.population -= 1;
                outcome.starved = true;
            }
        }
        outcome
    }

    /// Transfer the city to a conqueror
    ///
    /// A city only falls once its hit points are gone, so the conqueror
    /// takes it over at half its hit point pool. It becomes a puppet and
    /// loses a share of its population (floored, minimum 1). The queue is
    /// abandoned.
    pub fn conquer(&mut self, new_owner: NationId, rules: &SimulationRules) {
        self.owner = new_owner;
        self.hp = self.max_hp() / 2;
        self.puppet = true;
        let kept = (self.population as f64 * (1.0 - rules.conquest_population_loss)).floor() as u32;
        self.population = kept.max(1);
        self.worked_tiles.truncate(self.population as usize);
        self.production.clear();
        self.starving_turns = 0;
    }

    pub fn heal(&mut self, amount: u32) {
        self.hp = self.hp.saturating_add(amount).min(self.max_hp());
    }

    /// Claim a tile for this city and mark the cell
    pub fn claim_tile(&mut self, cell: &mut RegionalCell) {
        cell.owner_nation = Some(self.owner);
        cell.owner_city = Some(self.id);
        self.territory.insert(cell.global);
    }

    /// Keep one worked tile per citizen
    fn assign_workers(&mut self, layer: &RegionalLayer, policy: &dyn ExpansionPolicy) {
        self.worked_tiles
            .retain(|t| layer.get(*t).map(|c| c.owner_city == Some(self.id)).unwrap_or(false));

        while self.worked_tiles.len() > self.population as usize {
            self.worked_tiles.pop();
        }
        while self.worked_tiles.len() < self.population as usize {
            let open = workable_tiles(self);
            let cells: Vec<&RegionalCell> = open.iter().filter_map(|t| layer.get(*t)).collect();
            match policy.choose_worked_tile(self, &cells) {
                Some(tile) => self.worked_tiles.push(tile),
                None => break,
            }
        }
    }

    /// Accumulate culture and claim one tile when the threshold is met
    fn expand_borders(
        &mut self,
        culture: i32,
        layer: &mut RegionalLayer,
        rules: &SimulationRules,
        policy: &dyn ExpansionPolicy,
    ) -> Option<GlobalCoord> {
        self.culture += culture.max(0) as u32;
        let threshold = rules.expansion_threshold(self.tiles_acquired);
        if self.culture < threshold {
            return None;
        }

        let candidates = expansion_candidates(self, layer, rules);
        let cells: Vec<&RegionalCell> = candidates.iter().filter_map(|t| layer.get(*t)).collect();
        let Some(tile) = policy.choose_tile(self, &cells) else {
            // Nothing left to claim; hold at the threshold
            self.culture = threshold;
            return None;
        };

        let cell = layer.get_mut(tile)?;
        self.claim_tile(cell);
        self.culture -= threshold;
        self.tiles_acquired += 1;
        Some(tile)
    }

    /// Advance this city by one turn
    pub fn advance_turn(
        &mut self,
        layer: &mut RegionalLayer,
        rules: &SimulationRules,
        policy: &dyn ExpansionPolicy,
    ) -> CityTurnReport {
        self.assign_workers(layer, policy);
        let yields = self.gather_yields(layer);

        let food = self.apply_food(self.food_surplus(&yields, rules), rules);
        let completed = self.production.advance(yields.production);
        if let Some(BuildItem::Building(building)) = completed {
            self.buildings.insert(building);
        }

        // Every city generates one culture on its own
        let acquired = self.expand_borders(yields.culture + 1, layer, rules, policy);

        if food.grew || food.starved || acquired.is_some() {
            self.assign_workers(layer, policy);
        }
        self.heal(rules.city_heal);

        let report = CityTurnReport {
            grew: food.grew,
            starved: food.starved,
            production_completed: completed.is_some(),
            completed_item: completed,
            expanded: acquired.is_some(),
            acquired_tile: acquired,
        };

        if report.grew || report.starved || report.production_completed || report.expanded {
            tracing::debug!(
                "{} ({}): pop {}, grew={}, starved={}, built={:?}, claimed={:?}",
                self.name,
                self.id,
                self.population,
                report.grew,
                report.starved,
                report.completed_item,
                report.acquired_tile
            );
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::unit_type::UnitType;
    use crate::city::expansion::YieldWeightedPolicy;
    use crate::core::types::GridCoord;
    use crate::terrain::{HexYieldModel, Terrain};

    fn city() -> City {
        City::new(CityId(1), NationId(1), "Testville".into(), GlobalCoord::new(3, 3))
    }

    fn plains_layer() -> RegionalLayer {
        let mut cells = Vec::new();
        for y in 0..8 {
            for x in 0..8 {
                let mut cell = RegionalCell::new(
                    GridCoord::new(0, 0),
                    x as u32,
                    y as u32,
                    GlobalCoord::new(x, y),
                    Terrain::Grassland,
                    1,
                );
                HexYieldModel::recompute(&mut cell);
                cells.push(cell);
            }
        }
        RegionalLayer::assemble(1, 1, 8, vec![cells]).unwrap()
    }

    #[test]
    fn test_growth_scenario() {
        let rules = SimulationRules::default();
        let mut city = city();
        city.population = 3;
        city.stored_food = 30;

        let outcome = city.apply_food(5, &rules);
        assert!(outcome.grew);
        assert_eq!(city.population, 4);
        assert!(city.stored_food < rules.growth_threshold(4));
        assert_eq!(rules.growth_threshold(4), 39);
    }

    #[test]
    fn test_starvation_after_three_turns() {
        let rules = SimulationRules::default();
        let mut city = city();
        city.population = 3;
        city.stored_food = 0;

        assert!(!city.apply_food(-2, &rules).starved);
        assert!(!city.apply_food(-2, &rules).starved);
        assert!(city.apply_food(-2, &rules).starved);
        assert_eq!(city.population, 2);
        assert_eq!(city.starving_turns, 0);
    }

    #[test]
    fn test_surplus_breaks_starvation_streak() {
        let rules = SimulationRules::default();
        let mut city = city();
        city.population = 2;
        city.apply_food(-1, &rules);
        city.apply_food(-1, &rules);
        city.apply_food(0, &rules);
        assert_eq!(city.starving_turns, 0);
        city.apply_food(-1, &rules);
        assert_eq!(city.population, 2);
    }

    #[test]
    fn test_population_never_below_one() {
        let rules = SimulationRules::default();
        let mut city = city();
        for _ in 0..20 {
            assert!(!city.apply_food(-5, &rules).starved);
        }
        assert_eq!(city.population, 1);
    }

    #[test]
    fn test_conquest() {
        let rules = SimulationRules::default();
        let mut city = city();
        city.population = 7;
        city.hp = 0;
        city.production.push(BuildItem::Unit(UnitType::Warrior));
        city.conquer(NationId(9), &rules);

        assert_eq!(city.owner, NationId(9));
        assert_eq!(city.founder, NationId(1));
        assert_eq!(city.hp, CITY_BASE_HP / 2);
        assert!(city.puppet);
        // floor(7 × 0.8) = 5
        assert_eq!(city.population, 5);
        assert!(city.production.is_empty());

        let mut hamlet = City::new(CityId(2), NationId(1), "Hamlet".into(), GlobalCoord::new(0, 0));
        hamlet.conquer(NationId(9), &rules);
        assert_eq!(hamlet.population, 1);
    }

    #[test]
    fn test_walls_raise_defense_and_hp_cap() {
        let mut city = city();
        let before = city.defense_strength();
        city.buildings.insert(BuildingType::Walls);
        assert!(city.defense_strength() > before);
        city.heal(1000);
        assert_eq!(city.hp, CITY_BASE_HP + WALLS_HP_BONUS);
    }

    #[test]
    fn test_turn_works_tiles_and_completes_buildings() {
        let rules = SimulationRules::default();
        let policy = YieldWeightedPolicy::default();
        let mut layer = plains_layer();
        let mut city = city();
        {
            let centre = layer.get_mut(city.location).unwrap();
            city.claim_tile(centre);
        }
        for n in city.location.neighbors() {
            let cell = layer.get_mut(n).unwrap();
            city.claim_tile(cell);
        }
        city.production.push(BuildItem::Building(BuildingType::Monument));

        let mut built = false;
        for _ in 0..60 {
            let report = city.advance_turn(&mut layer, &rules, &policy);
            built |= report.completed_item == Some(BuildItem::Building(BuildingType::Monument));
        }
        assert!(built);
        assert!(city.has_building(BuildingType::Monument));
        assert!(city.population > 1);
        assert_eq!(city.worked_tiles.len(), city.population as usize);
    }

    #[test]
    fn test_culture_claims_adjacent_unowned_tile() {
        let rules = SimulationRules::default();
        let policy = YieldWeightedPolicy::default();
        let mut layer = plains_layer();
        let mut city = city();
        {
            let centre = layer.get_mut(city.location).unwrap();
            city.claim_tile(centre);
        }
        city.culture = rules.expansion_threshold(0);

        let report = city.advance_turn(&mut layer, &rules, &policy);
        assert!(report.expanded);
        let tile = report.acquired_tile.unwrap();
        assert_eq!(city.location.distance(&tile), 1);
        assert_eq!(layer.get(tile).unwrap().owner_city, Some(city.id));
        assert_eq!(city.tiles_acquired, 1);
    }

    #[test]
    fn test_culture_holds_at_threshold_when_boxed_in() {
        let rules = SimulationRules {
            max_city_radius: 1,
            ..Default::default()
        };
        let policy = YieldWeightedPolicy::default();
        let mut layer = plains_layer();
        let mut city = city();
        for tile in city.location.hexes_within(1) {
            let cell = layer.get_mut(tile).unwrap();
            city.claim_tile(cell);
        }
        city.culture = rules.expansion_threshold(0);

        for _ in 0..10 {
            let report = city.advance_turn(&mut layer, &rules, &policy);
            assert!(!report.expanded);
        }
        assert_eq!(city.culture, rules.expansion_threshold(0));
        assert_eq!(city.tiles_acquired, 0);
    }

    #[test]
    fn test_starvation_through_full_turns() {
        let rules = SimulationRules::default();
        let policy = YieldWeightedPolicy::default();
        let mut layer = plains_layer();
        let mut city = city();
        {
            let centre = layer.get_mut(city.location).unwrap();
            city.claim_tile(centre);
        }
        // No workable tiles: the centre alone cannot feed three citizens
        city.population = 3;
        city.stored_food = 3;

        let reports: Vec<CityTurnReport> = (0..3)
            .map(|_| city.advance_turn(&mut layer, &rules, &policy))
            .collect();
        assert!(!reports[0].starved && !reports[1].starved);
        assert!(reports[2].starved);
        assert!(reports.iter().all(|r| !r.grew));
        assert_eq!(city.population, 2);
        assert_eq!(city.stored_food, 0);
        assert_eq!(city.starving_turns, 0);
    }
}
