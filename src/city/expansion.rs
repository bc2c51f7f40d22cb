//! Culture-driven border expansion and tile selection
//!
//! Which tile a city claims (and which tiles its citizens work) is a
//! pluggable policy; the engine only supplies the legal candidates.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use ordered_float::OrderedFloat;

use crate::city::settlement::City;
use crate::core::config::SimulationRules;
use crate::core::types::GlobalCoord;
use crate::worldgen::cells::RegionalCell;
use crate::worldgen::layer::RegionalLayer;

/// Strategy for claiming and working tiles
pub trait ExpansionPolicy: Send + Sync {
    /// Desirability of a tile for this city; higher is better
    fn score(&self, city: &City, tile: &RegionalCell) -> f64;

    /// Pick the tile to claim; candidates are sorted by coordinate
    fn choose_tile(&self, city: &City, candidates: &[&RegionalCell]) -> Option<GlobalCoord> {
        best_by_score(candidates, |tile| self.score(city, tile))
    }

    /// Pick the next tile for a new citizen to work
    fn choose_worked_tile(&self, city: &City, candidates: &[&RegionalCell]) -> Option<GlobalCoord> {
        best_by_score(candidates, |tile| self.score(city, tile))
    }
}

/// Highest score wins; ties go to the smallest coordinate
fn best_by_score<F>(candidates: &[&RegionalCell], score: F) -> Option<GlobalCoord>
where
    F: Fn(&RegionalCell) -> f64,
{
    candidates
        .iter()
        .max_by_key(|tile| (OrderedFloat(score(tile)), Reverse(tile.global)))
        .map(|tile| tile.global)
}

/// Weighs each yield, favours resources and penalizes distance from the centre
#[derive(Debug, Clone, PartialEq)]
pub struct YieldWeightedPolicy {
    pub food: f64,
    pub production: f64,
    pub gold: f64,
    pub science: f64,
    pub culture: f64,
    pub resource_bonus: f64,
    pub distance_penalty: f64,
}

impl Default for YieldWeightedPolicy {
    fn default() -> Self {
        Self {
            food: 3.0,
            production: 2.0,
            gold: 1.0,
            science: 1.0,
            culture: 1.0,
            resource_bonus: 2.0,
            distance_penalty: 1.0,
        }
    }
}

impl ExpansionPolicy for YieldWeightedPolicy {
    fn score(&self, city: &City, tile: &RegionalCell) -> f64 {
        let y = tile.yields;
        let mut score = self.food * y.food as f64
            + self.production * y.production as f64
            + self.gold * y.gold as f64
            + self.science * y.science as f64
            + self.culture * y.culture as f64;
        if tile.has_resource() {
            score += self.resource_bonus;
        }
        score - self.distance_penalty * city.location.distance(&tile.global) as f64
    }
}

/// Unclaimed tiles touching the city's territory within its radius
pub fn expansion_candidates(city: &City, layer: &RegionalLayer, rules: &SimulationRules) -> Vec<GlobalCoord> {
    let mut candidates = BTreeSet::new();
    for owned in &city.territory {
        for n in owned.neighbors() {
            if city.territory.contains(&n) || city.location.distance(&n) > rules.max_city_radius {
                continue;
            }
            if let Some(cell) = layer.get(n) {
                if cell.owner_nation.is_none() && cell.owner_city.is_none() {
                    candidates.insert(n);
                }
            }
        }
    }
    candidates.into_iter().collect()
}

/// Territory tiles not yet worked, excluding the centre
pub fn workable_tiles(city: &City) -> Vec<GlobalCoord> {
    city.territory
        .iter()
        .filter(|t| **t != city.location && !city.worked_tiles.contains(t))
        .copied()
        .collect()
}
