//! Yield and combat-modifier derivation for a single hex
//!
//! `HexYieldModel::recompute` is a pure rebuild from the cell's terrain,
//! feature, river, improvement and pillage state. It never runs on its own:
//! whoever mutates one of those inputs must call it afterwards.

use crate::core::types::Yields;
use crate::terrain::feature::Feature;
use crate::terrain::kinds::Terrain;
use crate::worldgen::cells::RegionalCell;

/// Movement cost of a tile land units cannot enter
pub const IMPASSABLE_COST: u32 = u32::MAX;

/// Flat gold bonus for a tile with a river
pub const RIVER_GOLD: i32 = 1;

pub struct HexYieldModel;

impl HexYieldModel {
    /// Fixed per-terrain base yields
    pub fn base_yields(terrain: Terrain) -> Yields {
        match terrain {
            Terrain::Ocean | Terrain::Coast => Yields::new(1, 0, 1),
            Terrain::Lake => Yields::new(2, 0, 1),
            Terrain::Grassland => Yields::new(2, 0, 0),
            Terrain::Plains | Terrain::Savanna => Yields::new(1, 1, 0),
            Terrain::Jungle | Terrain::Swamp | Terrain::Tundra => Yields::new(1, 0, 0),
            Terrain::Hills => Yields::new(0, 2, 0),
            Terrain::Ash | Terrain::Barren => Yields::new(0, 1, 0),
            Terrain::Desert
            | Terrain::Dunes
            | Terrain::Snow
            | Terrain::Glacier
            | Terrain::Mountains
            | Terrain::Volcanic => Yields::ZERO,
        }
    }

    /// Terrain defence bonus in percent
    pub fn terrain_defense(terrain: Terrain) -> i32 {
        match terrain {
            Terrain::Hills | Terrain::Mountains => 25,
            Terrain::Swamp => 10,
            Terrain::Jungle => 15,
            _ => 0,
        }
    }

    /// Terrain movement cost for land units
    pub fn terrain_movement(terrain: Terrain) -> u32 {
        if terrain.is_impassable() {
            return IMPASSABLE_COST;
        }
        match terrain {
            Terrain::Hills | Terrain::Swamp | Terrain::Jungle | Terrain::Dunes => 2,
            Terrain::Glacier => 2,
            _ => 1,
        }
    }

    /// Rebuild yields, defence and movement cost from scratch
    pub fn recompute(cell: &mut RegionalCell) {
        let mut yields = Yields::ZERO;
        yields += Self::base_yields(cell.terrain);
        yields += cell.feature.yield_modifier();
        if cell.has_river {
            yields.gold += RIVER_GOLD;
        }

        let mut defense = Self::terrain_defense(cell.terrain) + cell.feature.defense_bonus();

        if let Some(improvement) = cell.improvement {
            if !cell.pillaged {
                yields += improvement.yield_bonus();
                defense += improvement.defense_bonus();
            }
        }

        cell.yields = yields.non_negative();
        cell.defense_bonus = defense;

        cell.impassable = cell.terrain.is_impassable();
        cell.movement_cost = if cell.impassable {
            IMPASSABLE_COST
        } else {
            Self::terrain_movement(cell.terrain).max(cell.feature.movement_cost())
        };
    }

    /// Yields a bare terrain would give, used for planetary summaries
    pub fn terrain_only(terrain: Terrain, feature: Feature) -> Yields {
        (Self::base_yields(terrain) + feature.yield_modifier()).non_negative()
    }
}
