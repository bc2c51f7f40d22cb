//! Cell records for the planetary and regional layers

use serde::{Deserialize, Serialize};

use crate::core::types::{CityId, ContinentId, GlobalCoord, GridCoord, NationId, Yields};
use crate::spatial::hex::HexDirection;
use crate::terrain::{
    BonusResource, Feature, Improvement, LuxuryResource, StrategicResource, Terrain, IMPASSABLE_COST,
};

/// One hex of the coarse planetary layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetaryCell {
    pub coord: GridCoord,
    /// Elevation band, 0 = water
    pub elevation: u8,
    /// 0 (frozen) to 100 (scorching)
    pub temperature: f32,
    /// 0 (saturated) to 100 (arid)
    pub dryness: f32,
    pub terrain: Terrain,
    /// Filled in after continent detection
    pub continent: Option<ContinentId>,
}

impl PlanetaryCell {
    pub fn is_land(&self) -> bool {
        self.terrain.is_land()
    }
}

/// Set of hex edges a river runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RiverEdges(u8);

impl RiverEdges {
    pub fn insert(&mut self, dir: HexDirection) {
        self.0 |= 1 << dir.index();
    }

    pub fn contains(&self, dir: HexDirection) -> bool {
        self.0 & (1 << dir.index()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = HexDirection> + '_ {
        HexDirection::ALL.into_iter().filter(|d| self.contains(*d))
    }
}

/// One hex of the fine regional layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalCell {
    /// Planetary hex this cell was expanded from
    pub parent: GridCoord,
    pub local_x: u32,
    pub local_y: u32,
    pub global: GlobalCoord,

    pub terrain: Terrain,
    pub elevation: u8,
    pub feature: Feature,

    /// Raw river noise verdict, kept so connection can be re-run
    pub river_candidate: bool,
    pub has_river: bool,
    pub river_sides: RiverEdges,

    pub strategic: Option<StrategicResource>,
    pub luxury: Option<LuxuryResource>,
    pub bonus: Option<BonusResource>,

    pub improvement: Option<Improvement>,
    pub pillaged: bool,

    // Derived by HexYieldModel
    pub yields: Yields,
    pub defense_bonus: i32,
    pub movement_cost: u32,
    pub impassable: bool,

    pub coastal: bool,

    // Back-references only; cities and units are owned by the simulation
    pub owner_nation: Option<NationId>,
    pub owner_city: Option<CityId>,
}

impl RegionalCell {
    pub fn new(
        parent: GridCoord,
        local_x: u32,
        local_y: u32,
        global: GlobalCoord,
        terrain: Terrain,
        elevation: u8,
    ) -> Self {
        Self {
            parent,
            local_x,
            local_y,
            global,
            terrain,
            elevation,
            feature: Feature::None,
            river_candidate: false,
            has_river: false,
            river_sides: RiverEdges::default(),
            strategic: None,
            luxury: None,
            bonus: None,
            improvement: None,
            pillaged: false,
            yields: Yields::ZERO,
            defense_bonus: 0,
            movement_cost: IMPASSABLE_COST,
            impassable: terrain.is_impassable(),
            coastal: false,
            owner_nation: None,
            owner_city: None,
        }
    }

    pub fn has_resource(&self) -> bool {
        self.strategic.is_some() || self.luxury.is_some() || self.bonus.is_some()
    }

    pub fn is_water(&self) -> bool {
        self.terrain.is_water()
    }
}
