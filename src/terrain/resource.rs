//! Map resources: strategic, luxury and bonus

use serde::{Deserialize, Serialize};

use crate::terrain::kinds::Terrain;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategicResource {
    Iron,
    Horses,
    Coal,
    Oil,
    Aluminum,
    Uranium,
    Niter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LuxuryResource {
    Gold,
    Silver,
    Gems,
    Spices,
    Silk,
    Furs,
    Ivory,
    Dyes,
    Pearls,
    Wine,
    Obsidian,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusResource {
    Wheat,
    Cattle,
    Deer,
    Fish,
    Stone,
    Bananas,
    Sheep,
}

/// Rarity tier chosen from the resource noise sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceTier {
    Bonus,
    Luxury,
    Strategic,
}

/// Fixed terrain → strategic resource mapping
pub fn strategic_for(terrain: Terrain) -> Option<StrategicResource> {
    match terrain {
        Terrain::Grassland | Terrain::Plains | Terrain::Savanna => Some(StrategicResource::Horses),
        Terrain::Hills => Some(StrategicResource::Iron),
        Terrain::Mountains => Some(StrategicResource::Coal),
        Terrain::Desert | Terrain::Dunes | Terrain::Swamp => Some(StrategicResource::Oil),
        Terrain::Tundra | Terrain::Snow => Some(StrategicResource::Aluminum),
        Terrain::Barren | Terrain::Glacier => Some(StrategicResource::Uranium),
        Terrain::Ash | Terrain::Volcanic => Some(StrategicResource::Niter),
        Terrain::Ocean | Terrain::Coast | Terrain::Lake | Terrain::Jungle => None,
    }
}

/// Luxury pool available on a terrain
pub fn luxury_pool(terrain: Terrain) -> &'static [LuxuryResource] {
    use LuxuryResource::*;
    match terrain {
        Terrain::Coast | Terrain::Ocean | Terrain::Lake => &[Pearls],
        Terrain::Grassland | Terrain::Plains => &[Wine, Silk, Dyes],
        Terrain::Savanna => &[Ivory, Spices],
        Terrain::Jungle | Terrain::Swamp => &[Spices, Dyes, Silk],
        Terrain::Desert | Terrain::Dunes => &[Gold, Gems],
        Terrain::Tundra | Terrain::Snow | Terrain::Glacier => &[Furs, Silver],
        Terrain::Hills | Terrain::Mountains => &[Gold, Silver, Gems],
        Terrain::Volcanic | Terrain::Ash => &[Obsidian, Gems],
        Terrain::Barren => &[Silver],
    }
}

/// Bonus pool available on a terrain
pub fn bonus_pool(terrain: Terrain) -> &'static [BonusResource] {
    use BonusResource::*;
    match terrain {
        Terrain::Coast | Terrain::Ocean | Terrain::Lake => &[Fish],
        Terrain::Grassland => &[Wheat, Cattle, Sheep],
        Terrain::Plains | Terrain::Savanna => &[Wheat, Cattle],
        Terrain::Jungle => &[Bananas],
        Terrain::Swamp => &[Deer],
        Terrain::Tundra | Terrain::Snow => &[Deer],
        Terrain::Hills => &[Sheep, Stone],
        Terrain::Desert | Terrain::Dunes | Terrain::Barren | Terrain::Ash => &[Stone],
        Terrain::Glacier | Terrain::Mountains | Terrain::Volcanic => &[],
    }
}
