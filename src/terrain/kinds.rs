//! Terrain types shared by the planetary and regional layers

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Primary terrain type of a hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Terrain {
    #[default]
    Ocean,
    Coast,
    Lake,
    Grassland,
    Plains,
    Savanna,
    Jungle,
    Swamp,
    Desert,
    Dunes,
    Tundra,
    Snow,
    Glacier,
    Hills,
    Mountains,
    Volcanic, // Active lava fields
    Ash,
    Barren,
}

/// Terrains considered interchangeable when blending across hex borders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainGroup {
    Water,
    Grass,
    Jungle,
    Desert,
    Mountain,
    Cold,
    Volcanic,
    Barren,
}

impl Terrain {
    pub const ALL: [Terrain; 18] = [
        Terrain::Ocean,
        Terrain::Coast,
        Terrain::Lake,
        Terrain::Grassland,
        Terrain::Plains,
        Terrain::Savanna,
        Terrain::Jungle,
        Terrain::Swamp,
        Terrain::Desert,
        Terrain::Dunes,
        Terrain::Tundra,
        Terrain::Snow,
        Terrain::Glacier,
        Terrain::Hills,
        Terrain::Mountains,
        Terrain::Volcanic,
        Terrain::Ash,
        Terrain::Barren,
    ];

    pub fn group(self) -> TerrainGroup {
        match self {
            Terrain::Ocean | Terrain::Coast | Terrain::Lake => TerrainGroup::Water,
            Terrain::Grassland | Terrain::Plains | Terrain::Savanna => TerrainGroup::Grass,
            Terrain::Jungle | Terrain::Swamp => TerrainGroup::Jungle,
            Terrain::Desert | Terrain::Dunes => TerrainGroup::Desert,
            Terrain::Hills | Terrain::Mountains => TerrainGroup::Mountain,
            Terrain::Tundra | Terrain::Snow | Terrain::Glacier => TerrainGroup::Cold,
            Terrain::Volcanic | Terrain::Ash => TerrainGroup::Volcanic,
            Terrain::Barren => TerrainGroup::Barren,
        }
    }

    pub fn is_water(self) -> bool {
        self.group() == TerrainGroup::Water
    }

    pub fn is_land(self) -> bool {
        !self.is_water()
    }

    /// Same similarity group: no blending happens between these
    pub fn is_similar(self, other: Terrain) -> bool {
        self.group() == other.group()
    }

    /// Impassable for land units regardless of features
    pub fn is_impassable(self) -> bool {
        matches!(self, Terrain::Mountains | Terrain::Volcanic) || self.is_water()
    }

    /// Terrain that never carries vegetation or ice features
    pub fn forbids_features(self) -> bool {
        self.is_water() || matches!(self, Terrain::Mountains | Terrain::Volcanic)
    }

    pub fn name(self) -> &'static str {
        match self {
            Terrain::Ocean => "ocean",
            Terrain::Coast => "coast",
            Terrain::Lake => "lake",
            Terrain::Grassland => "grassland",
            Terrain::Plains => "plains",
            Terrain::Savanna => "savanna",
            Terrain::Jungle => "jungle",
            Terrain::Swamp => "swamp",
            Terrain::Desert => "desert",
            Terrain::Dunes => "dunes",
            Terrain::Tundra => "tundra",
            Terrain::Snow => "snow",
            Terrain::Glacier => "glacier",
            Terrain::Hills => "hills",
            Terrain::Mountains => "mountains",
            Terrain::Volcanic => "volcanic",
            Terrain::Ash => "ash",
            Terrain::Barren => "barren",
        }
    }
}

impl FromStr for Terrain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Terrain::ALL
            .into_iter()
            .find(|t| t.name() == lower)
            .ok_or_else(|| format!("unknown terrain: {}", s))
    }
}
