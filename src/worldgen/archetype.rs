//! Planet archetypes, size bands and the planet descriptor

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::error::WorldError;
use crate::terrain::Terrain;

/// Thematic terrain profile of a planet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PlanetArchetype {
    #[default]
    EarthLike,
    Desert,
    Ice,
    Jungle,
    Water,
    Volcanic,
    Barren,
}

/// How raw elevation is shaped into landmasses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinentShape {
    /// One central landmass fading toward the map edge
    Radial,
    /// Large continental noise blended with medium detail
    MultiContinent,
    /// Unmodified noise: archipelagos or patchy land
    Scattered,
}

impl PlanetArchetype {
    pub const ALL: [PlanetArchetype; 7] = [
        PlanetArchetype::EarthLike,
        PlanetArchetype::Desert,
        PlanetArchetype::Ice,
        PlanetArchetype::Jungle,
        PlanetArchetype::Water,
        PlanetArchetype::Volcanic,
        PlanetArchetype::Barren,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PlanetArchetype::EarthLike => "earthlike",
            PlanetArchetype::Desert => "desert",
            PlanetArchetype::Ice => "ice",
            PlanetArchetype::Jungle => "jungle",
            PlanetArchetype::Water => "water",
            PlanetArchetype::Volcanic => "volcanic",
            PlanetArchetype::Barren => "barren",
        }
    }

    pub fn continent_shape(self) -> ContinentShape {
        match self {
            PlanetArchetype::EarthLike | PlanetArchetype::Desert => ContinentShape::MultiContinent,
            PlanetArchetype::Jungle | PlanetArchetype::Volcanic => ContinentShape::Radial,
            PlanetArchetype::Water | PlanetArchetype::Ice | PlanetArchetype::Barren => {
                ContinentShape::Scattered
            }
        }
    }

    /// Land-dominant planets keep land on the map border
    pub fn is_land_dominant(self) -> bool {
        matches!(
            self,
            PlanetArchetype::Desert | PlanetArchetype::Barren | PlanetArchetype::Volcanic
        )
    }

    /// Elevation (0..1) below which a cell is water, before seed jitter
    pub fn base_water_threshold(self) -> f64 {
        match self {
            PlanetArchetype::EarthLike => 0.52,
            PlanetArchetype::Water => 0.66,
            PlanetArchetype::Jungle => 0.40,
            PlanetArchetype::Desert => 0.25,
            PlanetArchetype::Ice => 0.35,
            PlanetArchetype::Volcanic => 0.35,
            PlanetArchetype::Barren => 0.20,
        }
    }

    /// Equatorial temperature (0..100)
    pub fn base_temperature(self) -> f64 {
        match self {
            PlanetArchetype::EarthLike | PlanetArchetype::Water => 62.0,
            PlanetArchetype::Desert => 85.0,
            PlanetArchetype::Ice => 15.0,
            PlanetArchetype::Jungle => 80.0,
            PlanetArchetype::Volcanic => 90.0,
            PlanetArchetype::Barren => 50.0,
        }
    }

    /// Temperature lost between equator and pole
    pub fn latitude_coefficient(self) -> f64 {
        match self {
            PlanetArchetype::EarthLike => 60.0,
            PlanetArchetype::Water => 55.0,
            PlanetArchetype::Desert | PlanetArchetype::Ice => 30.0,
            PlanetArchetype::Jungle => 25.0,
            PlanetArchetype::Volcanic => 20.0,
            PlanetArchetype::Barren => 45.0,
        }
    }

    /// Average dryness (0..100)
    pub fn base_dryness(self) -> f64 {
        match self {
            PlanetArchetype::EarthLike => 45.0,
            PlanetArchetype::Desert => 85.0,
            PlanetArchetype::Ice => 60.0,
            PlanetArchetype::Jungle => 15.0,
            PlanetArchetype::Water => 30.0,
            PlanetArchetype::Volcanic => 70.0,
            PlanetArchetype::Barren => 90.0,
        }
    }

    /// Chance scale for vegetation features on the regional layer
    pub fn vegetation_density(self) -> f64 {
        match self {
            PlanetArchetype::EarthLike => 0.35,
            PlanetArchetype::Water => 0.40,
            PlanetArchetype::Jungle => 0.70,
            PlanetArchetype::Desert => 0.05,
            PlanetArchetype::Ice => 0.45,
            PlanetArchetype::Volcanic => 0.0,
            PlanetArchetype::Barren => 0.02,
        }
    }

    /// Terrain palette used to validate themed output
    pub fn palette(self) -> Option<&'static [Terrain]> {
        use Terrain::*;
        match self {
            PlanetArchetype::Ice => Some(&[Ocean, Coast, Glacier, Snow, Tundra, Mountains]),
            PlanetArchetype::Desert => Some(&[Ocean, Coast, Desert, Dunes, Plains, Hills, Mountains, Glacier]),
            PlanetArchetype::Jungle => Some(&[Ocean, Coast, Jungle, Swamp, Savanna, Hills, Mountains, Glacier]),
            PlanetArchetype::Volcanic => Some(&[Ocean, Coast, Volcanic, Ash, Barren, Mountains, Glacier]),
            PlanetArchetype::Barren => Some(&[Ocean, Coast, Barren, Snow, Hills, Mountains, Glacier]),
            PlanetArchetype::EarthLike | PlanetArchetype::Water => None,
        }
    }

    /// Lenient lookup that accepts planet colour keys
    ///
    /// Unknown keys resolve to EarthLike; the miss is logged and counted.
    pub fn from_key_or_default(key: &str, fallbacks: &FallbackCounter) -> Self {
        if let Ok(archetype) = key.parse() {
            return archetype;
        }
        let alias = match key.trim().to_ascii_lowercase().as_str() {
            "blue" => Some(PlanetArchetype::Water),
            "white" => Some(PlanetArchetype::Ice),
            "red" | "orange" => Some(PlanetArchetype::Volcanic),
            "green" => Some(PlanetArchetype::Jungle),
            "tan" | "yellow" => Some(PlanetArchetype::Desert),
            "grey" | "gray" | "brown" => Some(PlanetArchetype::Barren),
            _ => None,
        };
        alias.unwrap_or_else(|| {
            fallbacks.record("planet archetype", key, PlanetArchetype::default().name());
            PlanetArchetype::default()
        })
    }
}

impl FromStr for PlanetArchetype {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        PlanetArchetype::ALL
            .into_iter()
            .find(|a| a.name() == lower)
            .ok_or_else(|| WorldError::UnknownArchetype(s.to_string()))
    }
}

/// Size band controlling grid dimensions and elevation variance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PlanetSize {
    Tiny,
    Small,
    #[default]
    Medium,
    Large,
    Huge,
}

impl PlanetSize {
    /// Planetary grid (width, height)
    pub fn dimensions(self) -> (i32, i32) {
        match self {
            PlanetSize::Tiny => (20, 20),
            PlanetSize::Small => (28, 28),
            PlanetSize::Medium => (36, 36),
            PlanetSize::Large => (48, 48),
            PlanetSize::Huge => (60, 60),
        }
    }

    /// Multiplier on elevation deviation from the midpoint
    pub fn elevation_variance(self) -> f64 {
        match self {
            PlanetSize::Tiny => 0.8,
            PlanetSize::Small => 0.9,
            PlanetSize::Medium => 1.0,
            PlanetSize::Large => 1.1,
            PlanetSize::Huge => 1.2,
        }
    }
}

impl FromStr for PlanetSize {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tiny" => Ok(PlanetSize::Tiny),
            "small" => Ok(PlanetSize::Small),
            "medium" => Ok(PlanetSize::Medium),
            "large" => Ok(PlanetSize::Large),
            "huge" => Ok(PlanetSize::Huge),
            other => Err(WorldError::InvalidConfig(format!("unknown planet size: {}", other))),
        }
    }
}

/// What the external planet entity supplies to the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetDescriptor {
    pub archetype: PlanetArchetype,
    pub seed: u64,
    pub size: PlanetSize,
}

impl PlanetDescriptor {
    pub fn new(archetype: PlanetArchetype, seed: u64, size: PlanetSize) -> Self {
        Self {
            archetype,
            seed,
            size,
        }
    }
}

/// Counts lookups that fell back to a named default
#[derive(Debug, Default)]
pub struct FallbackCounter {
    count: AtomicU64,
}

impl FallbackCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, what: &str, key: &str, default: &str) {
        self.count.fetch_add(1, Ordering::Relaxed);
        tracing::warn!("Unrecognized {} key {:?}, falling back to {}", what, key, default);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

/// Terrain key lookup with a counted Grassland fallback
pub fn terrain_or_default(key: &str, fallbacks: &FallbackCounter) -> Terrain {
    key.parse().unwrap_or_else(|_| {
        fallbacks.record("terrain", key, Terrain::Grassland.name());
        Terrain::Grassland
    })
}
