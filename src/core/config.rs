//! Generation and simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. The regional blend constants are
//! empirically tuned and meant for designer adjustment.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{Result, WorldError};

/// Configuration for terrain generation on both layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    // === REGIONAL LAYER ===
    /// Side length N of the N×N regional grid expanded from each planetary hex
    pub regional_scale: u32,

    /// Normalized distance from the hex centre inside which regional cells copy
    /// the parent terrain verbatim
    ///
    /// Distance is 0 at the centre and 1 at the middle of a hex edge.
    pub core_radius: f64,

    /// Blend factor above which a regional cell adopts the neighbouring
    /// planetary hex's terrain
    pub blend_threshold: f64,

    /// Blend factor above which a land/water transition uses the neighbour's
    /// terrain outright instead of inserting Coast
    ///
    /// Cells whose blend factor falls between `blend_threshold` and
    /// `coast_band` on a land/water boundary become Coast.
    pub coast_band: f64,

    /// Amplitude of the blend-noise perturbation added to the distance term
    ///
    /// Zero produces perfectly straight borders along hex edges.
    pub blend_noise_amplitude: f64,

    /// Resource noise samples below this cutoff carry no resource (top ~15%)
    pub resource_cutoff: f64,

    /// River ridge threshold for a bone-dry parent hex
    pub river_threshold: f64,

    /// How much a fully wet parent lowers the river threshold
    pub river_wetness_bonus: f64,

    // === PLANETARY LAYER ===
    /// Fraction of rows at each pole forced to glacier (minimum one row)
    pub polar_band: f64,

    /// Octaves used for the planetary elevation channel
    pub elevation_octaves: u32,

    /// Octaves used for temperature and moisture channels
    pub climate_octaves: u32,

    /// Base noise wavelength, in planetary cells
    pub planetary_noise_scale: f64,

    /// Base noise wavelength for regional channels, in regional cells
    pub regional_noise_scale: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            regional_scale: 12,
            core_radius: 0.5,
            blend_threshold: 0.55,
            coast_band: 0.75,
            blend_noise_amplitude: 0.25,
            resource_cutoff: 0.85,
            river_threshold: 0.96,
            river_wetness_bonus: 0.04,
            polar_band: 0.08,
            elevation_octaves: 4,
            climate_octaves: 3,
            planetary_noise_scale: 9.3,
            regional_noise_scale: 7.7,
        }
    }
}

impl GenerationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.regional_scale == 0 {
            return Err(WorldError::InvalidConfig("regional_scale must be positive".into()));
        }

        for (name, value) in [
            ("core_radius", self.core_radius),
            ("blend_threshold", self.blend_threshold),
            ("coast_band", self.coast_band),
            ("blend_noise_amplitude", self.blend_noise_amplitude),
            ("resource_cutoff", self.resource_cutoff),
            ("river_threshold", self.river_threshold),
            ("river_wetness_bonus", self.river_wetness_bonus),
            ("polar_band", self.polar_band),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(WorldError::InvalidConfig(format!(
                    "{} ({}) must lie in [0, 1]",
                    name, value
                )));
            }
        }

        if self.coast_band < self.blend_threshold {
            return Err(WorldError::InvalidConfig(format!(
                "coast_band ({}) should be >= blend_threshold ({})",
                self.coast_band, self.blend_threshold
            )));
        }

        if !(self.planetary_noise_scale > 0.0 && self.regional_noise_scale > 0.0) {
            return Err(WorldError::InvalidConfig("noise scales must be positive".into()));
        }

        if self.elevation_octaves == 0 || self.climate_octaves == 0 {
            return Err(WorldError::InvalidConfig("octave counts must be positive".into()));
        }

        Ok(())
    }
}

/// Rules driving the turn simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationRules {
    // === GROWTH ===
    /// Food needed to grow from population 1
    pub growth_base: i32,
    /// Extra food needed per additional citizen
    ///
    /// Threshold = growth_base + growth_per_pop × (population − 1).
    pub growth_per_pop: i32,
    /// Food each citizen eats per turn
    pub food_per_citizen: i32,
    /// Consecutive starving turns before a citizen is lost
    pub starvation_turns: u32,

    // === CULTURE ===
    /// Culture needed for the first border expansion
    pub expansion_base: u32,
    /// Extra culture needed per tile already acquired
    pub expansion_step: u32,
    /// Maximum hex distance from the city centre a city may claim
    pub max_city_radius: u32,

    // === COMBAT ===
    /// Damage dealt between equally matched units
    pub base_damage: f64,
    /// Strength difference that scales damage by a factor of e
    pub strength_divisor: f64,
    /// Fraction of the mirrored damage returned as counter-damage
    pub counter_scale: f64,
    /// Defence bonus per fortified turn
    pub fortify_per_turn: f64,
    /// Cap on the fortification defence bonus
    pub fortify_cap: f64,
    /// Hit points restored to fortified or garrisoned units each turn
    pub unit_heal: u32,
    /// Hit points restored to cities each turn
    pub city_heal: u32,
    /// Fraction of population lost when a city is conquered
    pub conquest_population_loss: f64,
}

impl Default for SimulationRules {
    fn default() -> Self {
        Self {
            growth_base: 15,
            growth_per_pop: 8,
            food_per_citizen: 2,
            starvation_turns: 3,

            expansion_base: 20,
            expansion_step: 10,
            max_city_radius: 3,

            base_damage: 30.0,
            strength_divisor: 25.0,
            counter_scale: 0.7,
            fortify_per_turn: 0.05,
            fortify_cap: 0.20,
            unit_heal: 10,
            city_heal: 20,
            conquest_population_loss: 0.2,
        }
    }
}

impl SimulationRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let rules: Self = toml::from_str(content)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Food needed to grow past `population`
    pub fn growth_threshold(&self, population: u32) -> i32 {
        self.growth_base + self.growth_per_pop * (population.max(1) as i32 - 1)
    }

    /// Culture needed for the next border expansion
    pub fn expansion_threshold(&self, tiles_acquired: u32) -> u32 {
        self.expansion_base + self.expansion_step * tiles_acquired
    }

    pub fn validate(&self) -> Result<()> {
        if self.growth_base <= 0 || self.growth_per_pop <= 0 {
            return Err(WorldError::InvalidConfig(
                "growth thresholds must strictly increase with population".into(),
            ));
        }
        if self.starvation_turns == 0 {
            return Err(WorldError::InvalidConfig("starvation_turns must be positive".into()));
        }
        if !(self.strength_divisor > 0.0) {
            return Err(WorldError::InvalidConfig("strength_divisor must be positive".into()));
        }
        if !(self.base_damage.is_finite() && self.base_damage >= 0.0) {
            return Err(WorldError::InvalidConfig("base_damage must be non-negative".into()));
        }
        if self.food_per_citizen < 0 {
            return Err(WorldError::InvalidConfig("food_per_citizen must be non-negative".into()));
        }
        if self.expansion_base == 0 {
            return Err(WorldError::InvalidConfig("expansion_base must be positive".into()));
        }
        for (name, value) in [
            ("counter_scale", self.counter_scale),
            ("fortify_per_turn", self.fortify_per_turn),
            ("fortify_cap", self.fortify_cap),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(WorldError::InvalidConfig(format!(
                    "{} ({}) must lie in [0, 1]",
                    name, value
                )));
            }
        }
        if !(0.0..1.0).contains(&self.conquest_population_loss) {
            return Err(WorldError::InvalidConfig(
                "conquest_population_loss must lie in [0, 1)".into(),
            ));
        }
        Ok(())
    }
}
