//! Compact persistence for a generated planet
//!
//! Only the planetary grid, the generation config and per-tile simulation
//! overlays are stored. The regional layer is regenerated on restore.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::config::GenerationConfig;
use crate::core::error::Result;
use crate::core::types::{CityId, GlobalCoord, NationId};
use crate::terrain::Improvement;
use crate::worldgen::layer::RegionalLayer;
use crate::worldgen::planetary::PlanetaryGrid;

/// Simulation-owned state layered on top of a generated tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TileOverlay {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_nation: Option<NationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_city: Option<CityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improvement: Option<Improvement>,
    #[serde(default)]
    pub pillaged: bool,
}

impl TileOverlay {
    pub fn is_empty(&self) -> bool {
        *self == TileOverlay::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetSnapshot {
    pub config: GenerationConfig,
    pub planet: PlanetaryGrid,
    /// Non-empty overlays keyed by `"x,y"`
    pub overlays: BTreeMap<String, TileOverlay>,
}

impl PlanetSnapshot {
    pub fn capture(config: &GenerationConfig, planet: &PlanetaryGrid, layer: &RegionalLayer) -> Self {
        let overlays = layer
            .iter()
            .filter_map(|cell| {
                let overlay = TileOverlay {
                    owner_nation: cell.owner_nation,
                    owner_city: cell.owner_city,
                    improvement: cell.improvement,
                    pillaged: cell.pillaged,
                };
                (!overlay.is_empty()).then(|| (cell.global.to_string(), overlay))
            })
            .collect();

        Self {
            config: config.clone(),
            planet: planet.clone(),
            overlays,
        }
    }

    /// Regenerate the regional layer and reapply overlays
    ///
    /// Malformed or out-of-range keys are skipped with a warning.
    pub fn restore_layer(&self) -> Result<RegionalLayer> {
        let mut layer = RegionalLayer::regenerate(&self.planet, &self.config)?;

        for (key, overlay) in &self.overlays {
            let coord: GlobalCoord = match key.parse() {
                Ok(coord) => coord,
                Err(e) => {
                    tracing::warn!("Skipping overlay: {}", e);
                    continue;
                }
            };
            let Some(cell) = layer.get_mut(coord) else {
                tracing::warn!("Skipping overlay for off-layer tile {}", coord);
                continue;
            };
            cell.owner_nation = overlay.owner_nation;
            cell.owner_city = overlay.owner_city;
            cell.improvement = overlay.improvement;
            cell.pillaged = overlay.pillaged;
            layer.recompute(coord)?;
        }

        Ok(layer)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and check a snapshot; a malformed grid or config is an error
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;
        self.planet.validate()
    }
}
