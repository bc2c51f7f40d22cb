//! Full-planet generation: classify, label, expand in parallel, reconcile

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;

use crate::core::config::GenerationConfig;
use crate::core::error::{Result, WorldError};
use crate::core::types::GridCoord;
use crate::worldgen::archetype::PlanetDescriptor;
use crate::worldgen::cells::RegionalCell;
use crate::worldgen::continents::{ContinentDetector, ContinentGroup};
use crate::worldgen::layer::RegionalLayer;
use crate::worldgen::planetary::{generate_for_descriptor, PlanetaryGrid};
use crate::worldgen::regional::RegionalHexExpander;

/// Cooperative cancellation flag shared with a running generation
///
/// Checked before each planetary-hex work unit, never mid-cell.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Everything generated for one planet
#[derive(Debug, Clone)]
pub struct GeneratedWorld {
    pub planet: PlanetaryGrid,
    pub continents: Vec<ContinentGroup>,
    pub regional: RegionalLayer,
}

pub struct WorldGenerator {
    config: GenerationConfig,
    cancel: CancellationToken,
}

impl WorldGenerator {
    pub fn new(config: GenerationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cancel: CancellationToken::new(),
        })
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn generate(&self, descriptor: &PlanetDescriptor) -> Result<GeneratedWorld> {
        let start = Instant::now();

        let mut planet = generate_for_descriptor(descriptor, &self.config)?;
        let continents = ContinentDetector::detect_and_label(&mut planet);
        let regional = self.expand(&planet)?;

        tracing::info!(
            "Generated {} planet (seed {}): {}x{} hexes, {} landmasses, {} regional cells in {:?}",
            descriptor.archetype.name(),
            descriptor.seed,
            planet.width,
            planet.height,
            continents.len(),
            regional.len(),
            start.elapsed()
        );

        Ok(GeneratedWorld {
            planet,
            continents,
            regional,
        })
    }

    /// Expand every planetary hex, then reconcile and annotate the layer
    ///
    /// On cancellation all partial output is dropped.
    pub fn expand(&self, planet: &PlanetaryGrid) -> Result<RegionalLayer> {
        self.expand_with_progress(planet, |_| {})
    }

    /// `expand`, calling `on_hex` after each planetary hex is expanded
    ///
    /// Hexes finish in no particular order.
    pub fn expand_with_progress<F>(&self, planet: &PlanetaryGrid, on_hex: F) -> Result<RegionalLayer>
    where
        F: Fn(GridCoord) + Sync,
    {
        planet.validate()?;
        let expander = RegionalHexExpander::new(planet.seed, planet.archetype, &self.config);

        let patches: Vec<Vec<RegionalCell>> = planet
            .cells
            .par_iter()
            .map(|cell| {
                if self.cancel.is_cancelled() {
                    return Err(WorldError::Cancelled);
                }
                let patch = expander.expand(planet, cell.coord);
                on_hex(cell.coord);
                Ok(patch)
            })
            .collect::<Result<_>>()?;

        if self.cancel.is_cancelled() {
            return Err(WorldError::Cancelled);
        }

        let mut layer =
            RegionalLayer::assemble(planet.width, planet.height, self.config.regional_scale, patches)?;
        let stats = layer.reconcile();
        layer.recompute_all();

        tracing::debug!(
            "Reconciled regional layer: {} river cells, {} demoted candidates, {} coastal cells",
            stats.river_cells,
            stats.demoted_candidates,
            stats.coastal_cells
        );

        Ok(layer)
    }
}

impl RegionalLayer {
    /// Deterministically rebuild the regional layer from its planetary grid
    pub fn regenerate(planet: &PlanetaryGrid, config: &GenerationConfig) -> Result<Self> {
        WorldGenerator::new(config.clone())?.expand(planet)
    }
}
