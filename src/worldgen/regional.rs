//! Expansion of one planetary hex into its regional sub-grid
//!
//! A work unit reads only the parent cell and its six neighbours, so hexes
//! can be expanded in any order or in parallel. Rivers and coasts are not
//! final until `rivers::reconcile` has run over the assembled cells.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::GenerationConfig;
use crate::core::types::{GlobalCoord, GridCoord};
use crate::spatial::hex::HexDirection;
use crate::terrain::resource::{bonus_pool, luxury_pool, strategic_for};
use crate::terrain::{Feature, ResourceTier, Terrain, TerrainGroup};
use crate::worldgen::archetype::PlanetArchetype;
use crate::worldgen::cells::{PlanetaryCell, RegionalCell};
use crate::worldgen::noise::{NoiseBank, NoiseChannel};
use crate::worldgen::planetary::{PlanetaryGrid, MAX_ELEVATION_BAND};

/// Spread applied to fractal samples before thresholding
const CONTRAST: f64 = 1.8;

/// Detail sample above which land rises into Hills
const HILL_PEAK: f64 = 0.9;

/// Detail sample below which wet lowland sinks into a Lake
const LAKE_TROUGH: f64 = 0.08;

/// Parent dryness under which lakes may form
const LAKE_MAX_DRYNESS: f32 = 40.0;

/// Feature sample above which desert cells hold an oasis
const OASIS_CUTOFF: f64 = 0.96;

fn stretch(v: f64) -> f64 {
    (0.5 + (v - 0.5) * CONTRAST).clamp(0.0, 1.0)
}

/// Seed for the discrete choices made inside one planetary hex
pub fn hex_seed(seed: u64, parent: GridCoord) -> u64 {
    let mut h = seed ^ 0x9E37_79B9_7F4A_7C15;
    h = h.wrapping_mul(0x100_0000_01B3) ^ (parent.x as u32 as u64);
    h = h.wrapping_mul(0x100_0000_01B3) ^ ((parent.y as u32 as u64) << 32);
    h
}

/// Edge whose neighbour owns the patch across the nearest side of this one
///
/// Patches are laid out as unshifted squares, so the patch east of column `x`
/// is `(x + 1, y)`: the SE edge for even columns and NE for odd ones.
fn facing_edge(parent_x: i32, dx: f64, dy: f64) -> HexDirection {
    let odd = parent_x.rem_euclid(2) == 1;
    if dx.abs() >= dy.abs() {
        match (dx >= 0.0, odd) {
            (true, false) => HexDirection::SouthEast,
            (true, true) => HexDirection::NorthEast,
            (false, false) => HexDirection::SouthWest,
            (false, true) => HexDirection::NorthWest,
        }
    } else if dy < 0.0 {
        HexDirection::North
    } else {
        HexDirection::South
    }
}

/// Terrain and elevation after cross-boundary blending
#[derive(Debug, Clone, Copy, PartialEq)]
struct Blended {
    terrain: Terrain,
    elevation: u8,
    in_core: bool,
}

pub struct RegionalHexExpander<'a> {
    config: &'a GenerationConfig,
    bank: NoiseBank,
    archetype: PlanetArchetype,
}

impl<'a> RegionalHexExpander<'a> {
    pub fn new(seed: u64, archetype: PlanetArchetype, config: &'a GenerationConfig) -> Self {
        Self {
            config,
            bank: NoiseBank::new(seed),
            archetype,
        }
    }

    pub fn scale(&self) -> u32 {
        self.config.regional_scale
    }

    /// Expand the planetary cell at `parent` into N×N regional cells
    ///
    /// Cells come back in local row-major order. River edges and coastal
    /// flags are left unset. Returns an empty list for an off-grid parent.
    pub fn expand(&self, grid: &PlanetaryGrid, parent: GridCoord) -> Vec<RegionalCell> {
        let Some(cell) = grid.cell(parent) else {
            return Vec::new();
        };
        let neighbors = HexDirection::ALL.map(|d| grid.neighbor(parent, d));
        self.expand_cell(cell, &neighbors)
    }

    /// Expansion from the parent and its neighbours alone
    ///
    /// `neighbors[i]` is the planetary cell across edge `i`; `None` past the
    /// grid boundary means no blend pressure from that side.
    pub fn expand_cell(
        &self,
        parent: &PlanetaryCell,
        neighbors: &[Option<&PlanetaryCell>; 6],
    ) -> Vec<RegionalCell> {
        let n = self.scale() as i32;
        let mut rng = ChaCha8Rng::seed_from_u64(hex_seed(self.bank.seed(), parent.coord));
        let mut cells = Vec::with_capacity((n * n) as usize);

        for ly in 0..n {
            for lx in 0..n {
                let global = GlobalCoord::new(parent.coord.x * n + lx, parent.coord.y * n + ly);
                let blended = self.blend(parent, neighbors, lx, ly, global);
                let blended = self.perturb(parent, blended, global);

                let mut cell = RegionalCell::new(
                    parent.coord,
                    lx as u32,
                    ly as u32,
                    global,
                    blended.terrain,
                    blended.elevation,
                );
                cell.feature = self.feature_for(cell.terrain, global);
                self.place_resource(&mut cell, &mut rng);
                cell.river_candidate = self.is_river_candidate(parent, cell.terrain, global);
                cells.push(cell);
            }
        }

        tracing::trace!(
            "Expanded planetary hex ({}, {}) into {} cells",
            parent.coord.x,
            parent.coord.y,
            cells.len()
        );
        cells
    }

    /// Steps 1-4: core inheritance and edge blending
    fn blend(
        &self,
        parent: &PlanetaryCell,
        neighbors: &[Option<&PlanetaryCell>; 6],
        lx: i32,
        ly: i32,
        global: GlobalCoord,
    ) -> Blended {
        let inherited = Blended {
            terrain: parent.terrain,
            elevation: parent.elevation,
            in_core: true,
        };

        let half = self.scale() as f64 / 2.0;
        let centre = (self.scale() as f64 - 1.0) / 2.0;
        let dx = (lx as f64 - centre) / half;
        let dy = (ly as f64 - centre) / half;
        let distance = (dx * dx + dy * dy).sqrt();

        let core = self.config.core_radius;
        if distance <= core {
            return inherited;
        }
        let outside = Blended {
            in_core: false,
            ..inherited
        };

        let dir = facing_edge(parent.coord.x, dx, dy);
        let Some(neighbor) = neighbors[dir.index() as usize] else {
            return outside;
        };
        if parent.terrain.is_similar(neighbor.terrain) {
            return outside;
        }

        // The perturbation flips sign across the shared edge, so at most one
        // side of any border point adopts the other's terrain.
        let sign = if parent.coord < neighbor.coord { 1.0 } else { -1.0 };
        let noise = self.bank.sample(
            NoiseChannel::Blend,
            (global.x as f64 + 0.5) / self.config.regional_noise_scale,
            (global.y as f64 + 0.5) / self.config.regional_noise_scale,
        );
        let proximity = ((distance - core) / (1.0 - core).max(f64::EPSILON)).min(1.0);
        let factor = 0.5 * proximity + sign * noise * self.config.blend_noise_amplitude;

        if factor <= self.config.blend_threshold {
            return outside;
        }

        if parent.terrain.is_water() != neighbor.terrain.is_water() && factor < self.config.coast_band
        {
            return Blended {
                terrain: Terrain::Coast,
                elevation: 0,
                in_core: false,
            };
        }

        Blended {
            terrain: neighbor.terrain,
            elevation: neighbor.elevation,
            in_core: false,
        }
    }

    /// Local elevation jitter plus Hills on peaks and Lakes in wet troughs
    fn perturb(&self, parent: &PlanetaryCell, blended: Blended, global: GlobalCoord) -> Blended {
        if blended.in_core || blended.terrain.is_water() {
            return blended;
        }

        let detail = stretch(self.bank.multi(
            NoiseChannel::Detail,
            global.x as f64 + 0.5,
            global.y as f64 + 0.5,
            self.config.regional_noise_scale,
            2,
        ));

        let mut out = blended;
        if detail > 0.8 {
            out.elevation = (out.elevation + 1).min(MAX_ELEVATION_BAND);
        } else if detail < 0.2 {
            out.elevation = out.elevation.saturating_sub(1).max(1);
        }

        let rolling = matches!(
            out.terrain.group(),
            TerrainGroup::Grass | TerrainGroup::Desert | TerrainGroup::Jungle | TerrainGroup::Barren
        );
        if rolling && detail > HILL_PEAK {
            out.terrain = Terrain::Hills;
            out.elevation = out.elevation.max(4);
        } else if out.terrain.group() == TerrainGroup::Grass
            && out.elevation <= 1
            && parent.dryness < LAKE_MAX_DRYNESS
            && detail < LAKE_TROUGH
        {
            out.terrain = Terrain::Lake;
            out.elevation = 0;
        }
        out
    }

    /// How strongly a terrain carries vegetation or ice
    fn feature_weight(terrain: Terrain) -> Option<(Feature, f64)> {
        match terrain {
            Terrain::Jungle => Some((Feature::Jungle, 1.0)),
            Terrain::Swamp => Some((Feature::Marsh, 1.0)),
            Terrain::Grassland => Some((Feature::Forest, 0.8)),
            Terrain::Plains => Some((Feature::Forest, 0.6)),
            Terrain::Hills | Terrain::Tundra => Some((Feature::Forest, 0.5)),
            Terrain::Savanna => Some((Feature::Forest, 0.3)),
            Terrain::Snow | Terrain::Glacier => Some((Feature::Ice, 1.0)),
            _ => None,
        }
    }

    /// Step 5: feature from the dedicated channel and the archetype density
    fn feature_for(&self, terrain: Terrain, global: GlobalCoord) -> Feature {
        if terrain.forbids_features() {
            return Feature::None;
        }
        let sample = stretch(self.bank.multi(
            NoiseChannel::Feature,
            global.x as f64 + 0.5,
            global.y as f64 + 0.5,
            self.config.regional_noise_scale,
            2,
        ));

        if matches!(terrain, Terrain::Desert | Terrain::Dunes) {
            return if sample > OASIS_CUTOFF {
                Feature::Oasis
            } else {
                Feature::None
            };
        }

        match Self::feature_weight(terrain) {
            Some((feature, weight)) => {
                let density = self.archetype.vegetation_density() * weight;
                if density > 0.0 && sample > 1.0 - density {
                    feature
                } else {
                    Feature::None
                }
            }
            None => Feature::None,
        }
    }

    /// Step 6: rarity-gated resource placement
    fn place_resource(&self, cell: &mut RegionalCell, rng: &mut ChaCha8Rng) {
        // Always draw so the rng stream does not depend on terrain outcomes
        let roll: u32 = rng.gen();

        let raw = self.bank.sample(
            NoiseChannel::Resource,
            (cell.global.x as f64 + 0.5) / 1.7,
            (cell.global.y as f64 + 0.5) / 1.7,
        );
        let value = (0.5 + raw * 0.5 * CONTRAST).clamp(0.0, 1.0);
        let Some(tier) = resource_tier(value, self.config.resource_cutoff) else {
            return;
        };

        match tier {
            ResourceTier::Strategic => cell.strategic = strategic_for(cell.terrain),
            ResourceTier::Luxury => {
                let pool = luxury_pool(cell.terrain);
                if !pool.is_empty() {
                    cell.luxury = Some(pool[roll as usize % pool.len()]);
                }
            }
            ResourceTier::Bonus => {
                let pool = bonus_pool(cell.terrain);
                if !pool.is_empty() {
                    cell.bonus = Some(pool[roll as usize % pool.len()]);
                }
            }
        }
    }

    /// Step 7: ridge of the river channel, easier to pass in wet parents
    fn is_river_candidate(&self, parent: &PlanetaryCell, terrain: Terrain, global: GlobalCoord) -> bool {
        if terrain.is_impassable() || terrain == Terrain::Glacier {
            return false;
        }
        let sample = stretch(self.bank.multi(
            NoiseChannel::River,
            global.x as f64 + 0.5,
            global.y as f64 + 0.5,
            self.config.regional_noise_scale,
            2,
        ));
        let ridge = 1.0 - (2.0 * sample - 1.0).abs();
        let wetness = 1.0 - f64::from(parent.dryness) / 100.0;
        let threshold = self.config.river_threshold - self.config.river_wetness_bonus * wetness;
        ridge > threshold
    }
}

/// Tier for a normalized resource sample; the span above `cutoff` is split
/// evenly into bonus, luxury and strategic
pub fn resource_tier(value: f64, cutoff: f64) -> Option<ResourceTier> {
    if value < cutoff {
        return None;
    }
    let third = (1.0 - cutoff) / 3.0;
    Some(if value < cutoff + third {
        ResourceTier::Bonus
    } else if value < cutoff + 2.0 * third {
        ResourceTier::Luxury
    } else {
        ResourceTier::Strategic
    })
}
