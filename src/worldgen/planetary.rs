//! Planetary terrain classification
//!
//! Every cell is a pure function of (seed, archetype, dimensions, variance,
//! config, x, y). Cells are classified in parallel and collected in row-major
//! order, so loop order never influences the output.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::config::GenerationConfig;
use crate::core::error::{Result, WorldError};
use crate::core::types::GridCoord;
use crate::spatial::hex::HexDirection;
use crate::terrain::Terrain;
use crate::worldgen::archetype::{ContinentShape, PlanetArchetype, PlanetDescriptor};
use crate::worldgen::cells::PlanetaryCell;
use crate::worldgen::noise::{NoiseBank, NoiseChannel};

/// Highest elevation band; 0 is water
pub const MAX_ELEVATION_BAND: u8 = 5;

/// Spread applied to raw fractal noise, which clusters around 0.5
const ELEVATION_CONTRAST: f64 = 1.8;

/// Wavelength multiplier for the continental channel of multi-continent planets
const CONTINENT_SCALE_FACTOR: f64 = 2.5;

/// Width of the elevation band just under the water line that becomes Coast
const SHALLOW_BAND: f64 = 0.05;

/// The coarse planet-wide hex grid, row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetaryGrid {
    pub seed: u64,
    pub archetype: PlanetArchetype,
    pub width: i32,
    pub height: i32,
    pub cells: Vec<PlanetaryCell>,
}

impl PlanetaryGrid {
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y).then(|| (y * self.width + x) as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&PlanetaryCell> {
        self.index(x, y).and_then(|i| self.cells.get(i))
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut PlanetaryCell> {
        self.index(x, y).and_then(move |i| self.cells.get_mut(i))
    }

    /// Check a grid that did not come from the classifier, e.g. a loaded one
    ///
    /// Dimensions must be positive, the cell count must be `width * height`
    /// and each cell must sit at its row-major coordinate.
    pub fn validate(&self) -> Result<()> {
        let (width, height) = (self.width, self.height);
        let count = match width.checked_mul(height) {
            Some(count) if width > 0 && height > 0 => count as usize,
            _ => return Err(WorldError::InvalidDimensions { width, height }),
        };
        if self.cells.len() != count {
            return Err(WorldError::InvalidConfig(format!(
                "planetary grid {}x{} holds {} cells, expected {}",
                width,
                height,
                self.cells.len(),
                count
            )));
        }
        if let Some((i, cell)) = self
            .cells
            .iter()
            .enumerate()
            .find(|(i, c)| c.coord != GridCoord::new(*i as i32 % width, *i as i32 / width))
        {
            return Err(WorldError::InvalidConfig(format!(
                "planetary cell {} is at ({}, {})",
                i, cell.coord.x, cell.coord.y
            )));
        }
        Ok(())
    }

    pub fn cell(&self, coord: GridCoord) -> Option<&PlanetaryCell> {
        self.get(coord.x, coord.y)
    }

    /// Neighbour across one edge; `None` past the grid boundary
    pub fn neighbor(&self, coord: GridCoord, dir: HexDirection) -> Option<&PlanetaryCell> {
        self.cell(coord.neighbor(dir))
    }

    /// On-grid neighbours of a cell
    pub fn neighbors(&self, x: i32, y: i32) -> Vec<&PlanetaryCell> {
        GridCoord::new(x, y)
            .neighbors()
            .iter()
            .filter_map(|n| self.cell(*n))
            .collect()
    }

    pub fn is_border(&self, coord: GridCoord) -> bool {
        coord.x == 0 || coord.y == 0 || coord.x == self.width - 1 || coord.y == self.height - 1
    }

    pub fn land_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_land()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlanetaryCell> {
        self.cells.iter()
    }
}

/// Per-call constants shared by every cell
struct ClassifierContext<'a> {
    bank: NoiseBank,
    archetype: PlanetArchetype,
    width: i32,
    height: i32,
    variance: f64,
    water_threshold: f64,
    noise_scale: f64,
    polar_rows: i32,
    config: &'a GenerationConfig,
}

/// Water threshold for an archetype, nudged by up to ±0.03 from the seed
pub fn water_threshold(archetype: PlanetArchetype, seed: u64) -> f64 {
    let jitter = ((seed % 1000) as f64 / 1000.0 - 0.5) * 0.06;
    archetype.base_water_threshold() + jitter
}

/// Generate a planetary grid for an archetype at explicit dimensions
pub fn generate_planetary_grid(
    seed: u64,
    archetype: PlanetArchetype,
    width: i32,
    height: i32,
    config: &GenerationConfig,
) -> Result<PlanetaryGrid> {
    generate_with_variance(seed, archetype, width, height, 1.0, config)
}

/// Generate a planetary grid sized and shaped by the descriptor's size band
pub fn generate_for_descriptor(
    descriptor: &PlanetDescriptor,
    config: &GenerationConfig,
) -> Result<PlanetaryGrid> {
    let (width, height) = descriptor.size.dimensions();
    generate_with_variance(
        descriptor.seed,
        descriptor.archetype,
        width,
        height,
        descriptor.size.elevation_variance(),
        config,
    )
}

pub fn generate_with_variance(
    seed: u64,
    archetype: PlanetArchetype,
    width: i32,
    height: i32,
    variance: f64,
    config: &GenerationConfig,
) -> Result<PlanetaryGrid> {
    let count = match width.checked_mul(height) {
        Some(count) if width > 0 && height > 0 => count,
        _ => return Err(WorldError::InvalidDimensions { width, height }),
    };
    if !(variance.is_finite() && variance > 0.0) {
        return Err(WorldError::InvalidConfig(format!(
            "elevation variance must be positive, got {}",
            variance
        )));
    }
    config.validate()?;

    let ctx = ClassifierContext {
        bank: NoiseBank::new(seed),
        archetype,
        width,
        height,
        variance,
        water_threshold: water_threshold(archetype, seed),
        noise_scale: config.planetary_noise_scale * (width.max(height) as f64 / 20.0).max(1.0),
        polar_rows: ((height as f64 * config.polar_band).ceil() as i32).max(1),
        config,
    };

    let cells: Vec<PlanetaryCell> = (0..count)
        .into_par_iter()
        .map(|i| classify_cell(&ctx, i % width, i / width))
        .collect();

    let grid = PlanetaryGrid {
        seed,
        archetype,
        width,
        height,
        cells,
    };

    tracing::debug!(
        "Classified {}x{} {} planet: {} land cells",
        width,
        height,
        archetype.name(),
        grid.land_count()
    );

    Ok(grid)
}

fn classify_cell(ctx: &ClassifierContext, x: i32, y: i32) -> PlanetaryCell {
    let fx = x as f64 + 0.5;
    let fy = y as f64 + 0.5;
    let config = ctx.config;

    let raw = ctx
        .bank
        .multi(NoiseChannel::Elevation, fx, fy, ctx.noise_scale, config.elevation_octaves);
    let raw = (0.5 + (raw - 0.5) * ELEVATION_CONTRAST).clamp(0.0, 1.0);
    let shaped = shape_elevation(ctx, raw, fx, fy, x, y);
    let elevation = (0.5 + (shaped - 0.5) * ctx.variance).clamp(0.0, 1.0);

    let on_edge = x == 0 || y == 0 || x == ctx.width - 1 || y == ctx.height - 1;
    let forced_water = on_edge && !ctx.archetype.is_land_dominant();
    let is_water = forced_water || elevation < ctx.water_threshold;

    let band = if is_water {
        0
    } else {
        let span = (1.0 - ctx.water_threshold).max(f64::EPSILON);
        let land = ((elevation - ctx.water_threshold) / span).clamp(0.0, 1.0);
        1 + ((land * 5.0).floor() as u8).min(MAX_ELEVATION_BAND - 1)
    };

    let half_height = ((ctx.height - 1) as f64 / 2.0).max(1.0);
    let latitude = ((y as f64 - (ctx.height - 1) as f64 / 2.0).abs() / half_height).min(1.0);

    let t_noise = ctx
        .bank
        .multi(NoiseChannel::Temperature, fx, fy, ctx.noise_scale, config.climate_octaves);
    let m_noise = ctx
        .bank
        .multi(NoiseChannel::Moisture, fx, fy, ctx.noise_scale, config.climate_octaves);

    let mut temperature = ctx.archetype.base_temperature() + (t_noise - 0.5) * 30.0
        - latitude * ctx.archetype.latitude_coefficient()
        - f64::from(band.saturating_sub(1)) * 4.0;
    let dryness = (ctx.archetype.base_dryness() + (0.5 - m_noise) * 60.0).clamp(0.0, 100.0);

    let polar = y < ctx.polar_rows || y >= ctx.height - ctx.polar_rows;
    if polar {
        temperature = temperature.min(10.0);
    }
    let temperature = temperature.clamp(0.0, 100.0);

    let terrain = if is_water {
        if !forced_water && elevation >= ctx.water_threshold - SHALLOW_BAND {
            Terrain::Coast
        } else {
            Terrain::Ocean
        }
    } else if polar {
        Terrain::Glacier
    } else {
        classify_terrain(ctx.archetype, band, temperature, dryness)
    };

    PlanetaryCell {
        coord: GridCoord::new(x, y),
        elevation: band,
        temperature: temperature as f32,
        dryness: dryness as f32,
        terrain,
        continent: None,
    }
}

fn shape_elevation(ctx: &ClassifierContext, raw: f64, fx: f64, fy: f64, x: i32, y: i32) -> f64 {
    match ctx.archetype.continent_shape() {
        ContinentShape::MultiContinent => {
            let large = ctx.bank.multi(
                NoiseChannel::Continent,
                fx,
                fy,
                ctx.noise_scale * CONTINENT_SCALE_FACTOR,
                2,
            );
            let large = (0.5 + (large - 0.5) * ELEVATION_CONTRAST).clamp(0.0, 1.0);
            0.6 * large + 0.4 * raw
        }
        ContinentShape::Radial => {
            let cx = (ctx.width - 1) as f64 / 2.0;
            let cy = (ctx.height - 1) as f64 / 2.0;
            let nx = (x as f64 - cx) / cx.max(1.0);
            let ny = (y as f64 - cy) / cy.max(1.0);
            let d = ((nx * nx + ny * ny).sqrt() / std::f64::consts::SQRT_2).min(1.0);
            0.6 * raw + 0.4 * (1.0 - d)
        }
        ContinentShape::Scattered => raw,
    }
}

/// Discrete terrain for a land cell
///
/// Themed archetypes collapse into their palette; earth-like and water
/// planets use the full temperature × dryness × elevation table.
pub fn classify_terrain(archetype: PlanetArchetype, band: u8, temperature: f64, dryness: f64) -> Terrain {
    match archetype {
        PlanetArchetype::Ice => match band {
            5 => Terrain::Mountains,
            4 => Terrain::Glacier,
            _ if temperature < 20.0 => Terrain::Snow,
            _ => Terrain::Tundra,
        },
        PlanetArchetype::Desert => match band {
            5 => Terrain::Mountains,
            4 => Terrain::Hills,
            _ if dryness > 75.0 => Terrain::Dunes,
            _ if dryness < 25.0 => Terrain::Plains,
            _ => Terrain::Desert,
        },
        PlanetArchetype::Jungle => match band {
            5 => Terrain::Mountains,
            4 => Terrain::Hills,
            1 if dryness < 30.0 => Terrain::Swamp,
            _ if dryness > 70.0 => Terrain::Savanna,
            _ => Terrain::Jungle,
        },
        PlanetArchetype::Volcanic => match band {
            5 => Terrain::Volcanic,
            4 => Terrain::Mountains,
            _ if dryness > 50.0 => Terrain::Ash,
            _ => Terrain::Barren,
        },
        PlanetArchetype::Barren => match band {
            5 => Terrain::Mountains,
            4 => Terrain::Hills,
            _ if temperature < 15.0 => Terrain::Snow,
            _ => Terrain::Barren,
        },
        PlanetArchetype::EarthLike | PlanetArchetype::Water => match band {
            5 => Terrain::Mountains,
            4 => Terrain::Hills,
            _ if temperature < 15.0 => Terrain::Snow,
            _ if temperature < 30.0 => Terrain::Tundra,
            _ if temperature > 70.0 => {
                if dryness > 70.0 {
                    Terrain::Desert
                } else if dryness < 30.0 {
                    Terrain::Jungle
                } else {
                    Terrain::Savanna
                }
            }
            _ if dryness > 75.0 => Terrain::Desert,
            _ if dryness > 55.0 => Terrain::Plains,
            1 if dryness < 20.0 => Terrain::Swamp,
            _ => Terrain::Grassland,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GenerationConfig {
        GenerationConfig::default()
    }

    #[test]
    fn test_rejects_empty_dimensions() {
        let err = generate_planetary_grid(1, PlanetArchetype::EarthLike, 0, 10, &config());
        assert!(matches!(err, Err(WorldError::InvalidDimensions { width: 0, height: 10 })));
        let err = generate_planetary_grid(1, PlanetArchetype::EarthLike, 10, -3, &config());
        assert!(matches!(err, Err(WorldError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_rejects_overflowing_dimensions() {
        let err = generate_planetary_grid(1, PlanetArchetype::EarthLike, i32::MAX, 4, &config());
        assert!(matches!(err, Err(WorldError::InvalidDimensions { width: i32::MAX, height: 4 })));
    }

    #[test]
    fn test_validate_catches_bad_shapes() {
        let grid = generate_planetary_grid(5, PlanetArchetype::EarthLike, 3, 3, &config()).unwrap();
        assert!(grid.validate().is_ok());

        let mut short = grid.clone();
        short.cells.truncate(4);
        assert!(matches!(short.validate(), Err(WorldError::InvalidConfig(_))));
        assert_eq!(short.get(2, 1), None);

        let mut swapped = grid.clone();
        swapped.cells.swap(0, 1);
        assert!(matches!(swapped.validate(), Err(WorldError::InvalidConfig(_))));

        let mut empty = grid;
        empty.width = 0;
        assert!(matches!(empty.validate(), Err(WorldError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_same_inputs_same_grid() {
        let a = generate_planetary_grid(42, PlanetArchetype::EarthLike, 24, 18, &config()).unwrap();
        let b = generate_planetary_grid(42, PlanetArchetype::EarthLike, 24, 18, &config()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_cells_are_row_major() {
        let grid = generate_planetary_grid(3, PlanetArchetype::Water, 7, 5, &config()).unwrap();
        assert_eq!(grid.cells.len(), 35);
        for (i, cell) in grid.cells.iter().enumerate() {
            assert_eq!(cell.coord, GridCoord::new(i as i32 % 7, i as i32 / 7));
        }
    }

    #[test]
    fn test_edges_are_water_unless_land_dominant() {
        let grid = generate_planetary_grid(11, PlanetArchetype::EarthLike, 20, 20, &config()).unwrap();
        for cell in grid.iter().filter(|c| grid.is_border(c.coord)) {
            assert_eq!(cell.terrain, Terrain::Ocean);
            assert_eq!(cell.elevation, 0);
        }
    }

    #[test]
    fn test_polar_rows_hold_no_temperate_land() {
        let grid = generate_planetary_grid(5, PlanetArchetype::Desert, 20, 20, &config()).unwrap();
        for cell in grid.iter().filter(|c| c.coord.y == 0 || c.coord.y == 19) {
            assert!(cell.terrain == Terrain::Glacier || cell.terrain.is_water());
            assert!(cell.temperature <= 10.0);
        }
    }

    #[test]
    fn test_themed_planets_stay_in_palette() {
        for archetype in PlanetArchetype::ALL {
            let Some(palette) = archetype.palette() else {
                continue;
            };
            let grid = generate_planetary_grid(77, archetype, 20, 20, &config()).unwrap();
            for cell in grid.iter() {
                assert!(
                    palette.contains(&cell.terrain),
                    "{:?} produced {:?}",
                    archetype,
                    cell.terrain
                );
            }
        }
    }

    #[test]
    fn test_band_matches_water_flag() {
        let grid = generate_planetary_grid(9, PlanetArchetype::Jungle, 16, 16, &config()).unwrap();
        for cell in grid.iter() {
            assert_eq!(cell.elevation == 0, cell.terrain.is_water());
            assert!(cell.elevation <= MAX_ELEVATION_BAND);
            assert!((0.0..=100.0).contains(&cell.temperature));
            assert!((0.0..=100.0).contains(&cell.dryness));
        }
    }

    #[test]
    fn test_earthlike_table() {
        let a = PlanetArchetype::EarthLike;
        assert_eq!(classify_terrain(a, 5, 50.0, 50.0), Terrain::Mountains);
        assert_eq!(classify_terrain(a, 2, 10.0, 50.0), Terrain::Snow);
        assert_eq!(classify_terrain(a, 2, 80.0, 80.0), Terrain::Desert);
        assert_eq!(classify_terrain(a, 2, 80.0, 10.0), Terrain::Jungle);
        assert_eq!(classify_terrain(a, 2, 50.0, 40.0), Terrain::Grassland);
        assert_eq!(classify_terrain(a, 1, 50.0, 10.0), Terrain::Swamp);
    }

    #[test]
    fn test_descriptor_uses_size_band() {
        let descriptor = PlanetDescriptor::new(
            PlanetArchetype::EarthLike,
            42,
            crate::worldgen::archetype::PlanetSize::Tiny,
        );
        let grid = generate_for_descriptor(&descriptor, &config()).unwrap();
        assert_eq!((grid.width, grid.height), (20, 20));
    }
}
