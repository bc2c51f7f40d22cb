//! Hierarchical world generation
//!
//! seed + archetype → noise → planetary grid → continents and per-hex
//! regional expansion → reconciled regional layer with yields.

pub mod archetype;
pub mod cells;
pub mod continents;
pub mod layer;
pub mod noise;
pub mod pipeline;
pub mod planetary;
pub mod regional;
pub mod rivers;
pub mod snapshot;

pub use archetype::{FallbackCounter, PlanetArchetype, PlanetDescriptor, PlanetSize};
pub use cells::{PlanetaryCell, RegionalCell, RiverEdges};
pub use continents::{ContinentDetector, ContinentGroup};
pub use layer::RegionalLayer;
pub use self::noise::{multi_octave_sample, sample, NoiseBank, NoiseChannel, NoiseField};
pub use pipeline::{CancellationToken, GeneratedWorld, WorldGenerator};
pub use planetary::{generate_for_descriptor, generate_planetary_grid, PlanetaryGrid};
pub use regional::RegionalHexExpander;
pub use snapshot::{PlanetSnapshot, TileOverlay};
