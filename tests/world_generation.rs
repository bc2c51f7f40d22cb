//! Integration tests for hierarchical world generation
//!
//! These tests drive the full pipeline (planetary grid, continents,
//! regional expansion, reconciliation) and check the properties every
//! generated world must have:
//! - identical inputs give identical worlds
//! - rivers are connected and reciprocal
//! - coastal flags match the water around each land cell
//! - the regional layer can be dropped and regenerated from the planet

use hexworld::core::{GenerationConfig, GlobalCoord, GridCoord, WorldError};
use hexworld::spatial::HexDirection;
use hexworld::terrain::{HexYieldModel, Improvement, Terrain, TerrainGroup};
use hexworld::worldgen::{
    generate_planetary_grid, multi_octave_sample, sample, CancellationToken, GeneratedWorld,
    PlanetArchetype, PlanetDescriptor, PlanetSize, PlanetSnapshot, PlanetaryCell, PlanetaryGrid,
    RegionalLayer, WorldGenerator,
};
use proptest::prelude::*;

fn tiny_earth(seed: u64) -> GeneratedWorld {
    let descriptor = PlanetDescriptor::new(PlanetArchetype::EarthLike, seed, PlanetSize::Tiny);
    WorldGenerator::new(GenerationConfig::default())
        .unwrap()
        .generate(&descriptor)
        .unwrap()
}

// ============================================================================
// Scenario: tiny earth-like planet, seed 42
// ============================================================================

#[test]
fn test_tiny_earthlike_seed_42() {
    let world = tiny_earth(42);

    assert_eq!(world.planet.width, 20);
    assert_eq!(world.planet.height, 20);
    assert_eq!(world.planet.cells.len(), 400);
    assert!(!world.continents.is_empty(), "expected at least one landmass");

    for group in &world.continents {
        let touches_border = group.members.iter().any(|m| world.planet.is_border(*m));
        assert_eq!(group.is_island, !touches_border);
        assert_eq!(group.size, group.members.len());
        for member in &group.members {
            let cell = world.planet.cell(*member).unwrap();
            assert!(cell.is_land());
            assert_eq!(cell.continent, Some(group.id));
        }
    }

    // Every land cell belongs to exactly one group
    let grouped: usize = world.continents.iter().map(|g| g.size).sum();
    assert_eq!(grouped, world.planet.land_count());

    // Grass-family cells next to any water are coastal
    let mut checked = 0;
    for cell in world.regional.iter().filter(|c| c.terrain.group() == TerrainGroup::Grass) {
        let by_water = world.regional.neighbors(cell.global).any(|n| n.is_water());
        if by_water {
            checked += 1;
            assert!(
                cell.coastal,
                "{} at {} borders water but is not coastal",
                cell.terrain.name(),
                cell.global
            );
        }
    }
    assert!(checked > 0, "expected grass-family cells on the shore");
}

/// Two-by-two planet with a single ocean hex at (1, 0)
fn ocean_corner_planet() -> PlanetaryGrid {
    let mut cells = Vec::new();
    for y in 0..2 {
        for x in 0..2 {
            let ocean = (x, y) == (1, 0);
            cells.push(PlanetaryCell {
                coord: GridCoord::new(x, y),
                elevation: if ocean { 0 } else { 2 },
                temperature: 55.0,
                dryness: 80.0,
                terrain: if ocean { Terrain::Ocean } else { Terrain::Grassland },
                continent: None,
            });
        }
    }
    PlanetaryGrid {
        seed: 11,
        archetype: PlanetArchetype::EarthLike,
        width: 2,
        height: 2,
        cells,
    }
}

/// Distance from a cell to the nearest cell of any water parent
fn distance_to_water_parent(layer: &RegionalLayer, planet: &PlanetaryGrid, at: GlobalCoord) -> Option<u32> {
    layer
        .iter()
        .filter(|c| planet.cell(c.parent).map(|p| !p.is_land()).unwrap_or(false))
        .map(|c| at.distance(&c.global))
        .min()
}

#[test]
fn test_blended_water_stays_beside_its_source() {
    let config = GenerationConfig {
        regional_scale: 10,
        blend_noise_amplitude: 0.0,
        blend_threshold: 0.3,
        ..Default::default()
    };
    let planet = ocean_corner_planet();
    let layer = RegionalLayer::regenerate(&planet, &config).unwrap();
    let reach = config.regional_scale / 2;

    let mut blended = 0;
    for cell in layer.iter() {
        let land_parent = planet.cell(cell.parent).unwrap().is_land();
        if !land_parent || !matches!(cell.terrain, Terrain::Coast | Terrain::Ocean) {
            continue;
        }
        blended += 1;
        let distance = distance_to_water_parent(&layer, &planet, cell.global).unwrap();
        assert!(distance <= reach, "{:?} at {} is {} from the ocean hex", cell.terrain, cell.global, distance);
    }
    assert!(blended > 0, "the ocean hex should push a coast band into its neighbours");

    // (0, 1) only touches the ocean hex at a corner
    assert!(layer
        .cells_of(GridCoord::new(0, 1))
        .all(|c| !matches!(c.terrain, Terrain::Coast | Terrain::Ocean)));
}

#[test]
fn test_generated_coast_bands_face_real_water() {
    let world = tiny_earth(42);
    let reach = world.regional.scale() / 2;

    for cell in world.regional.iter() {
        let parent = world.planet.cell(cell.parent).unwrap();
        if !parent.is_land() || !matches!(cell.terrain, Terrain::Coast | Terrain::Ocean) {
            continue;
        }
        let nearest = cell
            .parent
            .neighbors()
            .iter()
            .filter(|n| world.planet.cell(**n).map(|p| !p.is_land()).unwrap_or(false))
            .flat_map(|n| world.regional.cells_of(*n))
            .map(|c| cell.global.distance(&c.global))
            .min();
        assert!(
            nearest.map(|d| d <= reach).unwrap_or(false),
            "{:?} at {} has no water parent within {}",
            cell.terrain,
            cell.global,
            reach
        );
    }
}

#[test]
fn test_regional_layer_covers_planet() {
    let world = tiny_earth(7);
    let scale = world.regional.scale() as i32;
    assert_eq!(world.regional.width(), 20 * scale);
    assert_eq!(world.regional.height(), 20 * scale);
    assert_eq!(world.regional.len(), (400 * scale * scale) as usize);

    for cell in world.regional.iter() {
        assert_eq!(world.regional.get(cell.global).map(|c| c.global), Some(cell.global));
        assert_eq!(world.regional.parent_of(cell.global), Some(cell.parent));
    }
}

// ============================================================================
// Reconciliation invariants
// ============================================================================

#[test]
fn test_rivers_are_well_formed() {
    for seed in [3, 42, 1234] {
        let world = tiny_earth(seed);
        for cell in world.regional.iter().filter(|c| c.has_river) {
            assert!(!cell.river_sides.is_empty(), "isolated river point at {}", cell.global);
            for dir in cell.river_sides.iter() {
                let other = world.regional.get(cell.global.neighbor(dir)).unwrap();
                assert!(other.has_river);
                assert!(other.river_sides.contains(dir.opposite()));
            }
        }
        for cell in world.regional.iter().filter(|c| !c.has_river) {
            assert!(cell.river_sides.is_empty());
        }
    }
}

#[test]
fn test_coastal_iff_land_next_to_water() {
    let world = tiny_earth(99);
    for cell in world.regional.iter() {
        let near_water = world.regional.neighbors(cell.global).any(|n| n.is_water());
        assert_eq!(cell.coastal, !cell.is_water() && near_water, "at {}", cell.global);
    }
}

#[test]
fn test_yields_match_fresh_recompute() {
    let world = tiny_earth(5);
    for cell in world.regional.iter().take(5_000) {
        let mut copy = cell.clone();
        HexYieldModel::recompute(&mut copy);
        assert_eq!(&copy, cell);
        HexYieldModel::recompute(&mut copy);
        assert_eq!(&copy, cell);
    }
}

#[test]
fn test_impassable_terrain_has_infinite_cost() {
    let world = tiny_earth(42);
    for cell in world.regional.iter() {
        if matches!(cell.terrain, Terrain::Mountains | Terrain::Ocean) {
            assert!(cell.impassable);
            assert_eq!(cell.movement_cost, hexworld::terrain::IMPASSABLE_COST);
        }
    }
}

// ============================================================================
// Determinism and persistence
// ============================================================================

#[test]
fn test_generation_is_deterministic() {
    let a = tiny_earth(2024);
    let b = tiny_earth(2024);
    assert_eq!(a.planet, b.planet);
    assert_eq!(a.continents, b.continents);
    assert_eq!(a.regional, b.regional);

    let c = tiny_earth(2025);
    assert_ne!(a.planet, c.planet);
}

#[test]
fn test_regional_layer_regenerates_from_planet() {
    let config = GenerationConfig::default();
    let world = tiny_earth(11);
    let rebuilt = RegionalLayer::regenerate(&world.planet, &config).unwrap();
    assert_eq!(rebuilt, world.regional);
}

#[test]
fn test_snapshot_restores_overlays() {
    let config = GenerationConfig::default();
    let mut world = tiny_earth(8);

    let farm_site = world
        .regional
        .iter()
        .find(|c| !c.is_water() && !c.impassable)
        .map(|c| c.global)
        .unwrap();
    world.regional.get_mut(farm_site).unwrap().improvement = Some(Improvement::Farm);
    world.regional.get_mut(farm_site).unwrap().pillaged = true;
    world.regional.recompute(farm_site).unwrap();

    let json = PlanetSnapshot::capture(&config, &world.planet, &world.regional)
        .to_json()
        .unwrap();
    let restored = PlanetSnapshot::from_json(&json).unwrap().restore_layer().unwrap();

    assert_eq!(restored, world.regional);
    let cell = restored.get(farm_site).unwrap();
    assert_eq!(cell.improvement, Some(Improvement::Farm));
    assert!(cell.pillaged);
}

#[test]
fn test_cancelled_generation_returns_nothing() {
    let token = CancellationToken::new();
    token.cancel();
    let generator = WorldGenerator::new(GenerationConfig::default())
        .unwrap()
        .with_cancellation(token);
    let descriptor = PlanetDescriptor::new(PlanetArchetype::Desert, 1, PlanetSize::Tiny);
    assert!(matches!(generator.generate(&descriptor), Err(WorldError::Cancelled)));
}

#[test]
fn test_invalid_dimensions_rejected() {
    let config = GenerationConfig::default();
    assert!(matches!(
        generate_planetary_grid(1, PlanetArchetype::Ice, 0, 10, &config),
        Err(WorldError::InvalidDimensions { .. })
    ));
}

#[test]
fn test_themed_archetypes_keep_their_palette() {
    let config = GenerationConfig::default();
    for archetype in [PlanetArchetype::Ice, PlanetArchetype::Desert, PlanetArchetype::Volcanic] {
        let grid = generate_planetary_grid(77, archetype, 16, 12, &config).unwrap();
        let palette = archetype.palette().unwrap();
        for cell in grid.iter().filter(|c| c.is_land()) {
            assert!(
                palette.contains(&cell.terrain) || cell.terrain == Terrain::Glacier,
                "{:?} produced {:?}",
                archetype,
                cell.terrain
            );
        }
    }
}

#[test]
fn test_tile_keys_round_trip_through_keyed_export() {
    let world = tiny_earth(13);
    let keyed = world.regional.keyed();
    assert_eq!(keyed.len(), world.regional.len());
    for (key, cell) in keyed.iter().take(500) {
        assert_eq!(key.parse::<GlobalCoord>().unwrap(), cell.global);
    }
}

#[test]
fn test_edge_reciprocity() {
    let origin = GlobalCoord::new(5, 5);
    for dir in HexDirection::ALL {
        assert_eq!(origin.neighbor(dir).neighbor(dir.opposite()), origin);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_noise_is_deterministic(seed in any::<u32>(), x in -1000.0f64..1000.0, y in -1000.0f64..1000.0) {
        let a = sample(seed, x, y);
        prop_assert_eq!(a.to_bits(), sample(seed, x, y).to_bits());
        prop_assert!((-1.0..=1.0).contains(&a));

        let m = multi_octave_sample(seed, x, y, 8.0, 4);
        prop_assert_eq!(m.to_bits(), multi_octave_sample(seed, x, y, 8.0, 4).to_bits());
        prop_assert!((0.0..=1.0).contains(&m));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn prop_planetary_grid_is_deterministic(seed in any::<u64>(), w in 4i32..14, h in 4i32..14) {
        let config = GenerationConfig::default();
        let a = generate_planetary_grid(seed, PlanetArchetype::EarthLike, w, h, &config).unwrap();
        let b = generate_planetary_grid(seed, PlanetArchetype::EarthLike, w, h, &config).unwrap();
        prop_assert_eq!(a, b);
    }
}
