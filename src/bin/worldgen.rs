//! World generation runner
//!
//! Generates a planet, founds a capital on its largest landmass, runs a
//! number of turns and optionally writes a JSON snapshot.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use hexworld::battle::UnitType;
use hexworld::city::{BuildItem, BuildingType};
use hexworld::core::{GenerationConfig, GlobalCoord, NationId, Result, SimulationRules};
use hexworld::simulation::GameWorld;
use hexworld::worldgen::{
    FallbackCounter, GeneratedWorld, PlanetArchetype, PlanetDescriptor, PlanetSize, WorldGenerator,
};

#[derive(Parser, Debug)]
#[command(name = "worldgen")]
#[command(about = "Generate a hex world and run the settlement simulation")]
struct Args {
    /// Planet archetype or colour key (earthlike, desert, ice, blue, red, ...)
    #[arg(long, default_value = "earthlike")]
    archetype: String,

    /// World seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Size band: tiny, small, medium, large or huge
    #[arg(long, default_value = "tiny")]
    size: String,

    /// Generation config (TOML); missing keys keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulation rules (TOML)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Turns to simulate
    #[arg(long, default_value_t = 50)]
    turns: u32,

    /// Write a JSON snapshot here after the run
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

/// Best centre tile on the largest landmass
fn capital_site(world: &GeneratedWorld) -> Option<GlobalCoord> {
    let continent = world.continents.iter().max_by_key(|c| c.size)?;
    continent
        .members
        .iter()
        .flat_map(|parent| world.regional.cells_of(*parent))
        .filter(|cell| !cell.is_water() && !cell.impassable)
        .max_by_key(|cell| (cell.yields.food * 2 + cell.yields.production, std::cmp::Reverse(cell.global)))
        .map(|cell| cell.global)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hexworld=info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GenerationConfig::load(path)?,
        None => GenerationConfig::default(),
    };
    let rules = match &args.rules {
        Some(path) => SimulationRules::load(path)?,
        None => SimulationRules::default(),
    };

    let fallbacks = FallbackCounter::new();
    let archetype = PlanetArchetype::from_key_or_default(&args.archetype, &fallbacks);
    let size: PlanetSize = args.size.parse()?;
    let descriptor = PlanetDescriptor::new(archetype, args.seed, size);

    let start = Instant::now();
    let generated = WorldGenerator::new(config.clone())?.generate(&descriptor)?;

    println!("Planet: {} ({}x{}), seed {}", archetype.name(), generated.planet.width, generated.planet.height, args.seed);
    println!(
        "Landmasses: {} ({} islands), land hexes: {}",
        generated.continents.len(),
        generated.continents.iter().filter(|c| c.is_island).count(),
        generated.planet.land_count()
    );
    println!("Regional cells: {}", generated.regional.len());
    println!("Generation time: {:.2}ms", start.elapsed().as_secs_f64() * 1000.0);

    let site = capital_site(&generated);
    let mut world = GameWorld::from_generated(generated, config, rules);

    match site {
        Some(site) => {
            let capital = world.found_city(NationId(1), "Capital", site)?;
            world.enqueue(capital, BuildItem::Unit(UnitType::Warrior))?;
            world.enqueue(capital, BuildItem::Building(BuildingType::Monument))?;
            world.enqueue(capital, BuildItem::Building(BuildingType::Granary))?;
            world.enqueue(capital, BuildItem::Unit(UnitType::Settler))?;
        }
        None => println!("No habitable land; running an empty world"),
    }

    for _ in 0..args.turns {
        let summary = world.advance_turn();
        for (city, item) in summary.completed() {
            println!("Turn {:>3}: {} completed {}", summary.turn, city, item);
        }
    }

    println!("\n--- After {} turns ---", world.turn);
    for city in world.cities.values() {
        println!(
            "{}: population {}, {} tiles, buildings {:?}",
            city.name,
            city.population,
            city.territory.len(),
            city.buildings
        );
    }
    println!("Units: {}", world.units.len());
    if fallbacks.count() > 0 {
        println!("Lookups that fell back to defaults: {}", fallbacks.count());
    }

    if let Some(path) = &args.output {
        std::fs::write(path, world.snapshot().to_json_pretty()?)?;
        println!("Snapshot written to {}", path.display());
    }

    Ok(())
}
