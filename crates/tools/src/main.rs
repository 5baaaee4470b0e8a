use anyhow::{Context, Result};
use clap::Parser;
use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};
use world_core::worldgen::analyze;
use world_core::{BiomeRegistry, Direction, GeneratedMap, MapGenerator, Pos, Transition};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value_t = 20)]
    width: usize,
    #[arg(long, default_value_t = 15)]
    height: usize,
    /// Biome key to generate, e.g. biome_forest
    #[arg(short, long, default_value = "biome_forest")]
    biome: String,
    /// Dump the generated map as JSON instead of ASCII
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn render(map: &GeneratedMap) -> String {
    let mut out = String::new();
    for y in 0..map.grid.height() {
        for x in 0..map.grid.width() {
            let pos = Pos { y: y as i32, x: x as i32 };
            let ch = if pos == map.entry {
                '@'
            } else if Direction::ALL.iter().any(|&direction| map.exits.get(direction) == Some(pos))
            {
                'E'
            } else if !map.grid.walkable_at(pos) {
                '#'
            } else if map.grid.spawnable_at(pos) {
                '.'
            } else {
                ','
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

fn main() -> Result<()> {
    let args = Args::parse();

    let registry = BiomeRegistry::standard().context("Failed to build the biome registry")?;
    let biome = registry
        .get(&args.biome)
        .with_context(|| format!("Unknown biome {:?} (known: {:?})", args.biome, registry.keys()))?;

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let map = MapGenerator::new(args.width, args.height)
        .generate(&mut rng, biome, Transition::Initial)
        .context("Map generation failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&map).context("Failed to serialize map")?);
        return Ok(());
    }

    println!("{}", render(&map));
    let stats = analyze(&map.grid);
    println!("Biome: {} (seed {})", map.grid.biome(), args.seed);
    println!("Attempts: {} Diagnostic: {:?}", map.attempts, map.diagnostic);
    println!(
        "Walkable: {:.0}% Dominant: {:.0}% Unique tiles: {}",
        stats.walkable_ratio() * 100.0,
        stats.dominant_ratio() * 100.0,
        stats.unique
    );
    println!("Entry: ({}, {})", map.entry.y, map.entry.x);

    Ok(())
}
