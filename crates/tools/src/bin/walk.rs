use anyhow::Result;
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use world_core::worldgen::{find_closest_spawnable_on_edge, validate};
use world_core::{Direction, SpawnRequest, WorldSession};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value_t = 500)]
    steps: u32,
    #[arg(long, default_value_t = 14)]
    width: usize,
    #[arg(long, default_value_t = 10)]
    height: usize,
}

fn choose<T: Copy>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    slice[rng.next_u64() as usize % slice.len()]
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Walking {} transitions on seed {}...", args.steps, args.seed);
    let mut session = WorldSession::new(args.seed, args.width, args.height)?;
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    session.start()?;

    let mut degraded = 0_u32;
    for step in 0..args.steps {
        let (exit, player) = {
            let map = session.current().expect("walk started with a map");
            let open: Vec<Direction> = Direction::ALL
                .into_iter()
                .filter(|&direction| map.exits.get(direction).is_some())
                .collect();
            assert!(!open.is_empty(), "step {step}: map has no exits at all");
            let exit = choose(&mut rng, &open);
            let player = map.exits.get(exit).expect("chosen exit exists");
            (exit, player)
        };

        session.transition(exit, player)?;
        let map = session.current().expect("transition left a current map");
        if map.diagnostic.is_some() {
            degraded += 1;
        }

        // Invariants the game loop relies on at every transition.
        let registry = session.registry();
        let biome = registry.get(map.grid.biome()).expect("biome came from the registry");
        assert_eq!(validate(&map.grid, &biome.tileset), Ok(()), "step {step}: invalid grid");
        assert!(map.grid.walkable_at(map.entry), "step {step}: entry tile not walkable");
        assert!(map.attempts >= 1 && map.attempts <= 10, "step {step}: attempt count out of range");

        let entry_edge = exit.opposite();
        let target = match entry_edge {
            Direction::Up | Direction::Down => player.x,
            Direction::Left | Direction::Right => player.y,
        };
        if let Some(expected) = find_closest_spawnable_on_edge(&map.grid, entry_edge, target) {
            assert_eq!(map.entry, expected, "step {step}: lateral continuity broken");
        }

        let placements =
            session.populate(&SpawnRequest { monsters: 3, pickups: 1, merchant: step % 7 == 0 });
        let map = session.current().expect("map still current");
        for placement in &placements {
            assert!(
                map.grid.spawnable_at(placement.pos),
                "step {step}: placement off spawnable ground"
            );
            assert_ne!(placement.pos, map.entry, "step {step}: placement on the entry tile");
        }

        if (step + 1) % 100 == 0 {
            println!("  {} transitions ok ({} degraded)", step + 1, degraded);
        }
    }

    println!("Walk completed successfully ({degraded} degraded maps accepted).");
    Ok(())
}
