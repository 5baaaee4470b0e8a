//! Procedural world-map generation.
//!
//! The pipeline per map: pick a biome, collapse a grid with the constraint
//! solver under the quality gate, sanitize, choose edge exits, stitch the
//! player's entry point. Everything is deterministic given the caller's
//! seeded RNG; the same seed, dimensions, and biome always produce the
//! same map.

pub mod chain;
pub mod generator;
pub mod model;
pub mod quality;
pub mod sanitize;
pub mod spawns;
pub mod stitch;

mod rng;
mod solver;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use crate::biomes::BiomeDef;

pub use chain::{BiomeState, same_biome_probability, select_next};
pub use generator::{GenerateError, MapGenerator};
pub use model::{GeneratedMap, GenerationDiagnostic, Grid, MapExits, Transition};
pub use quality::{GridStats, MAX_GENERATION_ATTEMPTS, analyze, should_reroll};
pub use sanitize::{ValidationError, validate};
pub use spawns::{Placement, PlacementKind, SpawnRequest, place_entities};
pub use stitch::{find_closest_spawnable_on_edge, resolve_entry_point};

/// One-shot generation of a session-opening map from a bare seed. Longer
/// lived flows should hold a [`crate::session::WorldSession`] instead so the
/// RNG stream and biome chain persist across transitions.
pub fn generate_map(
    seed: u64,
    width: usize,
    height: usize,
    biome: &BiomeDef,
) -> Result<GeneratedMap, GenerateError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    MapGenerator::new(width, height).generate(&mut rng, biome, Transition::Initial)
}
