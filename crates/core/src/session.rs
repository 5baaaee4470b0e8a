//! Game-loop-facing session state: the biome chain, the RNG stream, and the
//! current map, advanced one transition at a time.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use crate::biomes::BiomeRegistry;
use crate::tileset::TileSetError;
use crate::types::{Direction, Pos};
use crate::worldgen::{
    BiomeState, GeneratedMap, GenerateError, MapGenerator, Placement, SpawnRequest, Transition,
    chain, spawns,
};

/// A play session's world state. One RNG stream drives biome selection,
/// solving, and spawn placement, so a seed reproduces the entire session
/// walk, not just individual maps.
pub struct WorldSession {
    rng: ChaCha8Rng,
    generator: MapGenerator,
    registry: BiomeRegistry,
    biome_state: BiomeState,
    current: Option<GeneratedMap>,
}

impl WorldSession {
    /// Session over the shipped biome registry.
    pub fn new(seed: u64, width: usize, height: usize) -> Result<Self, TileSetError> {
        Ok(Self::with_registry(seed, width, height, BiomeRegistry::standard()?))
    }

    pub fn with_registry(
        seed: u64,
        width: usize,
        height: usize,
        registry: BiomeRegistry,
    ) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            generator: MapGenerator::new(width, height),
            registry,
            biome_state: BiomeState::new(),
            current: None,
        }
    }

    pub fn current(&self) -> Option<&GeneratedMap> {
        self.current.as_ref()
    }

    pub fn biome_state(&self) -> &BiomeState {
        &self.biome_state
    }

    pub fn registry(&self) -> &BiomeRegistry {
        &self.registry
    }

    /// Generates the session-opening map. The player lands on a safe tile
    /// near the center rather than on an edge.
    pub fn start(&mut self) -> Result<&GeneratedMap, GenerateError> {
        self.next_map(Transition::Initial)
    }

    /// The player walked off `exit` at `player`; generates the next map and
    /// stitches the entry point to the opposite edge.
    pub fn transition(
        &mut self,
        exit: Direction,
        player: Pos,
    ) -> Result<&GeneratedMap, GenerateError> {
        self.next_map(Transition::Edge { exit, player })
    }

    fn next_map(&mut self, transition: Transition) -> Result<&GeneratedMap, GenerateError> {
        let keys = self.registry.keys();
        let chosen = chain::select_next(&mut self.rng, &self.biome_state, &keys);
        // Unreachable while `keys` comes from this registry; the chain only
        // returns entries of the list it was given.
        let biome = self
            .registry
            .get(chosen)
            .ok_or(GenerateError::UnknownBiome { key: chosen })?;
        let map = self.generator.generate(&mut self.rng, biome, transition)?;
        self.biome_state.advance(chosen);
        Ok(self.current.insert(map))
    }

    /// Positions the caller's entities on the current map. Empty before
    /// `start`.
    pub fn populate(&mut self, request: &SpawnRequest) -> Vec<Placement> {
        match &self.current {
            Some(map) => spawns::place_entities(&mut self.rng, &map.grid, map.entry, request),
            None => Vec::new(),
        }
    }
}
