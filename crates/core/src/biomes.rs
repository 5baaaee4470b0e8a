//! Static biome registry: tile vocabularies, adjacency tables, and gating
//! flags for every biome the generator can produce.
//!
//! Every biome is authored around a "hub" tile (grass, snow, floor) that is
//! mutually adjacent with every other tile in its set. Propagation can then
//! never empty a domain, which keeps the retry-based solver out of
//! contradiction loops on shipped content.

use crate::tileset::{TileDef, TileProperties, TileSet, TileSetError};

pub mod keys {
    pub const FOREST: &str = "biome_forest";
    pub const ICE: &str = "biome_ice";
    pub const RUINS: &str = "biome_ruins";

    // Forest tiles
    pub const GRASS: &str = "grass";
    pub const TALL_GRASS: &str = "tall_grass";
    pub const TREE: &str = "tree";
    pub const WATER: &str = "water";
    pub const FLOWERS: &str = "flowers";

    // Ice tiles
    pub const SNOW: &str = "snow";
    pub const ICE_SHEET: &str = "ice_sheet";
    pub const ROCK: &str = "rock";
    pub const CREVASSE: &str = "crevasse";

    // Ruins tiles
    pub const FLOOR: &str = "floor";
    pub const RUBBLE: &str = "rubble";
    pub const WALL: &str = "wall";
    pub const PILLAR: &str = "pillar";
    pub const PIT: &str = "pit";
}

/// One biome: its key, tile set, and whether generated maps for it must pass
/// the structural quality gate.
pub struct BiomeDef {
    pub key: &'static str,
    pub gated: bool,
    pub tileset: TileSet,
}

pub struct BiomeRegistry {
    biomes: Vec<BiomeDef>,
}

impl BiomeRegistry {
    /// The shipped biome set. Only the sparse/obstacle biome (ruins) is
    /// gated; the flag is data so callers can gate others.
    pub fn standard() -> Result<Self, TileSetError> {
        Ok(Self {
            biomes: vec![
                BiomeDef { key: keys::FOREST, gated: false, tileset: forest_tileset()? },
                BiomeDef { key: keys::ICE, gated: false, tileset: ice_tileset()? },
                BiomeDef { key: keys::RUINS, gated: true, tileset: ruins_tileset()? },
            ],
        })
    }

    pub fn from_biomes(biomes: Vec<BiomeDef>) -> Self {
        Self { biomes }
    }

    pub fn get(&self, key: &str) -> Option<&BiomeDef> {
        self.biomes.iter().find(|biome| biome.key == key)
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.biomes.iter().map(|biome| biome.key).collect()
    }

    pub fn len(&self) -> usize {
        self.biomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.biomes.is_empty()
    }
}

fn props(
    key: &'static str,
    walkable: bool,
    spawnable: bool,
    weight: f32,
    transparent: bool,
) -> TileProperties {
    TileProperties { key, walkable, spawnable, weight, transparent }
}

fn forest_tileset() -> Result<TileSet, TileSetError> {
    use keys::{FLOWERS, GRASS, TALL_GRASS, TREE, WATER};
    let defs = [
        TileDef::isotropic(
            props(GRASS, true, true, 8.0, true),
            &[GRASS, TALL_GRASS, TREE, WATER, FLOWERS],
        ),
        // Tall grass blocks vision but stays walkable.
        TileDef::isotropic(
            props(TALL_GRASS, true, true, 3.0, false),
            &[GRASS, TALL_GRASS, TREE, FLOWERS],
        ),
        TileDef::isotropic(
            props(TREE, false, false, 4.0, false),
            &[GRASS, TALL_GRASS, TREE, FLOWERS],
        ),
        // Water pools: never directly against trees.
        TileDef::isotropic(props(WATER, false, false, 2.0, true), &[GRASS, WATER]),
        TileDef::isotropic(
            props(FLOWERS, true, true, 2.0, true),
            &[GRASS, TALL_GRASS, TREE, FLOWERS],
        ),
    ];
    TileSet::new(&defs)
}

fn ice_tileset() -> Result<TileSet, TileSetError> {
    use keys::{CREVASSE, ICE_SHEET, ROCK, SNOW};
    let defs = [
        TileDef::isotropic(props(SNOW, true, true, 8.0, true), &[SNOW, ICE_SHEET, ROCK, CREVASSE]),
        // Walkable but too slick to host spawns.
        TileDef::isotropic(
            props(ICE_SHEET, true, false, 5.0, true),
            &[SNOW, ICE_SHEET, CREVASSE],
        ),
        TileDef::isotropic(props(ROCK, false, false, 3.0, false), &[SNOW, ROCK]),
        TileDef::isotropic(props(CREVASSE, false, false, 2.0, true), &[SNOW, ICE_SHEET, CREVASSE]),
    ];
    TileSet::new(&defs)
}

/// Sparse/obstacle biome. Walls form horizontal runs: the wall rule permits
/// wall neighbors left/right but not above/below.
fn ruins_tileset() -> Result<TileSet, TileSetError> {
    use keys::{FLOOR, PILLAR, PIT, RUBBLE, WALL};
    let defs = [
        TileDef::isotropic(
            props(FLOOR, true, true, 6.0, true),
            &[FLOOR, RUBBLE, WALL, PILLAR, PIT],
        ),
        TileDef::isotropic(props(RUBBLE, true, false, 2.0, true), &[FLOOR, RUBBLE, WALL]),
        TileDef {
            properties: props(WALL, false, false, 4.0, false),
            adjacency: [
                &[FLOOR, RUBBLE],
                &[FLOOR, RUBBLE, WALL],
                &[FLOOR, RUBBLE],
                &[FLOOR, RUBBLE, WALL],
            ],
        },
        // Free-standing pillars, always surrounded by open floor.
        TileDef::isotropic(props(PILLAR, false, false, 1.5, true), &[FLOOR]),
        TileDef::isotropic(props(PIT, false, false, 1.0, true), &[FLOOR, PIT]),
    ];
    TileSet::new(&defs)
}

#[cfg(test)]
mod tests {
    use crate::types::Direction;

    use super::*;

    #[test]
    fn standard_registry_constructs_and_gates_only_ruins() {
        let registry = BiomeRegistry::standard().unwrap();
        assert_eq!(registry.keys(), vec![keys::FOREST, keys::ICE, keys::RUINS]);
        assert!(!registry.get(keys::FOREST).unwrap().gated);
        assert!(!registry.get(keys::ICE).unwrap().gated);
        assert!(registry.get(keys::RUINS).unwrap().gated);
    }

    #[test]
    fn every_biome_has_a_walkable_spawnable_tile() {
        let registry = BiomeRegistry::standard().unwrap();
        for key in registry.keys() {
            let tileset = &registry.get(key).unwrap().tileset;
            assert_ne!(tileset.walkable_mask(), 0, "{key} has no walkable tile");
            assert_ne!(tileset.spawnable_mask(), 0, "{key} has no spawnable tile");
        }
    }

    #[test]
    fn hub_tiles_are_mutually_adjacent_with_everything() {
        let registry = BiomeRegistry::standard().unwrap();
        for (biome, hub) in [
            (keys::FOREST, keys::GRASS),
            (keys::ICE, keys::SNOW),
            (keys::RUINS, keys::FLOOR),
        ] {
            let tileset = &registry.get(biome).unwrap().tileset;
            let hub_id = tileset.id_of(hub).unwrap();
            for direction in Direction::ALL {
                assert_eq!(
                    tileset.support(hub_id, direction),
                    tileset.full_domain(),
                    "{biome}: hub {hub} must support every tile toward {direction:?}"
                );
                for id in tileset.ids() {
                    assert_ne!(
                        tileset.support(id, direction) & hub_id.bit(),
                        0,
                        "{biome}: {} must support hub {hub} toward {direction:?}",
                        tileset.key_of(id)
                    );
                }
            }
        }
    }

    #[test]
    fn ruins_walls_never_stack_vertically() {
        let registry = BiomeRegistry::standard().unwrap();
        let tileset = &registry.get(keys::RUINS).unwrap().tileset;
        let wall = tileset.id_of(keys::WALL).unwrap();
        assert_eq!(tileset.support(wall, Direction::Up) & wall.bit(), 0);
        assert_eq!(tileset.support(wall, Direction::Down) & wall.bit(), 0);
        assert_ne!(tileset.support(wall, Direction::Right) & wall.bit(), 0);
    }
}
