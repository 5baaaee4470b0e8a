pub mod biomes;
pub mod session;
pub mod tileset;
pub mod types;
pub mod worldgen;

pub use biomes::{BiomeDef, BiomeRegistry};
pub use session::WorldSession;
pub use tileset::{TileDef, TileId, TileProperties, TileSet, TileSetError};
pub use types::*;
pub use worldgen::{
    GeneratedMap, GenerationDiagnostic, GenerateError, Grid, MapExits, MapGenerator, Placement,
    PlacementKind, SpawnRequest, Transition,
};
