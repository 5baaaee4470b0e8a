//! Per-biome tile vocabulary: properties, weights, and directional adjacency rules.
//!
//! A `TileSet` is immutable after construction. Construction validates the
//! authored tables and fails fast on configuration errors; nothing here can
//! fail once a set has been built.

use std::fmt;

use serde::Serialize;

use crate::types::Direction;

/// Dense index of a tile within its owning `TileSet`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TileId(pub u16);

impl TileId {
    pub fn bit(self) -> u64 {
        1 << self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileProperties {
    pub key: &'static str,
    pub walkable: bool,
    pub spawnable: bool,
    /// Relative draw probability during collapse. Must be positive.
    pub weight: f32,
    /// Visual hint for the rendering collaborator; irrelevant to solving.
    pub transparent: bool,
}

/// Authoring form of one tile: properties plus the set of tile keys permitted
/// in each neighboring cell, ordered up/right/down/left. Rules are directional
/// and need not be symmetric; the solver and validator enforce both cells'
/// rules independently for every adjacent pair.
#[derive(Clone, Debug)]
pub struct TileDef {
    pub properties: TileProperties,
    pub adjacency: [&'static [&'static str]; 4],
}

impl TileDef {
    /// A tile whose rule is the same in all four directions.
    pub fn isotropic(properties: TileProperties, neighbors: &'static [&'static str]) -> Self {
        Self { properties, adjacency: [neighbors; 4] }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TileSetError {
    Empty,
    TooManyTiles(usize),
    DuplicateKey(&'static str),
    NonPositiveWeight(&'static str),
    UnknownRuleTarget { tile: &'static str, direction: Direction, target: &'static str },
}

impl fmt::Display for TileSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "tile set has no tiles"),
            Self::TooManyTiles(count) => {
                write!(f, "tile set has {count} tiles, the limit is 64")
            }
            Self::DuplicateKey(key) => write!(f, "duplicate tile key {key:?}"),
            Self::NonPositiveWeight(key) => {
                write!(f, "tile {key:?} has a non-positive weight")
            }
            Self::UnknownRuleTarget { tile, direction, target } => {
                write!(
                    f,
                    "tile {tile:?} permits unknown tile {target:?} toward {direction:?}"
                )
            }
        }
    }
}

impl std::error::Error for TileSetError {}

/// Immutable tile vocabulary and adjacency model for one biome.
#[derive(Clone, Debug)]
pub struct TileSet {
    properties: Vec<TileProperties>,
    /// Per tile, per direction: bitmask of neighbor tiles this tile permits.
    allowed: Vec<[u64; 4]>,
    /// Per tile, per direction: neighbors legal under BOTH tiles' rules.
    support: Vec<[u64; 4]>,
    walkable_mask: u64,
    spawnable_mask: u64,
    fallback: TileId,
}

impl TileSet {
    /// Builds a set from authored definitions. Fails fast on configuration
    /// errors; a `TileSet` that constructs successfully never errors later.
    pub fn new(defs: &[TileDef]) -> Result<Self, TileSetError> {
        if defs.is_empty() {
            return Err(TileSetError::Empty);
        }
        if defs.len() > 64 {
            return Err(TileSetError::TooManyTiles(defs.len()));
        }

        let mut properties = Vec::with_capacity(defs.len());
        for def in defs {
            let key = def.properties.key;
            if properties.iter().any(|existing: &TileProperties| existing.key == key) {
                return Err(TileSetError::DuplicateKey(key));
            }
            if !def.properties.weight.is_finite() || def.properties.weight <= 0.0 {
                return Err(TileSetError::NonPositiveWeight(key));
            }
            properties.push(def.properties);
        }

        let id_of = |key: &str| -> Option<usize> {
            properties.iter().position(|tile| tile.key == key)
        };

        let mut allowed = vec![[0_u64; 4]; defs.len()];
        for (tile_index, def) in defs.iter().enumerate() {
            for direction in Direction::ALL {
                let mut mask = 0_u64;
                for target in def.adjacency[direction.index()] {
                    let Some(target_index) = id_of(target) else {
                        return Err(TileSetError::UnknownRuleTarget {
                            tile: def.properties.key,
                            direction,
                            target,
                        });
                    };
                    mask |= 1 << target_index;
                }
                allowed[tile_index][direction.index()] = mask;
            }
        }

        // A neighbor u may sit at direction d from tile t only if t's rule for
        // d admits u AND u's rule for the opposite direction admits t.
        let mut support = vec![[0_u64; 4]; defs.len()];
        for tile_index in 0..defs.len() {
            for direction in Direction::ALL {
                let mut mask = allowed[tile_index][direction.index()];
                for neighbor_index in 0..defs.len() {
                    let reverse = allowed[neighbor_index][direction.opposite().index()];
                    if reverse & (1 << tile_index) == 0 {
                        mask &= !(1 << neighbor_index);
                    }
                }
                support[tile_index][direction.index()] = mask;
            }
        }

        let mut walkable_mask = 0_u64;
        let mut spawnable_mask = 0_u64;
        for (tile_index, tile) in properties.iter().enumerate() {
            if tile.walkable {
                walkable_mask |= 1 << tile_index;
            }
            if tile.spawnable {
                spawnable_mask |= 1 << tile_index;
            }
        }

        let fallback = if walkable_mask == 0 {
            TileId(0)
        } else {
            TileId(walkable_mask.trailing_zeros() as u16)
        };

        Ok(Self { properties, allowed, support, walkable_mask, spawnable_mask, fallback })
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        (0..self.properties.len()).map(|index| TileId(index as u16))
    }

    pub fn id_of(&self, key: &str) -> Option<TileId> {
        self.properties.iter().position(|tile| tile.key == key).map(|index| TileId(index as u16))
    }

    pub fn properties(&self, id: TileId) -> &TileProperties {
        &self.properties[id.index()]
    }

    pub fn key_of(&self, id: TileId) -> &'static str {
        self.properties[id.index()].key
    }

    pub fn weight(&self, id: TileId) -> f32 {
        self.properties[id.index()].weight
    }

    /// Neighbors this tile's own rule permits at `direction` (one-sided).
    pub fn allowed(&self, id: TileId, direction: Direction) -> u64 {
        self.allowed[id.index()][direction.index()]
    }

    /// Neighbors legal at `direction` under both tiles' rules. This is the
    /// mask the solver propagates with.
    pub fn support(&self, id: TileId, direction: Direction) -> u64 {
        self.support[id.index()][direction.index()]
    }

    /// Every tile as a candidate-domain mask.
    pub fn full_domain(&self) -> u64 {
        if self.properties.len() == 64 { u64::MAX } else { (1 << self.properties.len()) - 1 }
    }

    pub fn walkable_mask(&self) -> u64 {
        self.walkable_mask
    }

    pub fn spawnable_mask(&self) -> u64 {
        self.spawnable_mask
    }

    pub fn is_walkable(&self, id: TileId) -> bool {
        self.walkable_mask & id.bit() != 0
    }

    pub fn is_spawnable(&self, id: TileId) -> bool {
        self.spawnable_mask & id.bit() != 0
    }

    /// First walkable tile, used to repair unresolved cells. Falls back to
    /// tile 0 for a (degenerate) set with no walkable tile at all.
    pub fn fallback_walkable(&self) -> TileId {
        self.fallback
    }
}
