//! Public data model for generated maps: the resolved grid, per-edge egress
//! points, and the transition request that produced a map.

use serde::Serialize;

use crate::tileset::{TileId, TileSet};
use crate::types::{Direction, Pos};

/// A fully resolved map: every cell holds exactly one tile of the biome's
/// set. Read-only once handed to the caller; derived walkability and
/// spawnability are baked in so consumers never need the `TileSet` back.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Grid {
    biome: &'static str,
    width: usize,
    height: usize,
    cells: Vec<TileId>,
    keys: Vec<&'static str>,
    walkable_mask: u64,
    spawnable_mask: u64,
    transparent_mask: u64,
}

impl Grid {
    pub fn new(
        biome: &'static str,
        width: usize,
        height: usize,
        cells: Vec<TileId>,
        tileset: &TileSet,
    ) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        let mut transparent_mask = 0_u64;
        for id in tileset.ids() {
            if tileset.properties(id).transparent {
                transparent_mask |= id.bit();
            }
        }
        Self {
            biome,
            width,
            height,
            cells,
            keys: tileset.ids().map(|id| tileset.key_of(id)).collect(),
            walkable_mask: tileset.walkable_mask(),
            spawnable_mask: tileset.spawnable_mask(),
            transparent_mask,
        }
    }

    pub fn biome(&self) -> &'static str {
        self.biome
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn tile_at(&self, pos: Pos) -> Option<TileId> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(self.cells[(pos.y as usize) * self.width + (pos.x as usize)])
    }

    /// Tile key for rendering lookups. `None` out of bounds.
    pub fn key_at(&self, pos: Pos) -> Option<&'static str> {
        self.tile_at(pos).map(|id| self.keys[id.index()])
    }

    /// Out-of-bounds positions are not walkable.
    pub fn walkable_at(&self, pos: Pos) -> bool {
        self.tile_at(pos).is_some_and(|id| self.walkable_mask & id.bit() != 0)
    }

    pub fn spawnable_at(&self, pos: Pos) -> bool {
        self.tile_at(pos).is_some_and(|id| self.spawnable_mask & id.bit() != 0)
    }

    pub fn transparent_at(&self, pos: Pos) -> bool {
        self.tile_at(pos).is_some_and(|id| self.transparent_mask & id.bit() != 0)
    }

    pub fn cells(&self) -> &[TileId] {
        &self.cells
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        let width = self.width;
        (0..self.cells.len()).map(move |index| Pos {
            y: (index / width) as i32,
            x: (index % width) as i32,
        })
    }
}

/// Chosen egress coordinate per edge, if the edge has any walkable+spawnable
/// cell. The movement handler uses these to detect "walked off the map".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MapExits {
    pub up: Option<Pos>,
    pub right: Option<Pos>,
    pub down: Option<Pos>,
    pub left: Option<Pos>,
}

impl MapExits {
    pub fn get(&self, direction: Direction) -> Option<Pos> {
        match direction {
            Direction::Up => self.up,
            Direction::Right => self.right,
            Direction::Down => self.down,
            Direction::Left => self.left,
        }
    }

    pub fn set(&mut self, direction: Direction, pos: Option<Pos>) {
        match direction {
            Direction::Up => self.up = pos,
            Direction::Right => self.right = pos,
            Direction::Down => self.down = pos,
            Direction::Left => self.left = pos,
        }
    }
}

/// How the player arrived on the map being generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Session start: no prior map, no prior position.
    Initial,
    /// The player walked off `exit` edge of the previous map at `player`.
    Edge { exit: Direction, player: Pos },
}

/// Degraded-mode markers attached when generation could not fully satisfy
/// the quality gate. The map is still usable; callers may log these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum GenerationDiagnostic {
    /// Every attempt solved but none passed the gate; the last candidate was
    /// accepted anyway.
    QualityGateExhausted,
    /// Every attempt hit a contradiction; the map is a uniform walkable
    /// fill that still satisfies the biome's adjacency rules.
    SolverExhausted,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeneratedMap {
    pub grid: Grid,
    pub exits: MapExits,
    /// Where the player enters this map.
    pub entry: Pos,
    /// Solver invocations spent (1..=MAX_GENERATION_ATTEMPTS).
    pub attempts: u32,
    pub diagnostic: Option<GenerationDiagnostic>,
}

impl GeneratedMap {
    /// Stable byte encoding for fingerprinting and regression tests.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.grid.biome.len() as u32).to_le_bytes());
        bytes.extend(self.grid.biome.as_bytes());
        bytes.extend((self.grid.width as u32).to_le_bytes());
        bytes.extend((self.grid.height as u32).to_le_bytes());
        for cell in &self.grid.cells {
            bytes.extend(cell.0.to_le_bytes());
        }
        bytes.extend(self.entry.y.to_le_bytes());
        bytes.extend(self.entry.x.to_le_bytes());
        for direction in Direction::ALL {
            match self.exits.get(direction) {
                Some(pos) => {
                    bytes.push(1);
                    bytes.extend(pos.y.to_le_bytes());
                    bytes.extend(pos.x.to_le_bytes());
                }
                None => bytes.push(0),
            }
        }
        bytes.extend(self.attempts.to_le_bytes());
        bytes.push(match self.diagnostic {
            None => 0,
            Some(GenerationDiagnostic::QualityGateExhausted) => 1,
            Some(GenerationDiagnostic::SolverExhausted) => 2,
        });
        bytes
    }
}

#[cfg(test)]
mod tests {
    use crate::tileset::{TileDef, TileProperties, TileSet};

    use super::*;

    fn two_tile_set() -> TileSet {
        let defs = [
            TileDef::isotropic(
                TileProperties {
                    key: "open",
                    walkable: true,
                    spawnable: true,
                    weight: 1.0,
                    transparent: true,
                },
                &["open", "blocked"],
            ),
            TileDef::isotropic(
                TileProperties {
                    key: "blocked",
                    walkable: false,
                    spawnable: false,
                    weight: 1.0,
                    transparent: false,
                },
                &["open", "blocked"],
            ),
        ];
        TileSet::new(&defs).unwrap()
    }

    #[test]
    fn grid_lookups_and_bounds() {
        let tileset = two_tile_set();
        let open = tileset.id_of("open").unwrap();
        let blocked = tileset.id_of("blocked").unwrap();
        let grid = Grid::new("biome_test", 2, 2, vec![open, blocked, open, open], &tileset);

        assert!(grid.walkable_at(Pos { y: 0, x: 0 }));
        assert!(!grid.walkable_at(Pos { y: 0, x: 1 }));
        assert!(!grid.walkable_at(Pos { y: -1, x: 0 }));
        assert!(!grid.transparent_at(Pos { y: 0, x: 1 }));
        assert_eq!(grid.key_at(Pos { y: 1, x: 1 }), Some("open"));
        assert_eq!(grid.tile_at(Pos { y: 2, x: 0 }), None);
    }

    #[test]
    fn maps_serialize_to_json() {
        let tileset = two_tile_set();
        let open = tileset.id_of("open").unwrap();
        let grid = Grid::new("biome_test", 2, 1, vec![open, open], &tileset);
        let map = GeneratedMap {
            grid,
            exits: MapExits::default(),
            entry: Pos { y: 0, x: 1 },
            attempts: 2,
            diagnostic: Some(GenerationDiagnostic::QualityGateExhausted),
        };
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["grid"]["biome"], "biome_test");
        assert_eq!(json["entry"]["x"], 1);
        assert_eq!(json["attempts"], 2);
        assert_eq!(json["diagnostic"], "QualityGateExhausted");
    }

    #[test]
    fn canonical_bytes_distinguish_entry_points() {
        let tileset = two_tile_set();
        let open = tileset.id_of("open").unwrap();
        let grid = Grid::new("biome_test", 2, 1, vec![open, open], &tileset);
        let map = GeneratedMap {
            grid,
            exits: MapExits::default(),
            entry: Pos { y: 0, x: 0 },
            attempts: 1,
            diagnostic: None,
        };
        let mut moved = map.clone();
        moved.entry = Pos { y: 0, x: 1 };
        assert_ne!(map.canonical_bytes(), moved.canonical_bytes());
    }
}
