//! Post-solve repair and invariant validation.
//!
//! The solver only returns fully collapsed domains, but the repair pass is
//! defensive about it anyway: any cell that is not exactly one known tile is
//! rewritten to the biome's fallback walkable tile so the caller never sees
//! an unresolved cell.

use crate::tileset::{TileId, TileSet};
use crate::types::{Direction, Pos};

use super::model::Grid;

/// Collapses raw domains into single tiles. Returns the cells plus how many
/// had to be repaired to the fallback tile.
pub(super) fn resolve_cells(domains: &[u64], tileset: &TileSet) -> (Vec<TileId>, usize) {
    let mut repaired = 0;
    let cells = domains
        .iter()
        .map(|&domain| {
            let index = domain.trailing_zeros() as usize;
            if domain.count_ones() == 1 && index < tileset.len() {
                TileId(index as u16)
            } else {
                repaired += 1;
                tileset.fallback_walkable()
            }
        })
        .collect();
    (cells, repaired)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationError {
    DimensionMismatch { expected: usize, actual: usize },
    UnknownTile { pos: Pos },
    AdjacencyViolation { pos: Pos, neighbor: Pos },
}

/// Checks the full grid invariants: requested dimensions, every cell a member
/// of the tile set, and every adjacent pair legal under BOTH cells'
/// directional rules (asymmetric authoring must hold independently each way).
pub fn validate(grid: &Grid, tileset: &TileSet) -> Result<(), ValidationError> {
    let expected = grid.width() * grid.height();
    if grid.cells().len() != expected {
        return Err(ValidationError::DimensionMismatch {
            expected,
            actual: grid.cells().len(),
        });
    }

    for pos in grid.positions() {
        let Some(id) = grid.tile_at(pos) else {
            return Err(ValidationError::UnknownTile { pos });
        };
        if id.index() >= tileset.len() {
            return Err(ValidationError::UnknownTile { pos });
        }
        for direction in [Direction::Right, Direction::Down] {
            let (dy, dx) = direction.delta();
            let neighbor_pos = Pos { y: pos.y + dy, x: pos.x + dx };
            let Some(neighbor) = grid.tile_at(neighbor_pos) else {
                continue;
            };
            let forward = tileset.allowed(id, direction) & neighbor.bit() != 0;
            let reverse = tileset.allowed(neighbor, direction.opposite()) & id.bit() != 0;
            if !forward || !reverse {
                return Err(ValidationError::AdjacencyViolation { pos, neighbor: neighbor_pos });
            }
        }
    }
    Ok(())
}
