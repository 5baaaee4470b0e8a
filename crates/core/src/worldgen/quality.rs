//! Structural quality gate for generated grids.
//!
//! Weighted draws alone occasionally produce washes: nearly-all-open maps or
//! maps dominated by a single tile. Gated biomes reject those and let the
//! orchestrator redraw; small grids are exempt because ratios on a handful
//! of cells are meaningless.

use crate::tileset::TileId;

use super::model::Grid;

/// Solver invocations per map before accepting a degraded result.
pub const MAX_GENERATION_ATTEMPTS: usize = 10;

/// Grids below this cell count skip the gate entirely.
pub const QUALITY_GATE_MIN_CELLS: usize = 50;

/// Reject when more than this fraction of cells is walkable.
pub const MAX_WALKABLE_RATIO: f64 = 0.86;

/// Reject when a single tile covers more than this fraction of cells.
pub const MAX_DOMINANT_RATIO: f64 = 0.90;

/// Tile composition summary for one grid.
#[derive(Clone, Debug, PartialEq)]
pub struct GridStats {
    pub total: usize,
    pub walkable: usize,
    pub counts: Vec<usize>,
    pub dominant: TileId,
    pub dominant_count: usize,
    /// Distinct tiles actually present.
    pub unique: usize,
}

impl GridStats {
    pub fn walkable_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.walkable as f64 / self.total as f64
    }

    pub fn dominant_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.dominant_count as f64 / self.total as f64
    }
}

pub fn analyze(grid: &Grid) -> GridStats {
    let mut counts = Vec::new();
    let mut walkable = 0;
    for pos in grid.positions() {
        if let Some(id) = grid.tile_at(pos) {
            if counts.len() <= id.index() {
                counts.resize(id.index() + 1, 0);
            }
            counts[id.index()] += 1;
            if grid.walkable_at(pos) {
                walkable += 1;
            }
        }
    }
    let (dominant, dominant_count) = counts
        .iter()
        .enumerate()
        .max_by_key(|&(_, count)| count)
        .map(|(index, &count)| (TileId(index as u16), count))
        .unwrap_or((TileId(0), 0));
    let unique = counts.iter().filter(|&&count| count > 0).count();
    GridStats { total: grid.cells().len(), walkable, counts, dominant, dominant_count, unique }
}

/// Gate verdict: true means the candidate must be redrawn. Ratios compare
/// strictly greater, so a grid sitting exactly on a threshold passes.
pub fn should_reroll(stats: &GridStats, gated: bool) -> bool {
    if !gated || stats.total < QUALITY_GATE_MIN_CELLS {
        return false;
    }
    stats.walkable_ratio() > MAX_WALKABLE_RATIO || stats.dominant_ratio() > MAX_DOMINANT_RATIO
}
