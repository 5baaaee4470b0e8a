//! Edge-continuity stitching between consecutive maps.
//!
//! A player walking off one edge re-enters the next map on the opposite
//! edge, as close as possible to the lateral coordinate they left at. The
//! search degrades through progressively looser fallbacks so a usable entry
//! tile is found on any map with at least one walkable cell.

use crate::types::{Direction, Pos, manhattan};

use super::model::{Grid, Transition};

/// A walkable tile needs at least this many walkable 8-neighbors to count
/// as "safe"; single-tile islands and dead-end slivers fail this.
const SAFE_NEIGHBOR_MIN: usize = 3;

fn edge_len(grid: &Grid, edge: Direction) -> usize {
    match edge {
        Direction::Up | Direction::Down => grid.width(),
        Direction::Left | Direction::Right => grid.height(),
    }
}

/// The cell at `index` along `edge`, in scan order (left-to-right for
/// horizontal edges, top-to-bottom for vertical ones).
fn edge_cell(grid: &Grid, edge: Direction, index: usize) -> Pos {
    match edge {
        Direction::Up => Pos { y: 0, x: index as i32 },
        Direction::Down => Pos { y: grid.height() as i32 - 1, x: index as i32 },
        Direction::Left => Pos { y: index as i32, x: 0 },
        Direction::Right => Pos { y: index as i32, x: grid.width() as i32 - 1 },
    }
}

/// True when `pos` is walkable and enough of its 8-neighborhood is too.
pub fn is_safe(grid: &Grid, pos: Pos) -> bool {
    if !grid.walkable_at(pos) {
        return false;
    }
    let mut walkable_neighbors = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dy == 0 && dx == 0 {
                continue;
            }
            if grid.walkable_at(Pos { y: pos.y + dy, x: pos.x + dx }) {
                walkable_neighbors += 1;
            }
        }
    }
    walkable_neighbors >= SAFE_NEIGHBOR_MIN
}

fn closest_on_edge(
    grid: &Grid,
    edge: Direction,
    target_index: i32,
    accept: impl Fn(&Grid, Pos) -> bool,
) -> Option<Pos> {
    let mut best: Option<(u32, Pos)> = None;
    for index in 0..edge_len(grid, edge) {
        let pos = edge_cell(grid, edge, index);
        if !accept(grid, pos) {
            continue;
        }
        let distance = (index as i32).abs_diff(target_index);
        if best.is_none_or(|(best_distance, _)| distance < best_distance) {
            best = Some((distance, pos));
        }
    }
    best.map(|(_, pos)| pos)
}

/// Nearest walkable+spawnable cell along `edge` to `target_index`, ties to
/// the first in scan order. `None` when the whole edge is hostile.
pub fn find_closest_spawnable_on_edge(
    grid: &Grid,
    edge: Direction,
    target_index: i32,
) -> Option<Pos> {
    closest_on_edge(grid, edge, target_index, |grid, pos| {
        grid.walkable_at(pos) && grid.spawnable_at(pos)
    })
}

/// Nearest cell to `desired` satisfying `accept`, scanning the whole grid.
/// Ties go to the first candidate in scan order.
fn nearest_matching(grid: &Grid, desired: Pos, accept: impl Fn(&Grid, Pos) -> bool) -> Option<Pos> {
    let mut best: Option<(u32, Pos)> = None;
    for pos in grid.positions() {
        if !accept(grid, pos) {
            continue;
        }
        let distance = manhattan(desired, pos);
        if best.is_none_or(|(best_distance, _)| distance < best_distance) {
            best = Some((distance, pos));
        }
    }
    best.map(|(_, pos)| pos)
}

/// Picks where the player lands on a fresh map.
///
/// For an edge transition the entry edge is the opposite of the exit
/// direction and the target index is the lateral coordinate the player left
/// at. The fallback cascade is exact-edge spawnable, safe tile on the same
/// edge, safe tile anywhere, then any walkable tile. For the initial
/// transition the search is not edge-constrained and aims at the grid
/// center. `None` only for a grid with no walkable cell at all, which is a
/// content configuration error.
pub fn resolve_entry_point(transition: Transition, grid: &Grid) -> Option<Pos> {
    match transition {
        Transition::Initial => {
            let center = Pos { y: grid.height() as i32 / 2, x: grid.width() as i32 / 2 };
            nearest_matching(grid, center, is_safe)
                .or_else(|| nearest_matching(grid, center, |grid, pos| grid.walkable_at(pos)))
        }
        Transition::Edge { exit, player } => {
            let edge = exit.opposite();
            let target_index = match edge {
                Direction::Up | Direction::Down => player.x,
                Direction::Left | Direction::Right => player.y,
            };
            let desired = edge_cell(
                grid,
                edge,
                (target_index.max(0) as usize).min(edge_len(grid, edge) - 1),
            );
            find_closest_spawnable_on_edge(grid, edge, target_index)
                .or_else(|| closest_on_edge(grid, edge, target_index, is_safe))
                .or_else(|| nearest_matching(grid, desired, is_safe))
                .or_else(|| nearest_matching(grid, desired, |grid, pos| grid.walkable_at(pos)))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::tileset::{TileDef, TileId, TileProperties, TileSet};

    use super::*;

    // open: walkable+spawnable, path: walkable only, blocked: neither.
    fn terrain_set() -> TileSet {
        const ALL: &[&str] = &["open", "path", "blocked"];
        let defs = [
            TileDef::isotropic(
                TileProperties {
                    key: "open",
                    walkable: true,
                    spawnable: true,
                    weight: 1.0,
                    transparent: true,
                },
                ALL,
            ),
            TileDef::isotropic(
                TileProperties {
                    key: "path",
                    walkable: true,
                    spawnable: false,
                    weight: 1.0,
                    transparent: true,
                },
                ALL,
            ),
            TileDef::isotropic(
                TileProperties {
                    key: "blocked",
                    walkable: false,
                    spawnable: false,
                    weight: 1.0,
                    transparent: false,
                },
                ALL,
            ),
        ];
        TileSet::new(&defs).unwrap()
    }

    fn grid_from_rows(rows: &[&str]) -> Grid {
        let tileset = terrain_set();
        let lookup = |ch: char| -> TileId {
            match ch {
                '.' => tileset.id_of("open").unwrap(),
                ',' => tileset.id_of("path").unwrap(),
                _ => tileset.id_of("blocked").unwrap(),
            }
        };
        let cells = rows.iter().flat_map(|row| row.chars().map(lookup)).collect();
        Grid::new("biome_test", rows[0].len(), rows.len(), cells, &tileset)
    }

    fn open_grid(width: usize, height: usize) -> Grid {
        let row = ".".repeat(width);
        grid_from_rows(&vec![row.as_str(); height])
    }

    #[test]
    fn lateral_coordinate_is_preserved_across_the_seam() {
        let grid = open_grid(10, 10);
        let entry = resolve_entry_point(
            Transition::Edge { exit: Direction::Right, player: Pos { y: 4, x: 9 } },
            &grid,
        );
        assert_eq!(entry, Some(Pos { y: 4, x: 0 }));
    }

    #[test]
    fn blocked_target_slides_to_nearest_edge_cell() {
        let grid = grid_from_rows(&[
            "#.........",
            "#.........",
            "#.........",
            "#.........",
            "#.........",
            "#.........",
            "#.........",
            "..........",
            "#.........",
            "#.........",
        ]);
        let entry = resolve_entry_point(
            Transition::Edge { exit: Direction::Right, player: Pos { y: 2, x: 9 } },
            &grid,
        );
        assert_eq!(entry, Some(Pos { y: 7, x: 0 }));
    }

    #[test]
    fn edge_ties_break_toward_scan_order() {
        let grid = grid_from_rows(&["#.#", ".##", "###", ".##"]);
        // Rows 1 and 3 of the left edge are equidistant from row 2.
        let entry = find_closest_spawnable_on_edge(&grid, Direction::Left, 2);
        assert_eq!(entry, Some(Pos { y: 1, x: 0 }));
    }

    #[test]
    fn hostile_edge_falls_back_to_safe_interior() {
        let grid = grid_from_rows(&[
            "#####",
            "#...#",
            "#...#",
            "#...#",
            "#####",
        ]);
        let entry = resolve_entry_point(
            Transition::Edge { exit: Direction::Down, player: Pos { y: 4, x: 2 } },
            &grid,
        );
        // Entry edge (top) is all blocked; nearest safe tile to (0, 2) wins.
        assert_eq!(entry, Some(Pos { y: 1, x: 2 }));
    }

    #[test]
    fn isolated_tile_is_not_safe_but_still_usable() {
        let grid = grid_from_rows(&["###", "#.#", "###"]);
        let pos = Pos { y: 1, x: 1 };
        assert!(!is_safe(&grid, pos));
        let entry = resolve_entry_point(
            Transition::Edge { exit: Direction::Left, player: Pos { y: 1, x: 0 } },
            &grid,
        );
        assert_eq!(entry, Some(pos));
    }

    #[test]
    fn fully_blocked_grid_yields_no_entry() {
        let grid = grid_from_rows(&["###", "###"]);
        assert_eq!(resolve_entry_point(Transition::Initial, &grid), None);
    }

    #[test]
    fn initial_entry_lands_near_the_center() {
        let grid = open_grid(9, 9);
        assert_eq!(resolve_entry_point(Transition::Initial, &grid), Some(Pos { y: 4, x: 4 }));
    }

    #[test]
    fn walkable_only_edge_is_skipped_for_the_exact_match() {
        let grid = grid_from_rows(&[
            ",....",
            ",....",
            ",....",
            ",....",
            ",....",
        ]);
        // The left edge is walkable but not spawnable, so the exact-match
        // pass fails and the safe-on-edge pass takes the aligned path tile.
        let entry = resolve_entry_point(
            Transition::Edge { exit: Direction::Right, player: Pos { y: 2, x: 4 } },
            &grid,
        );
        assert_eq!(entry, Some(Pos { y: 2, x: 0 }));
    }
}
