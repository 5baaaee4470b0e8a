//! Map generation orchestrator: biome tileset in, ready-to-play map out.
//!
//! Sequences solve, sanitize, quality gate, exit selection, and entry
//! stitching. Generation never blocks and never returns without a grid:
//! exhausted retries degrade to the last candidate (or a fallback fill) with
//! a diagnostic attached instead of failing.

use std::fmt;

use rand_chacha::ChaCha8Rng;

use crate::biomes::BiomeDef;
use crate::types::Direction;

use super::model::{GeneratedMap, GenerationDiagnostic, Grid, MapExits, Transition};
use super::quality::{self, MAX_GENERATION_ATTEMPTS};
use super::sanitize;
use super::solver;
use super::stitch;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerateError {
    /// The grid has no walkable cell to land the player on. Only reachable
    /// with a tile set whose walkable tiles cannot appear, which is a
    /// content configuration error.
    NoEntryTile { biome: &'static str },
    /// Every solver attempt contradicted and no uniform fill of the tile
    /// set satisfies its own adjacency rules, so no legal degraded grid
    /// exists. A content configuration error, like [`Self::NoEntryTile`].
    NoFallbackTile { biome: &'static str },
    /// A biome key that is not in the registry it was drawn from.
    UnknownBiome { key: &'static str },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEntryTile { biome } => {
                write!(f, "no walkable entry tile could be found in biome {biome:?}")
            }
            Self::NoFallbackTile { biome } => {
                write!(f, "no legal fallback fill exists for biome {biome:?}")
            }
            Self::UnknownBiome { key } => {
                write!(f, "biome {key:?} is not in the registry")
            }
        }
    }
}

impl std::error::Error for GenerateError {}

/// Fixed-dimension map generator. Stateless apart from its dimensions; all
/// randomness comes from the caller's stream.
#[derive(Clone, Copy, Debug)]
pub struct MapGenerator {
    width: usize,
    height: usize,
}

impl MapGenerator {
    pub fn new(width: usize, height: usize) -> Self {
        debug_assert!(width > 0 && height > 0);
        Self { width, height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Generates one map for `biome`.
    ///
    /// Runs up to [`MAX_GENERATION_ATTEMPTS`] solver attempts and accepts
    /// the first candidate that passes the quality gate. When every attempt
    /// solves but none passes, the last candidate ships with
    /// [`GenerationDiagnostic::QualityGateExhausted`]; when every attempt
    /// contradicts, a validated walkable fill ships with
    /// [`GenerationDiagnostic::SolverExhausted`], or
    /// [`GenerateError::NoFallbackTile`] when no legal fill exists.
    pub fn generate(
        &self,
        rng: &mut ChaCha8Rng,
        biome: &BiomeDef,
        transition: Transition,
    ) -> Result<GeneratedMap, GenerateError> {
        let mut last_candidate: Option<Grid> = None;
        let mut accepted: Option<(Grid, u32, Option<GenerationDiagnostic>)> = None;

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let Ok(domains) = solver::solve(self.width, self.height, &biome.tileset, rng) else {
                continue;
            };
            let (cells, _repaired) = sanitize::resolve_cells(&domains, &biome.tileset);
            let grid = Grid::new(biome.key, self.width, self.height, cells, &biome.tileset);

            let stats = quality::analyze(&grid);
            if !quality::should_reroll(&stats, biome.gated) {
                accepted = Some((grid, attempt as u32, None));
                break;
            }
            last_candidate = Some(grid);
        }

        let (grid, attempts, diagnostic) = match accepted {
            Some(result) => result,
            None => match last_candidate {
                Some(grid) => (
                    grid,
                    MAX_GENERATION_ATTEMPTS as u32,
                    Some(GenerationDiagnostic::QualityGateExhausted),
                ),
                None => {
                    let grid = self.fallback_grid(biome);
                    if sanitize::validate(&grid, &biome.tileset).is_err() {
                        return Err(GenerateError::NoFallbackTile { biome: biome.key });
                    }
                    (
                        grid,
                        MAX_GENERATION_ATTEMPTS as u32,
                        Some(GenerationDiagnostic::SolverExhausted),
                    )
                }
            },
        };

        debug_assert_eq!(sanitize::validate(&grid, &biome.tileset), Ok(()));

        let exits = self.compute_exits(&grid);
        let entry = stitch::resolve_entry_point(transition, &grid)
            .ok_or(GenerateError::NoEntryTile { biome: biome.key })?;

        Ok(GeneratedMap { grid, exits, entry, attempts, diagnostic })
    }

    /// Uniform fill of a walkable tile, preferring one that is legal next
    /// to itself in all four directions so the fill passes validation on
    /// any dimensions. The caller validates the result; a set with no
    /// self-adjacent walkable tile can still fill legally on degenerate
    /// (single-row or single-column) grids.
    fn fallback_grid(&self, biome: &BiomeDef) -> Grid {
        let tileset = &biome.tileset;
        let fill = tileset
            .ids()
            .find(|&id| {
                tileset.is_walkable(id)
                    && Direction::ALL
                        .iter()
                        .all(|&direction| tileset.support(id, direction) & id.bit() != 0)
            })
            .unwrap_or_else(|| tileset.fallback_walkable());
        let cells = vec![fill; self.width * self.height];
        Grid::new(biome.key, self.width, self.height, cells, tileset)
    }

    /// One egress point per edge, as central as the edge's terrain allows.
    fn compute_exits(&self, grid: &Grid) -> MapExits {
        let mut exits = MapExits::default();
        for direction in Direction::ALL {
            let midpoint = match direction {
                Direction::Up | Direction::Down => self.width as i32 / 2,
                Direction::Left | Direction::Right => self.height as i32 / 2,
            };
            exits.set(
                direction,
                stitch::find_closest_spawnable_on_edge(grid, direction, midpoint),
            );
        }
        exits
    }
}
