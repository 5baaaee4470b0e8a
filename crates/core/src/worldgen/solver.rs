//! Wave-function-collapse constraint solver.
//!
//! Fills a grid of candidate domains by repeatedly collapsing the
//! minimum-entropy cell to a weighted draw and propagating adjacency
//! constraints to its neighbors. There is no backtracking: a contradiction
//! aborts the whole attempt and the orchestrator retries from scratch with
//! fresh draws.

use std::collections::VecDeque;

use rand_chacha::ChaCha8Rng;

use crate::tileset::{TileId, TileSet};
use crate::types::{Direction, Pos};

use super::rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveError {
    /// A cell's candidate domain emptied during propagation.
    Contradiction { pos: Pos },
}

/// Runs one full collapse attempt. On success every returned domain has
/// exactly one candidate bit set; on contradiction no partial result escapes.
pub(super) fn solve(
    width: usize,
    height: usize,
    tileset: &TileSet,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<u64>, SolveError> {
    debug_assert!(width > 0 && height > 0);
    let mut domains = vec![tileset.full_domain(); width * height];

    // Initial arc-consistency pass so cells that start with a single
    // candidate (or edge-unsupported tiles) constrain their neighbors too.
    let mut queue: VecDeque<usize> = (0..domains.len()).collect();
    propagate(&mut domains, width, height, tileset, &mut queue)?;

    while let Some(index) = lowest_entropy_cell(&domains) {
        let chosen = collapse_draw(domains[index], tileset, rng);
        domains[index] = chosen.bit();

        let mut queue = VecDeque::from([index]);
        propagate(&mut domains, width, height, tileset, &mut queue)?;
    }

    Ok(domains)
}

/// Unresolved cell with the fewest remaining candidates; ties go to the
/// first cell in scan order. `None` once every cell is down to one.
fn lowest_entropy_cell(domains: &[u64]) -> Option<usize> {
    let mut best: Option<(u32, usize)> = None;
    for (index, &domain) in domains.iter().enumerate() {
        let count = domain.count_ones();
        if count > 1 && best.is_none_or(|(best_count, _)| count < best_count) {
            best = Some((count, index));
        }
    }
    best.map(|(_, index)| index)
}

/// Weighted draw among the candidates still in `domain`.
fn collapse_draw(domain: u64, tileset: &TileSet, rng: &mut ChaCha8Rng) -> TileId {
    debug_assert_ne!(domain, 0);
    let mut candidates = Vec::with_capacity(domain.count_ones() as usize);
    let mut weights = Vec::with_capacity(candidates.capacity());
    let mut bits = domain;
    while bits != 0 {
        let id = TileId(bits.trailing_zeros() as u16);
        candidates.push(id);
        weights.push(tileset.weight(id));
        bits &= bits - 1;
    }
    candidates[rng::weighted_index(rng, &weights)]
}

/// Worklist constraint propagation: whenever a cell's domain shrinks, its
/// neighbors are re-intersected with the union of supports of the remaining
/// candidates, cascading until a fixed point or an empty domain.
fn propagate(
    domains: &mut [u64],
    width: usize,
    height: usize,
    tileset: &TileSet,
    queue: &mut VecDeque<usize>,
) -> Result<(), SolveError> {
    while let Some(index) = queue.pop_front() {
        let domain = domains[index];
        let y = (index / width) as i32;
        let x = (index % width) as i32;

        for direction in Direction::ALL {
            let (dy, dx) = direction.delta();
            let (ny, nx) = (y + dy, x + dx);
            if ny < 0 || nx < 0 || ny as usize >= height || nx as usize >= width {
                continue;
            }
            let neighbor = (ny as usize) * width + nx as usize;

            let mut allowed = 0_u64;
            let mut bits = domain;
            while bits != 0 {
                allowed |= tileset.support(TileId(bits.trailing_zeros() as u16), direction);
                bits &= bits - 1;
            }

            let narrowed = domains[neighbor] & allowed;
            if narrowed == 0 {
                return Err(SolveError::Contradiction { pos: Pos { y: ny, x: nx } });
            }
            if narrowed != domains[neighbor] {
                domains[neighbor] = narrowed;
                queue.push_back(neighbor);
            }
        }
    }
    Ok(())
}
