//! Places caller-requested entities onto the resolved grid.
//!
//! The generator does not know what a monster or a pickup is; it only
//! reserves distinct walkable+spawnable cells for them. Entity creation
//! itself belongs to the caller.

use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::types::Pos;

use super::model::Grid;
use super::rng;

/// What the caller wants positioned on a fresh map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpawnRequest {
    pub monsters: usize,
    pub pickups: usize,
    pub merchant: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum PlacementKind {
    Monster,
    Pickup,
    Merchant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Placement {
    pub pos: Pos,
    pub kind: PlacementKind,
}

/// Draws distinct spawnable cells for the request, never the entry tile.
/// When the map has fewer free cells than requested the surplus is dropped,
/// monsters first in, merchant last. Output is sorted by position so equal
/// draws compare equal regardless of draw order.
pub fn place_entities(
    rng: &mut ChaCha8Rng,
    grid: &Grid,
    entry: Pos,
    request: &SpawnRequest,
) -> Vec<Placement> {
    let mut free: Vec<Pos> = grid
        .positions()
        .filter(|&pos| pos != entry && grid.walkable_at(pos) && grid.spawnable_at(pos))
        .collect();

    let mut kinds = Vec::new();
    kinds.extend(std::iter::repeat_n(PlacementKind::Monster, request.monsters));
    kinds.extend(std::iter::repeat_n(PlacementKind::Pickup, request.pickups));
    if request.merchant {
        kinds.push(PlacementKind::Merchant);
    }

    let mut placements = Vec::with_capacity(kinds.len().min(free.len()));
    for kind in kinds {
        if free.is_empty() {
            break;
        }
        let pos = free.swap_remove(rng::next_index(rng, free.len()));
        placements.push(Placement { pos, kind });
    }
    placements.sort();
    placements
}
