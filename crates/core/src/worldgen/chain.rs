//! Biome selection across consecutive maps.
//!
//! Consecutive maps prefer to stay in the current biome, but the preference
//! decays with every repeat so long single-biome runs grow increasingly
//! unlikely without ever becoming impossible.

use rand_chacha::ChaCha8Rng;

use super::rng;

const BASE_SAME_PROBABILITY: f64 = 0.70;
const SAME_PROBABILITY_DECAY: f64 = 0.10;
const MIN_SAME_PROBABILITY: f64 = 0.15;

/// Tracks which biome the session is in and how many times in a row it has
/// repeated. A fresh state has no biome and draws uniformly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BiomeState {
    current: Option<&'static str>,
    repeat_streak: u32,
}

impl BiomeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&'static str> {
        self.current
    }

    pub fn repeat_streak(&self) -> u32 {
        self.repeat_streak
    }

    /// Records the biome a new map was generated in. Repeats extend the
    /// streak; any change resets it.
    pub fn advance(&mut self, chosen: &'static str) {
        if self.current == Some(chosen) {
            self.repeat_streak += 1;
        } else {
            self.current = Some(chosen);
            self.repeat_streak = 0;
        }
    }
}

/// Probability of staying in the current biome after `streak` repeats.
pub fn same_biome_probability(streak: u32) -> f64 {
    (BASE_SAME_PROBABILITY - SAME_PROBABILITY_DECAY * f64::from(streak)).max(MIN_SAME_PROBABILITY)
}

/// Draws the next biome key. Falls back to a uniform draw whenever there is
/// no usable current biome (fresh state, key not in the candidate list, or a
/// single-entry list).
pub fn select_next(
    rng: &mut ChaCha8Rng,
    state: &BiomeState,
    keys: &[&'static str],
) -> &'static str {
    debug_assert!(!keys.is_empty());
    let current = state.current.filter(|key| keys.contains(key));
    let Some(current) = current else {
        return keys[rng::next_index(rng, keys.len())];
    };
    if keys.len() == 1 {
        return keys[0];
    }
    if rng::next_bool(rng, same_biome_probability(state.repeat_streak)) {
        return current;
    }
    let others: Vec<&'static str> = keys.iter().copied().filter(|&key| key != current).collect();
    others[rng::next_index(rng, others.len())]
}
