//! Draw helpers over the injected ChaCha stream. All randomness in the
//! pipeline flows through these so a seed fully determines a session.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::Rng;

pub(crate) fn next_index(rng: &mut ChaCha8Rng, len: usize) -> usize {
    debug_assert!(len > 0);
    (rng.next_u64() % len as u64) as usize
}

/// Uniform draw in `[0, 1)` with 53 bits of precision.
pub(crate) fn next_unit(rng: &mut ChaCha8Rng) -> f64 {
    (rng.next_u64() >> 11) as f64 * (1.0 / (1_u64 << 53) as f64)
}

pub(crate) fn next_bool(rng: &mut ChaCha8Rng, probability: f64) -> bool {
    next_unit(rng) < probability
}

/// Picks an index with probability proportional to its weight. The final
/// entry absorbs floating-point remainder so a draw always lands.
pub(crate) fn weighted_index(rng: &mut ChaCha8Rng, weights: &[f32]) -> usize {
    debug_assert!(!weights.is_empty());
    let total: f64 = weights.iter().map(|&weight| weight as f64).sum();
    let mut roll = next_unit(rng) * total;
    for (index, &weight) in weights.iter().enumerate() {
        roll -= weight as f64;
        if roll < 0.0 {
            return index;
        }
    }
    weights.len() - 1
}

#[cfg(test)]
mod tests {
    use rand_chacha::rand_core::SeedableRng;

    use super::*;

    #[test]
    fn next_index_stays_in_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            assert!(next_index(&mut rng, 13) < 13);
        }
    }

    #[test]
    fn next_unit_stays_in_half_open_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..200 {
            let value = next_unit(&mut rng);
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn weighted_index_respects_heavy_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let weights = [90.0_f32, 10.0];
        let mut heavy = 0;
        for _ in 0..1000 {
            if weighted_index(&mut rng, &weights) == 0 {
                heavy += 1;
            }
        }
        assert!((850..=950).contains(&heavy), "heavy weight drawn {heavy}/1000 times");
    }

    #[test]
    fn draws_are_deterministic_for_a_seed() {
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..50 {
            assert_eq!(next_index(&mut a, 1000), next_index(&mut b, 1000));
        }
    }
}
