//! Random selection of poses to display.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks `min(total, max)` distinct indices in `0..total`, uniformly.
///
/// The returned order is the sampling order, not sorted.
pub fn sample_indices<R: Rng + ?Sized>(rng: &mut R, total: usize, max: usize) -> Vec<usize> {
    let amount = total.min(max);
    rand::seq::index::sample(rng, total, amount).into_vec()
}

/// An RNG seeded from `seed`, or from entropy when `None`.
#[must_use]
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_sample_is_distinct_and_bounded() {
        let mut rng = rng_from_seed(Some(7));
        let picked = sample_indices(&mut rng, 100, 30);
        assert_eq!(picked.len(), 30);
        let unique: HashSet<_> = picked.iter().copied().collect();
        assert_eq!(unique.len(), 30);
        assert!(picked.iter().all(|&i| i < 100));
    }

    #[test]
    fn test_sample_caps_at_total() {
        let mut rng = rng_from_seed(Some(1));
        let mut picked = sample_indices(&mut rng, 5, 500);
        picked.sort_unstable();
        assert_eq!(picked, vec![0, 1, 2, 3, 4]);
        assert!(sample_indices(&mut rng, 0, 10).is_empty());
    }

    #[test]
    fn test_seed_is_reproducible() {
        let a = sample_indices(&mut rng_from_seed(Some(42)), 1000, 10);
        let b = sample_indices(&mut rng_from_seed(Some(42)), 1000, 10);
        assert_eq!(a, b);
    }
}
