//! Random source used for reviewer selection
//!
//! Selection goes through the [`RandomSource`] capability so callers can
//! swap in a seeded or scripted source and get reproducible assignments.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform integer source
pub trait RandomSource: Send + Sync {
    /// Uniform value in `0..upper`. `upper` is always at least 1.
    fn below(&self, upper: usize) -> usize;
}

/// Thread-local OS-seeded generator
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn below(&self, upper: usize) -> usize {
        rand::thread_rng().gen_range(0..upper)
    }
}

/// Deterministic generator seeded from a fixed value
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn below(&self, upper: usize) -> usize {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        rng.gen_range(0..upper)
    }
}

/// Fisher-Yates shuffle in place
///
/// `rand::seq::SliceRandom` needs a concrete `Rng`; this draws through
/// `RandomSource` so scripted sources can drive it in tests.
pub fn shuffle<T>(items: &mut [T], rng: &dyn RandomSource) {
    for i in (1..items.len()).rev() {
        let j = rng.below(i + 1);
        items.swap(i, j);
    }
}

/// Up to `n` items drawn uniformly without replacement
pub fn choose_up_to<T>(mut items: Vec<T>, n: usize, rng: &dyn RandomSource) -> Vec<T> {
    shuffle(&mut items, rng);
    items.truncate(n);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Always picks the top of the range
    struct Last;

    impl RandomSource for Last {
        fn below(&self, upper: usize) -> usize {
            upper - 1
        }
    }

    /// Always picks zero
    struct First(AtomicUsize);

    impl RandomSource for First {
        fn below(&self, _upper: usize) -> usize {
            self.0.fetch_add(1, Ordering::SeqCst);
            0
        }
    }

    #[test]
    fn test_shuffle_identity_when_always_last() {
        let mut items = vec![1, 2, 3, 4];
        shuffle(&mut items, &Last);
        assert_eq!(items, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_shuffle_draws_once_per_position() {
        let source = First(AtomicUsize::new(0));
        let mut items = vec!['a', 'b', 'c', 'd'];
        shuffle(&mut items, &source);
        assert_eq!(source.0.load(Ordering::SeqCst), 3);
        // swaps (3,0), (2,0), (1,0)
        assert_eq!(items, vec!['b', 'c', 'd', 'a']);
    }

    #[test]
    fn test_shuffle_handles_short_inputs() {
        let mut empty: Vec<u8> = vec![];
        shuffle(&mut empty, &ThreadRandom);
        assert!(empty.is_empty());

        let mut one = vec![7];
        shuffle(&mut one, &ThreadRandom);
        assert_eq!(one, vec![7]);
    }

    #[test]
    fn test_choose_up_to_bounds() {
        let rng = SeededRandom::new(7);
        assert_eq!(choose_up_to(vec!["a"], 2, &rng), vec!["a"]);
        assert!(choose_up_to(Vec::<&str>::new(), 2, &rng).is_empty());

        let picked = choose_up_to(vec!["a", "b", "c", "d"], 2, &rng);
        assert_eq!(picked.len(), 2);
        assert_ne!(picked[0], picked[1]);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a = SeededRandom::new(42);
        let b = SeededRandom::new(42);
        let xs: Vec<usize> = (0..16).map(|_| a.below(10)).collect();
        let ys: Vec<usize> = (0..16).map(|_| b.below(10)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_every_pair_is_reachable() {
        let rng = SeededRandom::new(1);
        let mut seen = HashSet::new();
        for _ in 0..500 {
            let mut pick = choose_up_to(vec![1, 2, 3], 2, &rng);
            pick.sort_unstable();
            seen.insert(pick);
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_first_slot_is_roughly_uniform() {
        let rng = SeededRandom::new(2024);
        let mut counts: HashMap<u8, usize> = HashMap::new();
        for _ in 0..4000 {
            let pick = choose_up_to(vec![0u8, 1, 2, 3], 1, &rng);
            *counts.entry(pick[0]).or_default() += 1;
        }
        for value in 0..4u8 {
            let n = counts.get(&value).copied().unwrap_or(0);
            assert!((700..1300).contains(&n), "value {value} drawn {n} times");
        }
    }
}
