//! Entry point selection strategies

use rand::Rng;

/// Chooses which entry point the next dial attempt targets.
///
/// Strategies see the list length and the zero-based attempt number; they
/// may repeat earlier picks (the default random strategy draws with
/// replacement).
pub trait EntryPointSelector: Send + Sync {
    fn pick(&self, len: usize, attempt: usize) -> usize;
}

/// Uniform random draw with replacement.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelector;

impl EntryPointSelector for RandomSelector {
    fn pick(&self, len: usize, _attempt: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Cycles through the list in order, wrapping at the end.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobinSelector;

impl EntryPointSelector for RoundRobinSelector {
    fn pick(&self, len: usize, attempt: usize) -> usize {
        attempt % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_pick_stays_in_bounds() {
        let selector = RandomSelector;
        for attempt in 0..100 {
            assert!(selector.pick(3, attempt) < 3);
        }
    }

    #[test]
    fn round_robin_wraps() {
        let selector = RoundRobinSelector;
        let picks: Vec<usize> = (0..5).map(|attempt| selector.pick(3, attempt)).collect();
        assert_eq!(picks, vec![0, 1, 2, 0, 1]);
    }
}
