// Random source for the rewriter.
// Production uses a per-call StdRng; tests inject seeded or scripted sources.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    /// Uniform draw in [0, 1).
    fn next_f64(&mut self) -> f64;

    /// Uniform integer in `low..=high`. Callers guarantee `low <= high`.
    fn next_in_range(&mut self, low: usize, high: usize) -> usize;
}

pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map(Self::from_seed).unwrap_or_else(Self::from_entropy)
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn next_in_range(&mut self, low: usize, high: usize) -> usize {
        self.rng.gen_range(low..=high)
    }
}

/// True with probability `p`.
pub fn chance<R: RandomSource + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.next_f64() < p
}

pub fn pick<'a, R: RandomSource + ?Sized>(rng: &mut R, items: &'a [String]) -> Option<&'a str> {
    if items.is_empty() {
        return None;
    }
    let idx = rng.next_in_range(0, items.len() - 1);
    items.get(idx).map(String::as_str)
}
