//! Random sources used to pick symbols.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use reelspin_core::RandomSource;

/// [`RandomSource`] backed by any `rand` generator.
#[derive(Clone, Debug)]
pub struct RngSource<R> {
    rng: R,
}

impl<R> RngSource<R> {
    /// Wraps the provided generator.
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<ChaCha8Rng> {
    /// Deterministic source seeded from a single integer.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_int(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.rng.gen_range(0..bound)
    }
}

/// [`RandomSource`] that replays a fixed script before deferring to another source.
///
/// Scripted values are reduced modulo the requested bound.
#[derive(Clone, Debug)]
pub struct ScriptedSource<R> {
    script: Vec<u32>,
    cursor: usize,
    fallback: R,
}

impl<R> ScriptedSource<R> {
    /// Replays `script` and then draws from `fallback`.
    #[must_use]
    pub fn new(script: Vec<u32>, fallback: R) -> Self {
        Self {
            script,
            cursor: 0,
            fallback,
        }
    }

    /// Number of scripted values not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len() - self.cursor
    }
}

impl<R: RandomSource> RandomSource for ScriptedSource<R> {
    fn next_int(&mut self, bound: u32) -> u32 {
        match self.script.get(self.cursor) {
            Some(value) => {
                self.cursor += 1;
                if bound == 0 {
                    0
                } else {
                    value % bound
                }
            }
            None => self.fallback.next_int(bound),
        }
    }
}
