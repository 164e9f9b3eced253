//! Seeded pseudo-random sequence for reproducible data synthesis.
//!
//! Park-Miller "minimal standard" generator: `s = s * 16807 mod (2^31 - 1)`.
//! The products stay below 2^53, so the sequence is identical on every
//! platform and in every language that does the same arithmetic.

const MULTIPLIER: u64 = 16_807;
const MODULUS: u64 = 2_147_483_647;

/// Seed for the synthetic vacancy dataset.
pub const VACANCY_SEED: u64 = 42;

/// A self-contained generator. Create a fresh one per generation run.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    state: u64,
}

impl SeededRandom {
    /// Starts a sequence from `seed`. Seeds are reduced into `1..MODULUS`.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        let state = seed % MODULUS;
        Self {
            state: if state == 0 { 1 } else { state },
        }
    }

    /// Next float in `[0, 1)`.
    #[allow(clippy::cast_precision_loss)]
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state * MULTIPLIER % MODULUS;
        (self.state - 1) as f64 / (MODULUS - 1) as f64
    }

    /// Uniform integer in `min..=max`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn int_in(&mut self, min: u32, max: u32) -> u32 {
        let span = f64::from(max - min + 1);
        (self.next_f64() * span).floor() as u32 + min
    }

    /// Uniform float in `[min, max)`.
    pub fn float_in(&mut self, min: f64, max: f64) -> f64 {
        self.next_f64() * (max - min) + min
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniformly chosen element. `items` must not be empty.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let index = (self.next_f64() * items.len() as f64).floor() as usize;
        &items[index.min(items.len() - 1)]
    }
}
