//! Deterministic PRNG for reproducible bandwidth traces.

/// Minimal xorshift64 PRNG — deterministic and reproducible.
///
/// Use a fixed, non-zero seed so simulated sessions are identical across runs.
pub struct Xorshift64(u64);

impl Xorshift64 {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    /// Returns `f64` in `[0, 1)`.
    #[expect(clippy::cast_precision_loss, reason = "53-bit mantissa is the intent")]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Returns `f64` in `[min, max)`.
    pub fn range_f64(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.next_f64()
    }

    /// Random walk of `len` bandwidth samples bounded to `[min, max)`.
    ///
    /// Each step moves at most `step_fraction` of the previous sample.
    pub fn bandwidth_walk(
        &mut self,
        len: usize,
        min: f64,
        max: f64,
        step_fraction: f64,
    ) -> Vec<f64> {
        let mut current = self.range_f64(min, max);
        (0..len)
            .map(|_| {
                let step = self.range_f64(-step_fraction, step_fraction);
                current = (current * (1.0 + step)).clamp(min, max);
                current
            })
            .collect()
    }
}
