use crate::{AbrError, AbrResult};

/// Ordered set of encodable bitrates, one per quality level.
///
/// Always holds at least two finite, positive, strictly increasing rates,
/// so `min_rate() < max_rate()` for every constructed ladder.
#[derive(Clone, Debug, PartialEq)]
pub struct Ladder {
    rates: Vec<f64>,
}

impl Ladder {
    pub fn new(rates: impl Into<Vec<f64>>) -> AbrResult<Self> {
        let rates = rates.into();
        if rates.len() < 2 {
            return Err(AbrError::InvalidLadder(format!(
                "need at least two rates, got {}",
                rates.len()
            )));
        }
        if let Some(bad) = rates.iter().find(|r| !r.is_finite() || **r <= 0.0) {
            return Err(AbrError::InvalidLadder(format!(
                "rate {bad} is not a positive finite value"
            )));
        }
        if rates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(AbrError::InvalidLadder(
                "rates must be strictly increasing".to_string(),
            ));
        }
        Ok(Self { rates })
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn min_rate(&self) -> f64 {
        self.rates[0]
    }

    pub fn max_rate(&self) -> f64 {
        self.rates[self.rates.len() - 1]
    }

    pub fn max_level(&self) -> usize {
        self.rates.len() - 1
    }

    pub fn rate(&self, level: usize) -> Option<f64> {
        self.rates.get(level).copied()
    }

    /// Smallest rate strictly greater than `value`.
    pub fn smallest_above(&self, value: f64) -> Option<f64> {
        self.rates.iter().copied().find(|r| *r > value)
    }

    /// Largest rate strictly less than `value`.
    pub fn largest_below(&self, value: f64) -> Option<f64> {
        self.rates.iter().rev().copied().find(|r| *r < value)
    }

    /// Next rung above `current`, or the top rung when already there.
    pub fn rate_plus(&self, current: f64) -> f64 {
        if current >= self.max_rate() {
            return self.max_rate();
        }
        self.smallest_above(current).unwrap_or(self.max_rate())
    }

    /// Next rung below `current`, or the bottom rung when already there.
    pub fn rate_minus(&self, current: f64) -> f64 {
        if current <= self.min_rate() {
            return self.min_rate();
        }
        self.largest_below(current).unwrap_or(self.min_rate())
    }

    /// Highest level whose rate is `<= value`, or 0 when none is.
    pub fn level_for_rate(&self, value: f64) -> usize {
        self.rates.iter().rposition(|r| *r <= value).unwrap_or(0)
    }
}
