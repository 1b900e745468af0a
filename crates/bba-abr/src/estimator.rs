/// Time-scaled smoothing filter shared by the throughput and output-rate
/// estimates.
///
/// The first sample is taken as-is. Every later sample moves the estimate
/// towards the observation by a gain of `elapsed_secs * alpha`:
///
/// ```text
/// y = y_old - elapsed_secs * alpha * (y_old - x)
/// ```
///
/// The gain grows with the time the last download took, so slow downloads
/// pull the estimate towards the new observation faster. The gain is not
/// capped: once `elapsed_secs * alpha > 1` the estimate overshoots the
/// observation, and above 2 it oscillates with growing amplitude.
#[derive(Clone, Debug)]
pub struct RateFilter {
    alpha: f64,
    previous: Option<f64>,
}

impl RateFilter {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            previous: None,
        }
    }

    /// Last value produced, `None` before the first update.
    pub fn estimate(&self) -> Option<f64> {
        self.previous
    }

    pub fn gain(&self, elapsed_secs: f64) -> f64 {
        elapsed_secs * self.alpha
    }

    pub fn update(&mut self, value: f64, elapsed_secs: f64) -> f64 {
        let Some(old) = self.previous else {
            self.previous = Some(value);
            return value;
        };

        let gain = self.gain(elapsed_secs);
        if gain > 1.0 {
            tracing::debug!(
                gain,
                elapsed_secs,
                alpha = self.alpha,
                "rate filter gain above 1, estimate overshoots"
            );
        }

        let smoothed = old - gain * (old - value);
        self.previous = Some(smoothed);
        smoothed
    }
}
