use crate::Ladder;

/// Maps a continuous rate onto a ladder level with asymmetric hysteresis.
///
/// Up-switches need the rate to clear the next rung by `hysteresis_fraction`
/// of itself; down-switches happen as soon as the rate falls below the
/// current rung. Levels between the two thresholds hold.
pub fn quantize(
    ladder: &Ladder,
    rate: f64,
    current_level: usize,
    hysteresis_fraction: f64,
) -> usize {
    let up_margin = hysteresis_fraction * rate;
    let down_margin = 0.0;

    let r_up = ladder.level_for_rate(rate - up_margin);
    let r_down = ladder.level_for_rate(rate - down_margin);

    let level = if current_level < r_up {
        r_up
    } else if current_level <= r_down {
        current_level
    } else {
        r_down
    };

    tracing::trace!(rate, up_margin, r_up, r_down, current_level, level, "quantize");
    level
}
