use bba_abr::{FeedbackSample, Ladder};
use rstest::fixture;

/// Five-rung ladder used across the unit and integration tests.
pub const RATES: [f64; 5] = [100.0, 250.0, 500.0, 750.0, 1000.0];

#[fixture]
pub fn ladder() -> Ladder {
    Ladder::new(RATES).expect("valid ladder")
}

/// Feedback sitting at `current_level` with a 60s buffer and 2s fragments.
#[must_use]
pub fn feedback_at(ladder: Ladder, current_level: usize, queued_secs: f64) -> FeedbackSample {
    let current_rate = ladder.rate(current_level).expect("level in ladder");
    FeedbackSample {
        last_download_secs: 1.0,
        current_rate,
        fragment_duration_secs: 2.0,
        queued_secs,
        max_buffer_secs: 60.0,
        ladder,
        current_level,
        chunks: None,
    }
}

#[fixture]
pub fn tracing_setup() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::default()
                .add_directive("warn".parse().expect("valid directive")),
        )
        .with_test_writer()
        .try_init();
}
