use std::time::Duration;

use crate::{
    AbrError, AbrEvent, AbrResult, AbrSink, Bba0, Bba1, BbaOptions, Fallback, Fault,
    FeedbackSample, MappingZone, NullSink, RateFilter, ReservoirPolicy, quantize,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AbrReason {
    UpSwitch,
    DownSwitch,
    Hold,
    /// Bounds were unusable and the lowest level was forced.
    SafeFallback,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AbrDecision {
    pub target_level: usize,
    /// Smoothed rate the level was quantized from.
    pub rate: f64,
    pub reason: AbrReason,
    pub changed: bool,
    /// Time to wait before requesting the next fragment.
    pub idle: Duration,
}

/// Buffer-based rate controller for one streaming session.
///
/// Feed it one [`FeedbackSample`] per completed fragment. Calls for a given
/// session must be serialized by the host.
pub struct BbaController<P: ReservoirPolicy, S: AbrSink = NullSink> {
    cfg: BbaOptions,
    policy: P,
    sink: S,
    throughput: RateFilter,
    output: RateFilter,
    idle: Duration,
    last_zone: Option<MappingZone>,
}

impl<P: ReservoirPolicy, S: AbrSink> BbaController<P, S> {
    pub fn with_sink(cfg: BbaOptions, policy: P, sink: S) -> AbrResult<Self> {
        cfg.validate()?;
        let alpha = cfg.smoothing_factor;
        Ok(Self {
            cfg,
            policy,
            sink,
            throughput: RateFilter::new(alpha),
            output: RateFilter::new(alpha),
            idle: Duration::ZERO,
            last_zone: None,
        })
    }

    pub fn options(&self) -> &BbaOptions {
        &self.cfg
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Whether the buffer sits below the low watermark.
    pub fn is_buffering(&self, feedback: &FeedbackSample) -> bool {
        feedback.queued_secs < self.cfg.buffer_low_watermark_secs
    }

    /// Pause recorded by the last control action.
    pub fn idle_duration(&self) -> Duration {
        self.idle
    }

    /// Smoothed observed throughput, `None` before the first action.
    pub fn throughput_estimate(&self) -> Option<f64> {
        self.throughput.estimate()
    }

    /// Smoothed output rate, `None` before the first action.
    pub fn smoothed_rate(&self) -> Option<f64> {
        self.output.estimate()
    }

    /// Zone the last control action mapped into.
    pub fn last_zone(&self) -> Option<MappingZone> {
        self.last_zone
    }

    /// Record the pause before the next fetch. Negative values mean "now".
    pub fn set_idle_duration(&mut self, secs: f64) {
        self.idle = if secs > 0.0 {
            Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        };
    }

    /// Next rate to aim for, smoothed.
    ///
    /// Updates both filters once and records the idle duration. When no
    /// cushion map can be derived the minimum ladder rate is returned as-is.
    ///
    /// An unusable download time skips the throughput sample; the output
    /// filter then weighs the target by the fragment duration instead.
    pub fn calc_control_action(&mut self, feedback: &FeedbackSample) -> f64 {
        let current_rate = self.checked_current_rate(feedback);
        let elapsed_secs = feedback.last_download_secs;

        let filter_secs = if is_positive(elapsed_secs) {
            let observed = current_rate * feedback.fragment_duration_secs / elapsed_secs;
            self.throughput.update(observed, elapsed_secs);
            self.set_idle_duration(feedback.fragment_duration_secs - elapsed_secs);
            elapsed_secs
        } else {
            self.report(
                AbrError::InvalidDownloadTime(elapsed_secs),
                Fallback::SkipThroughput,
            );
            self.set_idle_duration(0.0);
            if is_positive(feedback.fragment_duration_secs) {
                feedback.fragment_duration_secs
            } else {
                0.0
            }
        };

        let mut faults = Vec::new();
        let mapped = self
            .policy
            .cushion_map(feedback, current_rate, &self.cfg, &mut faults);
        for fault in faults {
            self.report(fault.error, fault.fallback);
        }

        let (target_rate, smoothed_rate, zone) = match mapped {
            Ok(map) => {
                let zone = map.zone(feedback.queued_secs);
                let target = map.target_rate(feedback.queued_secs, &feedback.ladder, current_rate);
                (target, self.output.update(target, filter_secs), zone)
            }
            Err(error) => {
                self.report(error, Fallback::MinRate);
                let min_rate = feedback.min_rate();
                self.output.update(min_rate, filter_secs);
                (min_rate, min_rate, MappingZone::Degenerate)
            }
        };
        self.last_zone = Some(zone);

        tracing::debug!(
            policy = self.policy.name(),
            current_rate,
            target_rate,
            smoothed_rate,
            throughput = self.throughput.estimate(),
            buffer_secs = feedback.queued_secs,
            max_buffer_secs = feedback.max_buffer_secs,
            ?zone,
            idle_secs = self.idle.as_secs_f64(),
            "BBA control action"
        );

        self.sink.emit(AbrEvent::ControlAction {
            policy: self.policy.name(),
            throughput_estimate: self.throughput.estimate(),
            target_rate,
            smoothed_rate,
            buffer_secs: feedback.queued_secs,
            zone,
            idle: self.idle,
        });

        smoothed_rate
    }

    /// Ladder level for `rate`, with hysteresis around the current level.
    pub fn quantize_rate(&self, rate: f64, feedback: &FeedbackSample) -> usize {
        let current_level = self.checked_level(feedback);
        quantize(
            &feedback.ladder,
            rate,
            current_level,
            self.cfg.hysteresis_fraction,
        )
    }

    /// Control action followed by quantization.
    pub fn decide(&mut self, feedback: &FeedbackSample) -> AbrDecision {
        let rate = self.calc_control_action(feedback);
        let target_level = self.quantize_rate(rate, feedback);
        // already reported by quantize_rate
        let current_level = feedback.current_level.min(feedback.ladder.max_level());

        let reason = if self.last_zone == Some(MappingZone::Degenerate) {
            AbrReason::SafeFallback
        } else if target_level > current_level {
            AbrReason::UpSwitch
        } else if target_level < current_level {
            AbrReason::DownSwitch
        } else {
            AbrReason::Hold
        };

        tracing::debug!(
            current_level,
            target_level,
            rate,
            ?reason,
            "BBA decide"
        );

        self.sink.emit(AbrEvent::LevelDecision {
            from_level: current_level,
            to_level: target_level,
            reason,
        });

        AbrDecision {
            target_level,
            rate,
            reason,
            changed: target_level != current_level,
            idle: self.idle,
        }
    }

    fn checked_current_rate(&self, feedback: &FeedbackSample) -> f64 {
        let (rate, min, max) = (feedback.current_rate, feedback.min_rate(), feedback.max_rate());
        if (min..=max).contains(&rate) {
            return rate;
        }
        self.report(AbrError::RateOutOfRange { rate, min, max }, Fallback::Clamped);
        if rate > max { max } else { min }
    }

    fn checked_level(&self, feedback: &FeedbackSample) -> usize {
        let len = feedback.ladder.len();
        if feedback.current_level < len {
            return feedback.current_level;
        }
        self.report(
            AbrError::LevelOutOfRange {
                level: feedback.current_level,
                len,
            },
            Fallback::Clamped,
        );
        feedback.ladder.max_level()
    }

    fn report(&self, error: AbrError, fallback: Fallback) {
        tracing::warn!(
            policy = self.policy.name(),
            %error,
            ?fallback,
            "BBA fault"
        );
        self.sink.emit(AbrEvent::Fault(Fault { error, fallback }));
    }
}

impl<P: ReservoirPolicy> BbaController<P> {
    pub fn new(cfg: BbaOptions, policy: P) -> AbrResult<Self> {
        Self::with_sink(cfg, policy, NullSink)
    }
}

fn is_positive(secs: f64) -> bool {
    secs.is_finite() && secs > 0.0
}

/// Buffer-fraction controller (BBA-0).
pub type Bba0Controller<S = NullSink> = BbaController<Bba0, S>;
/// Chunk-aware controller (BBA-1).
pub type Bba1Controller<S = NullSink> = BbaController<Bba1, S>;
