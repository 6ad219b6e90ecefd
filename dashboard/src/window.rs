use crate::model::TelemetrySample;
use chrono::{Duration, NaiveDateTime};

/// Samples with `timestamp >= now - window`. Input must be chronological.
pub fn in_window(
    samples: &[TelemetrySample],
    now: NaiveDateTime,
    window: Duration,
) -> &[TelemetrySample] {
    let cutoff = now - window;
    let start = samples.partition_point(|s| s.timestamp < cutoff);
    &samples[start..]
}

/// Observed uptime as a percentage of the nominal maximum, assuming one
/// sample per `sampling_interval_secs`. Not clamped at 100; zero samples
/// give 0.
pub fn uptime_pct(samples: &[TelemetrySample], sampling_interval_secs: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let observed: f64 = samples.iter().map(|s| s.uptime_seconds).sum();
    let nominal = samples.len() as f64 * sampling_interval_secs;
    round2(observed / nominal * 100.0)
}

pub fn window_uptime(
    samples: &[TelemetrySample],
    now: Option<NaiveDateTime>,
    window: Duration,
    sampling_interval_secs: f64,
) -> f64 {
    match now {
        Some(now) => uptime_pct(in_window(samples, now, window), sampling_interval_secs),
        None => 0.0,
    }
}

// Ties go to even, matching numpy's `round(x, 2)`.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
