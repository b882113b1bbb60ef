// Latency distribution statistics
//
// Percentiles interpolate linearly between order statistics (the estimator
// numpy calls "linear"), so p50 is exactly the statistical median and the
// values are reproducible across runs and platforms.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Latency distribution over a completed run, in seconds.
///
/// Field names match the JSON schema of the results file
/// (`response_time.avg`, `response_time.p50`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub p50: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

impl LatencyStats {
    /// Compute the distribution over the recorded round-trip times.
    /// Fails with `NoData` on an empty sequence.
    pub fn from_durations(durations: &[Duration]) -> Result<Self> {
        if durations.is_empty() {
            return Err(CoreError::NoData);
        }

        let mut secs: Vec<f64> = durations.iter().map(|d| d.as_secs_f64()).collect();
        secs.sort_by(f64::total_cmp);

        let sum: f64 = secs.iter().sum();
        Ok(Self {
            avg: sum / secs.len() as f64,
            min: secs[0],
            max: secs[secs.len() - 1],
            p50: percentile_sorted(&secs, 50.0),
            p90: percentile_sorted(&secs, 90.0),
            p95: percentile_sorted(&secs, 95.0),
            p99: percentile_sorted(&secs, 99.0),
        })
    }
}

/// Linear-interpolation percentile over pre-sorted samples.
///
/// The rank `p/100 * (n-1)` is split into an integer part and a fraction;
/// the result interpolates between the two adjacent order statistics.
/// `p` is in percent (0..=100). The slice must be non-empty and sorted.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    debug_assert!((0.0..=100.0).contains(&p));

    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
