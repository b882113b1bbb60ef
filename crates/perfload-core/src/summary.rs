// Run summary aggregation

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::outcome::{Outcome, RunState};
use crate::stats::LatencyStats;

/// Aggregate statistics over a completed run's outcome sequence.
///
/// Serialized field names match the JSON results file written by the CLI:
/// `total_requests`, `successful_requests`, `success_rate` (percent),
/// `actual_duration` (seconds), `actual_rps`, `response_time { ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    /// Percentage in [0, 100]
    pub success_rate: f64,
    /// Measured wall-clock duration in seconds, not the nominal target
    pub actual_duration: f64,
    /// Achieved throughput: outcomes per elapsed second
    pub actual_rps: f64,
    pub run_state: RunState,
    pub response_time: LatencyStats,
}

impl RunSummary {
    /// Aggregate a complete outcome sequence and the measured wall-clock
    /// duration. Fails with `NoData` when nothing completed.
    pub fn from_outcomes(
        outcomes: &[Outcome],
        wall_clock: Duration,
        state: RunState,
    ) -> Result<Self> {
        let durations: Vec<Duration> = outcomes.iter().map(|o| o.elapsed).collect();
        let response_time = LatencyStats::from_durations(&durations)?;

        let total = outcomes.len() as u64;
        let successes = outcomes.iter().filter(|o| o.success).count() as u64;
        let elapsed = wall_clock.as_secs_f64();

        Ok(Self {
            total_requests: total,
            successful_requests: successes,
            failed_requests: total - successes,
            success_rate: successes as f64 / total as f64 * 100.0,
            actual_duration: elapsed,
            actual_rps: if elapsed > 0.0 {
                total as f64 / elapsed
            } else {
                0.0
            },
            run_state: state,
            response_time,
        })
    }
}
