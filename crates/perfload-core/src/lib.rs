// Rate-Controlled Request Driver and Result Aggregation
//
// This crate provides the HTTP-agnostic core of the load harness:
// a pacer that dispatches a fixed number of tasks through a bounded worker
// pool, and the statistics pipeline that turns the collected outcomes into
// a run summary.
//
// Key design decisions:
// - The driver is generic over the dispatched future, so it carries no HTTP
//   dependency and can be exercised with synthetic tasks in tests
// - Submission rate and pool capacity are two independent knobs (Pacing);
//   with wall-clock pacing, a lagging pool produces visible queueing, which
//   is the overload signal the harness exists to observe
// - Percentiles use linear interpolation between order statistics, so p50
//   is exactly the statistical median
// - Aggregating zero outcomes is an explicit error, never a division by zero

pub mod driver;
pub mod error;
pub mod outcome;
pub mod stats;
pub mod summary;

pub use driver::{drive, DriveReport, DriverConfig, Pacing};
pub use error::{CoreError, Result};
pub use outcome::{Outcome, RunState};
pub use stats::LatencyStats;
pub use summary::RunSummary;
