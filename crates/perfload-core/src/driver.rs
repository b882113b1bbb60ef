// Rate-controlled dispatch into a bounded worker pool
//
// Submission pacing is independent of worker availability: under wall-clock
// pacing, tasks are spawned at fixed 1/rate intervals and queue on the
// semaphore when every worker is busy. That queueing is the overload signal
// a load test exists to surface, so it is never silently smoothed out.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::{CoreError, Result};
use crate::outcome::{Outcome, RunState};

/// Submission pacing policy. Rate and pool capacity stay two independent
/// knobs; collapsing them would hide queueing under overload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pacing {
    /// Submit at fixed 1/rate intervals regardless of pool state. A lagging
    /// pool queues submissions on the semaphore.
    #[default]
    WallClock,
    /// Gate each submission on a free worker; the rate becomes an upper
    /// bound instead of a target.
    BestEffort,
}

/// Configuration for one driver run.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Target submission rate in requests per second
    pub rate: u32,
    /// Nominal run duration in seconds; total submissions = rate * duration
    pub duration_secs: u32,
    /// Worker pool capacity (simultaneous in-flight requests)
    pub concurrency: usize,
    pub pacing: Pacing,
    /// Optional global deadline. When it expires, submission stops,
    /// outstanding requests are cancelled, and the run is reported as
    /// aborted. Outcomes that completed before expiry are kept.
    pub deadline: Option<Duration>,
}

impl DriverConfig {
    /// Total number of requests a full run submits.
    pub fn total_requests(&self) -> u64 {
        u64::from(self.rate) * u64::from(self.duration_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.rate == 0 {
            return Err(CoreError::InvalidConfig("rate must be positive".into()));
        }
        if self.duration_secs == 0 {
            return Err(CoreError::InvalidConfig(
                "duration must be positive".into(),
            ));
        }
        if self.concurrency == 0 {
            return Err(CoreError::InvalidConfig(
                "concurrency must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Everything a driver run produced: outcomes in completion order plus run
/// metadata. The outcome count always equals the number of requests that
/// completed before the run terminated.
#[derive(Debug)]
pub struct DriveReport {
    /// Outcomes in completion order, not submission order
    pub outcomes: Vec<Outcome>,
    /// Requests actually submitted (less than planned only when aborted)
    pub submitted: u64,
    /// Wall-clock time from first submission to full drain
    pub wall_clock: Duration,
    pub state: RunState,
}

/// Dispatch `rate * duration` invocations of `task` through a pool of
/// `concurrency` workers and collect one outcome per invocation.
///
/// `task` receives the submission sequence number and must itself convert
/// any failure into a failed `Outcome`; the driver never aborts on a
/// per-request error.
pub async fn drive<T, F>(config: &DriverConfig, task: T) -> Result<DriveReport>
where
    T: Fn(u64) -> F,
    F: Future<Output = Outcome> + Send + 'static,
{
    config.validate()?;

    let total = config.total_requests();
    let interval = Duration::from_secs_f64(1.0 / f64::from(config.rate));
    let semaphore = Arc::new(Semaphore::new(config.concurrency));
    let mut tasks: JoinSet<Outcome> = JoinSet::new();

    let start = Instant::now();
    let deadline = config.deadline.map(|d| start + d);
    let mut submitted = 0u64;
    let mut state = RunState::Completed;

    'submission: for seq in 0..total {
        // Pace the submission, not the completion. The deadline caps the
        // pacing sleep so an expiry is observed promptly even at low rates.
        let next = start + interval.mul_f64(seq as f64);
        match deadline {
            Some(deadline) => tokio::time::sleep_until(next.min(deadline)).await,
            None => tokio::time::sleep_until(next).await,
        }

        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                warn!(submitted, total, "global deadline reached, aborting run");
                state = RunState::Aborted;
                break;
            }
        }

        let permit: Option<OwnedSemaphorePermit> = match config.pacing {
            Pacing::WallClock => None,
            Pacing::BestEffort => {
                // A saturated pool can block this acquisition indefinitely,
                // so it races against the deadline.
                let acquire = semaphore.clone().acquire_owned();
                let acquired = match deadline {
                    None => acquire.await,
                    Some(deadline) => tokio::select! {
                        permit = acquire => permit,
                        _ = tokio::time::sleep_until(deadline) => {
                            warn!(
                                submitted,
                                total,
                                "global deadline reached while waiting for a worker, aborting run"
                            );
                            state = RunState::Aborted;
                            break 'submission;
                        }
                    },
                };
                Some(acquired.expect("worker pool semaphore closed"))
            }
        };

        let fut = task(seq);
        let semaphore = semaphore.clone();
        tasks.spawn(async move {
            let _permit = match permit {
                Some(permit) => permit,
                None => semaphore
                    .acquire_owned()
                    .await
                    .expect("worker pool semaphore closed"),
            };
            fut.await
        });

        submitted += 1;
        if submitted % 100 == 0 {
            debug!(submitted, total, "submission progress");
        }
    }

    // Barrier: let every in-flight request drain before reporting. An
    // aborted run cancels outstanding requests instead, since a hung
    // request would otherwise hold the barrier past the deadline.
    if state == RunState::Aborted {
        tasks.abort_all();
    }
    let mut outcomes = Vec::with_capacity(submitted as usize);
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) if err.is_cancelled() => {}
            Err(err) => warn!(error = %err, "worker task failed to join"),
        }
    }

    Ok(DriveReport {
        outcomes,
        submitted,
        wall_clock: start.elapsed(),
        state,
    })
}
