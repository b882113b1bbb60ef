// Load-test harness: wires the API client into the core driver and
// aggregates the collected outcomes into a run summary.

use indicatif::ProgressBar;
use tracing::info;

use perfload_core::{drive, DriveReport, DriverConfig, Result, RunSummary};

use crate::client::ApiClient;
use crate::spec::RequestSpec;

#[derive(Debug, Clone)]
pub struct LoadTestConfig {
    pub driver: DriverConfig,
    /// Render a progress bar while submissions complete (off in tests)
    pub show_progress: bool,
}

/// Run one rate-controlled load test: every submission sends `spec` through
/// `client`, outcomes are collected in completion order and aggregated.
///
/// Fails only on invalid configuration or an empty outcome sequence;
/// per-request failures are folded into the summary.
pub async fn run_load_test(
    client: &ApiClient,
    spec: &RequestSpec,
    config: &LoadTestConfig,
) -> Result<(RunSummary, DriveReport)> {
    info!(
        endpoint = %spec.endpoint,
        method = %spec.method,
        rate = config.driver.rate,
        duration_secs = config.driver.duration_secs,
        concurrency = config.driver.concurrency,
        "starting load test"
    );

    let progress = config
        .show_progress
        .then(|| ProgressBar::new(config.driver.total_requests()));

    let task = {
        let client = client.clone();
        let spec = spec.clone();
        let progress = progress.clone();
        move |_seq: u64| {
            let client = client.clone();
            let spec = spec.clone();
            let progress = progress.clone();
            async move {
                let outcome = client.send(&spec).await;
                if let Some(bar) = &progress {
                    bar.inc(1);
                }
                outcome
            }
        }
    };

    let report = drive(&config.driver, task).await?;
    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    let summary = RunSummary::from_outcomes(&report.outcomes, report.wall_clock, report.state)?;
    info!(
        total = summary.total_requests,
        success_rate = summary.success_rate,
        actual_rps = summary.actual_rps,
        "load test finished"
    );

    Ok((summary, report))
}
