// Console and JSON reporting

use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use perfload_client::SeedReport;
use perfload_core::{RunState, RunSummary};

pub fn print_run_summary(summary: &RunSummary) {
    println!("\nLoad Test Results:");
    if summary.run_state == RunState::Aborted {
        println!("Run aborted: the global deadline expired before every request was submitted");
    }
    println!("Total Requests: {}", summary.total_requests);
    println!(
        "Successful Requests: {} ({:.2}%)",
        summary.successful_requests, summary.success_rate
    );
    println!(
        "Failed Requests: {} ({:.2}%)",
        summary.failed_requests,
        100.0 - summary.success_rate
    );
    println!("Actual Duration: {:.2}s", summary.actual_duration);
    println!("Actual Requests Per Second: {:.2}", summary.actual_rps);

    let rt = &summary.response_time;
    println!("\nResponse Time Statistics:");
    println!("Average: {:.2}ms", rt.avg * 1000.0);
    println!("Min: {:.2}ms", rt.min * 1000.0);
    println!("Max: {:.2}ms", rt.max * 1000.0);
    println!("P50: {:.2}ms", rt.p50 * 1000.0);
    println!("P90: {:.2}ms", rt.p90 * 1000.0);
    println!("P95: {:.2}ms", rt.p95 * 1000.0);
    println!("P99: {:.2}ms", rt.p99 * 1000.0);
}

pub fn print_seed_report(report: &SeedReport) {
    println!("\nTest Results:");
    println!("Portfolios: {}", report.portfolios);
    println!("Items: {}", report.items);
    println!("Transactions: {}", report.transactions);

    let calc = &report.individual_calculation;
    if calc.count > 0 {
        println!("\nIndividual Performance Calculation:");
        println!("Count: {}", calc.count);
        if let Some(avg) = calc.avg_duration {
            println!("Average Duration: {avg:.2}s");
        }
        if let Some(min) = calc.min_duration {
            println!("Min Duration: {min:.2}s");
        }
        if let Some(max) = calc.max_duration {
            println!("Max Duration: {max:.2}s");
        }
    }

    if let Some(duration) = report.batch_calculation.duration {
        println!("\nBatch Performance Calculation:");
        println!("Duration: {duration:.2}s");
    }
}

pub fn write_json<T: Serialize>(value: &T, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize results")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write results to {}", path.display()))?;
    Ok(())
}
