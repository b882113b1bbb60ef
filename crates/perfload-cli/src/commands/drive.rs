// `perfload drive`: rate-controlled load test against one endpoint

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Args;

use perfload_client::{run_load_test, ApiClient, LoadTestConfig, Method, RequestSpec};
use perfload_core::{DriverConfig, Pacing};

use crate::{charts, report};

#[derive(Args, Debug)]
pub struct DriveArgs {
    /// API base URL
    #[arg(long, env = "PERFLOAD_API_URL")]
    pub api_url: String,

    /// Bearer token sent with every request
    #[arg(long, env = "PERFLOAD_TOKEN")]
    pub token: String,

    /// Endpoint path to test, relative to the base URL
    #[arg(long)]
    pub endpoint: String,

    /// HTTP method
    #[arg(long, value_enum, default_value_t = MethodArg::Get)]
    pub method: MethodArg,

    /// JSON file with the request body (POST only)
    #[arg(long)]
    pub data_file: Option<PathBuf>,

    /// Target requests per second
    #[arg(long, default_value_t = 10)]
    pub rps: u32,

    /// Test duration in seconds
    #[arg(long, default_value_t = 60)]
    pub duration: u32,

    /// Concurrency level (simultaneous in-flight requests)
    #[arg(long, default_value_t = 10)]
    pub concurrency: usize,

    /// Gate submissions on worker availability instead of the wall clock
    #[arg(long)]
    pub best_effort: bool,

    /// Per-request timeout in seconds; a timed out request counts as failed.
    /// Without it a hung request occupies its worker indefinitely.
    #[arg(long)]
    pub request_timeout: Option<u64>,

    /// Global deadline in seconds; when it expires, submission stops,
    /// outstanding requests are cancelled, and the run is reported as
    /// aborted
    #[arg(long)]
    pub max_runtime: Option<u64>,

    /// Output file for the run summary (JSON)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Directory for the rendered charts
    #[arg(long, default_value = ".")]
    pub charts_dir: PathBuf,

    /// Skip chart rendering
    #[arg(long)]
    pub no_charts: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum MethodArg {
    #[value(alias = "GET")]
    Get,
    #[value(alias = "POST")]
    Post,
}

impl From<MethodArg> for Method {
    fn from(value: MethodArg) -> Self {
        match value {
            MethodArg::Get => Method::Get,
            MethodArg::Post => Method::Post,
        }
    }
}

pub async fn run(args: DriveArgs) -> anyhow::Result<()> {
    // Startup validation happens before any request is issued.
    let body = match (&args.method, &args.data_file) {
        (MethodArg::Post, Some(path)) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read data file {}", path.display()))?;
            Some(
                serde_json::from_str(&raw)
                    .with_context(|| format!("data file {} is not valid JSON", path.display()))?,
            )
        }
        (MethodArg::Get, Some(_)) => {
            anyhow::bail!("--data-file is only valid with --method post")
        }
        _ => None,
    };

    let client = ApiClient::with_timeout(
        &args.api_url,
        &args.token,
        args.request_timeout.map(Duration::from_secs),
    )?;
    let spec = RequestSpec {
        endpoint: args.endpoint.clone(),
        method: args.method.into(),
        body,
    };
    let config = LoadTestConfig {
        driver: DriverConfig {
            rate: args.rps,
            duration_secs: args.duration,
            concurrency: args.concurrency,
            pacing: if args.best_effort {
                Pacing::BestEffort
            } else {
                Pacing::WallClock
            },
            deadline: args.max_runtime.map(Duration::from_secs),
        },
        show_progress: true,
    };

    println!(
        "Running load test on {}/{} with {} requests per second for {} seconds",
        args.api_url.trim_end_matches('/'),
        args.endpoint.trim_start_matches('/'),
        args.rps,
        args.duration
    );

    let (summary, drive_report) = run_load_test(&client, &spec, &config).await?;

    report::print_run_summary(&summary);

    if !args.no_charts {
        let durations: Vec<f64> = drive_report
            .outcomes
            .iter()
            .map(|o| o.elapsed.as_secs_f64())
            .collect();
        let histogram = charts::render_histogram(&durations, &args.charts_dir)?;
        println!("\nResponse time histogram saved to {}", histogram.display());
        let line = charts::render_line(&durations, &args.charts_dir)?;
        println!("Response time line chart saved to {}", line.display());
    }

    if let Some(path) = &args.output {
        report::write_json(&summary, path)?;
        println!("\nResults saved to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> DriveArgs {
        DriveArgs {
            api_url: "http://localhost:8080".into(),
            token: "t".into(),
            endpoint: "portfolios".into(),
            method: MethodArg::Get,
            data_file: None,
            rps: 1,
            duration: 1,
            concurrency: 1,
            best_effort: false,
            request_timeout: None,
            max_runtime: None,
            output: None,
            charts_dir: PathBuf::from("."),
            no_charts: true,
        }
    }

    #[tokio::test]
    async fn data_file_with_get_is_fatal() {
        let err = run(DriveArgs {
            data_file: Some(PathBuf::from("body.json")),
            ..args()
        })
        .await
        .unwrap_err();
        assert!(err.to_string().contains("--data-file"));
    }

    #[tokio::test]
    async fn unreadable_data_file_is_fatal() {
        let err = run(DriveArgs {
            method: MethodArg::Post,
            data_file: Some(PathBuf::from("/nonexistent/body.json")),
            ..args()
        })
        .await
        .unwrap_err();
        assert!(err.to_string().contains("failed to read data file"));
    }
}
