// Chart rendering for drive results: a latency histogram and a
// latency-over-sequence line chart, written as PNGs.
//
// Only the bitmap backend is enabled; text rendering would pull in system
// font dependencies, so the charts carry data series without captions.

use std::path::{Path, PathBuf};

use plotters::prelude::*;

const HISTOGRAM_BINS: usize = 50;
const CHART_SIZE: (u32, u32) = (1000, 600);

/// Bin the latencies over the observed `[min, max]` range so a cluster far
/// from zero still spreads across the full bin count. Returns the range
/// start, the bin width, and the per-bin counts.
fn bin_counts(durations: &[f64]) -> (f64, f64, Vec<f64>) {
    let min = durations.iter().copied().fold(f64::INFINITY, f64::min);
    let max = durations.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let bin_width = ((max - min) / HISTOGRAM_BINS as f64).max(f64::EPSILON);
    let mut counts = vec![0.0f64; HISTOGRAM_BINS];
    for &duration in durations {
        let bin = (((duration - min) / bin_width) as usize).min(HISTOGRAM_BINS - 1);
        counts[bin] += 1.0;
    }
    (min, bin_width, counts)
}

/// Render the response-time distribution as a 50-bin histogram
/// (`response_time_histogram.png`). X axis: response time in seconds,
/// Y axis: request count.
pub fn render_histogram(durations: &[f64], dir: &Path) -> anyhow::Result<PathBuf> {
    anyhow::ensure!(!durations.is_empty(), "no latencies to chart");
    let path = dir.join("response_time_histogram.png");

    let (min, bin_width, counts) = bin_counts(durations);
    let span = bin_width * HISTOGRAM_BINS as f64;
    let peak = counts.iter().copied().fold(1.0f64, f64::max);

    let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| anyhow::anyhow!("failed to initialize histogram canvas: {e}"))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .build_cartesian_2d(min..min + span, 0.0..peak * 1.1)
        .map_err(|e| anyhow::anyhow!("failed to build histogram axes: {e}"))?;

    chart
        .draw_series(counts.iter().enumerate().map(|(bin, &count)| {
            let x0 = min + bin as f64 * bin_width;
            let x1 = x0 + bin_width;
            Rectangle::new([(x0, 0.0), (x1, count)], BLUE.mix(0.75).filled())
        }))
        .map_err(|e| anyhow::anyhow!("failed to draw histogram bars: {e}"))?;

    root.present()
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;
    drop(chart);
    drop(root);
    Ok(path)
}

/// Render response times in request-completion order
/// (`response_time_line.png`). X axis: request number, Y axis: response
/// time in seconds.
pub fn render_line(durations: &[f64], dir: &Path) -> anyhow::Result<PathBuf> {
    anyhow::ensure!(!durations.is_empty(), "no latencies to chart");
    let path = dir.join("response_time_line.png");

    let max = durations.iter().copied().fold(f64::EPSILON, f64::max);

    let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| anyhow::anyhow!("failed to initialize line chart canvas: {e}"))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .build_cartesian_2d(0..durations.len(), 0.0..max * 1.1)
        .map_err(|e| anyhow::anyhow!("failed to build line chart axes: {e}"))?;

    chart
        .draw_series(LineSeries::new(
            durations.iter().enumerate().map(|(i, &d)| (i, d)),
            &BLUE,
        ))
        .map_err(|e| anyhow::anyhow!("failed to draw latency series: {e}"))?;

    root.present()
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;
    drop(chart);
    drop(root);
    Ok(path)
}
