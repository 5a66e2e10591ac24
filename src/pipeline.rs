use crate::aggregator::{aggregate_percentiles, aggregate_statistics, AggregateRow, PercentileRow};
use crate::chart::{ChartData, ChartRenderer};
use crate::cli::AnalysisMode;
use crate::error::AnalyzerResult;
use crate::report::{percentile_table, statistics_table};
use crate::sample::{load_samples, Sample};
use crate::scale::{select_scale, AxisScale, ScaleDecision};
use crate::thread_policy::ThreadPolicy;
use crate::utils::write_to_file;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub csv_file: PathBuf,
    pub mode: AnalysisMode,
    pub thread_policy: ThreadPolicy,
    /// `None` skips the chart.
    pub chart_output: Option<PathBuf>,
    pub json_output: Option<PathBuf>,
}

impl AnalysisConfig {
    pub fn new(
        csv_file: impl Into<PathBuf>,
        mode: AnalysisMode,
    ) -> Self {
        AnalysisConfig {
            csv_file: csv_file.into(),
            mode,
            thread_policy: ThreadPolicy::default(),
            chart_output: Some(mode.default_output()),
            json_output: None,
        }
    }
}

/// Rows produced by one run, in presentation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", content = "rows", rename_all = "lowercase")]
pub enum AnalysisRows {
    Stats(Vec<AggregateRow>),
    Percentiles(Vec<PercentileRow>),
}

impl AnalysisRows {
    pub fn len(&self) -> usize {
        match self {
            AnalysisRows::Stats(rows) => rows.len(),
            AnalysisRows::Percentiles(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn table(&self) -> String {
        match self {
            AnalysisRows::Stats(rows) => statistics_table(rows),
            AnalysisRows::Percentiles(rows) => percentile_table(rows),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub sample_count: usize,
    pub rows: AnalysisRows,
    pub scale: ScaleDecision,
    pub table: String,
}

fn log_scale_decision(
    mode: AnalysisMode,
    samples: &[Sample],
    rows: &AnalysisRows,
    scale: ScaleDecision,
) {
    match (mode, rows) {
        (AnalysisMode::Stats, AnalysisRows::Stats(stats)) => {
            let max_throughput = stats.iter().map(|r| r.throughput).fold(0.0, f64::max);
            if scale.x == AxisScale::Logarithmic {
                info!(
                    "Using logarithmic x axis (max throughput {:.0} req/s)",
                    max_throughput
                );
            } else {
                info!(
                    "Using linear x axis (max throughput {:.2} req/s)",
                    max_throughput
                );
            }
            info!("Using {} y axis", scale.y);
        }
        _ => {
            let min_threads = samples.iter().map(|s| s.active_threads).min();
            let max_threads = samples.iter().map(|s| s.active_threads).max();
            if let (Some(min), Some(max)) = (min_threads, max_threads) {
                info!("Using linear axes (thread range: {}-{})", min, max);
            }
        }
    }
}

/// Load, aggregate, report and chart one results file.
///
/// The table is printed before the chart is rendered, so a render failure
/// still leaves the computed numbers on the console.
pub fn run_analysis(
    config: &AnalysisConfig,
    renderer: &dyn ChartRenderer,
) -> AnalyzerResult<AnalysisOutcome> {
    let samples = load_samples(&config.csv_file, config.thread_policy)?;
    if samples.is_empty() {
        warn!(
            "No samples matched thread policy {} ({:?})",
            config.thread_policy,
            config.thread_policy.allowed()
        );
    }

    let (rows, scale) = match config.mode {
        AnalysisMode::Stats | AnalysisMode::Scatter => {
            info!("Calculating statistics...");
            let rows = aggregate_statistics(&samples);
            let scale = if config.mode == AnalysisMode::Stats {
                select_scale(&rows)
            } else {
                ScaleDecision::linear()
            };
            (AnalysisRows::Stats(rows), scale)
        }
        AnalysisMode::Percentiles => {
            info!("Calculating percentiles...");
            (
                AnalysisRows::Percentiles(aggregate_percentiles(&samples)),
                ScaleDecision::linear(),
            )
        }
    };
    info!(
        "Aggregated {} thread count/payload combinations",
        rows.len()
    );

    let table = rows.table();
    println!("{}", table);

    if let Some(json_path) = &config.json_output {
        let json = serde_json::to_string_pretty(&rows)?;
        write_to_file(json_path, &json)?;
        info!("Rows written to: {}", json_path.display());
    }

    if let Some(chart_path) = &config.chart_output {
        log_scale_decision(config.mode, &samples, &rows, scale);
        let chart = match (&config.mode, &rows) {
            (AnalysisMode::Scatter, _) => ChartData::from_samples(&samples),
            (_, AnalysisRows::Stats(stats)) => ChartData::from_statistics(stats, scale),
            (_, AnalysisRows::Percentiles(pcts)) => ChartData::from_percentiles(pcts),
        };
        renderer.render(&chart, chart_path)?;
    }

    info!("Analysis complete!");
    Ok(AnalysisOutcome {
        sample_count: samples.len(),
        rows,
        scale,
        table,
    })
}
