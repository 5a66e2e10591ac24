use crate::aggregator::{AggregateRow, PercentileRow};
use crate::error::AnalyzerError::RenderError;
use crate::error::AnalyzerResult;
use crate::sample::Sample;
use crate::scale::{AxisScale, ScaleDecision};
use crate::size_category::SizeCategory;
use crate::utils::create_parent_directory;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartStyle {
    Line,
    Scatter,
}

/// Stroke pattern of a line series. Percentile charts draw p50 solid,
/// p75 dashed and p90 dotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Solid,
    Dashed,
    Dotted,
}

impl LineKind {
    /// Dash length and gap in pixels, `None` for a continuous line.
    pub fn dash_pattern(self) -> Option<(u32, u32)> {
        match self {
            LineKind::Solid => None,
            LineKind::Dashed => Some((5, 2)),
            LineKind::Dotted => Some((2, 2)),
        }
    }

    pub fn stroke_width(self) -> u32 {
        match self {
            LineKind::Solid => 2,
            LineKind::Dashed | LineKind::Dotted => 1,
        }
    }
}

const PERCENTILE_LEGEND: [(LineKind, &str); 3] = [
    (LineKind::Solid, "50th percentile (solid)"),
    (LineKind::Dashed, "75th percentile (dashed)"),
    (LineKind::Dotted, "90th percentile (dotted)"),
];

/// One plotted value. Error bounds are absolute y values, equal to `y`
/// when there is no spread to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    pub series: String,
    pub category: SizeCategory,
    pub line: LineKind,
    pub y_error_low: f64,
    pub y_error_high: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub style: ChartStyle,
    pub points: Vec<ChartPoint>,
    pub scale: ScaleDecision,
}

impl ChartData {
    /// Mean latency against throughput, error bars at one standard deviation.
    pub fn from_statistics(
        rows: &[AggregateRow],
        scale: ScaleDecision,
    ) -> Self {
        let mut sorted: Vec<&AggregateRow> = rows.iter().collect();
        sorted.sort_by_key(|r| (r.size_category, r.thread_count));

        let points = sorted
            .into_iter()
            .map(|r| ChartPoint {
                x: r.throughput,
                y: r.mean_latency,
                series: r.size_category.to_string(),
                category: r.size_category,
                line: LineKind::Solid,
                y_error_low: (r.mean_latency - r.stddev_latency).max(0.0),
                y_error_high: r.mean_latency + r.stddev_latency,
            })
            .collect();

        ChartData {
            title: "Mean Latency vs Throughput by Payload Size".to_string(),
            x_label: "Throughput (requests/s)".to_string(),
            y_label: "Latency (ms)".to_string(),
            style: ChartStyle::Line,
            points,
            scale,
        }
    }

    /// P50/P75/P90 lines against thread count, one series per percentile and size.
    pub fn from_percentiles(rows: &[PercentileRow]) -> Self {
        let mut sorted: Vec<&PercentileRow> = rows.iter().collect();
        sorted.sort_by_key(|r| (r.size_category, r.thread_count));

        let selectors: [(&str, LineKind, fn(&PercentileRow) -> f64); 3] = [
            ("p50", LineKind::Solid, |r| r.p50),
            ("p75", LineKind::Dashed, |r| r.p75),
            ("p90", LineKind::Dotted, |r| r.p90),
        ];
        let mut points = Vec::with_capacity(sorted.len() * selectors.len());
        for (name, line, value) in selectors {
            for r in sorted.iter().copied() {
                let y = value(r);
                points.push(ChartPoint {
                    x: r.thread_count as f64,
                    y,
                    series: format!("{} {}", r.size_category, name),
                    category: r.size_category,
                    line,
                    y_error_low: y,
                    y_error_high: y,
                });
            }
        }

        ChartData {
            title: "Latency Percentiles vs Thread Count by Payload Size".to_string(),
            x_label: "Thread Count (allThreads)".to_string(),
            y_label: "Latency (ms)".to_string(),
            style: ChartStyle::Line,
            points,
            scale: ScaleDecision::linear(),
        }
    }

    /// Every individual sample, latency against thread count.
    pub fn from_samples(samples: &[Sample]) -> Self {
        let mut points: Vec<ChartPoint> = samples
            .iter()
            .map(|s| ChartPoint {
                x: s.active_threads as f64,
                y: s.elapsed_ms,
                series: s.size_category().to_string(),
                category: s.size_category(),
                line: LineKind::Solid,
                y_error_low: s.elapsed_ms,
                y_error_high: s.elapsed_ms,
            })
            .collect();
        // stable, keeps file order inside a size
        points.sort_by_key(|p| p.category);

        ChartData {
            title: "Latency vs Thread Count by Payload Size".to_string(),
            x_label: "Thread Count (allThreads)".to_string(),
            y_label: "Latency (ms)".to_string(),
            style: ChartStyle::Scatter,
            points,
            scale: ScaleDecision::linear(),
        }
    }

    /// Series labels in first-appearance order.
    pub fn series(&self) -> Vec<(&str, SizeCategory, LineKind)> {
        let mut series: Vec<(&str, SizeCategory, LineKind)> = Vec::new();
        for p in &self.points {
            if !series.iter().any(|(label, _, _)| *label == p.series) {
                series.push((p.series.as_str(), p.category, p.line));
            }
        }
        series
    }

    /// Legend text: one entry per payload size, then one entry per line
    /// pattern when the chart mixes patterns.
    pub fn legend(&self) -> Vec<String> {
        let mut legend: Vec<String> = Vec::new();
        for (_, category, line) in self.series() {
            if line == LineKind::Solid && !legend.iter().any(|l| l == category.label()) {
                legend.push(category.to_string());
            }
        }
        if self.has_line_patterns() {
            legend.extend(PERCENTILE_LEGEND.iter().map(|(_, text)| text.to_string()));
        }
        legend
    }

    fn has_line_patterns(&self) -> bool {
        self.points.iter().any(|p| p.line != LineKind::Solid)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

pub trait ChartRenderer {
    fn render(
        &self,
        data: &ChartData,
        path: &Path,
    ) -> AnalyzerResult<()>;
}

/// Renders charts to SVG files with plotters.
#[derive(Debug, Clone)]
pub struct SvgChartRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for SvgChartRenderer {
    fn default() -> Self {
        SvgChartRenderer {
            width: 1400,
            height: 800,
        }
    }
}

fn axis_value(
    v: f64,
    scale: AxisScale,
) -> Option<f64> {
    match scale {
        AxisScale::Linear => Some(v),
        AxisScale::Logarithmic if v > 0.0 => Some(v.log10()),
        AxisScale::Logarithmic => None,
    }
}

fn axis_label(
    v: f64,
    scale: AxisScale,
) -> String {
    match scale {
        AxisScale::Linear => format!("{}", (v * 100.0).round() / 100.0),
        AxisScale::Logarithmic => format!("{}", (10f64.powf(v) * 100.0).round() / 100.0),
    }
}

/// Padded axis range over the transformed values.
fn axis_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
    (min - pad)..(max + pad)
}

fn series_color(category: SizeCategory) -> RGBColor {
    let c = Palette99::pick(category.ordinal()).to_rgba();
    RGBColor(c.0, c.1, c.2)
}

impl ChartRenderer for SvgChartRenderer {
    fn render(
        &self,
        data: &ChartData,
        path: &Path,
    ) -> AnalyzerResult<()> {
        create_parent_directory(path)?;
        draw_chart(self, data, path).map_err(|e| RenderError(e.to_string()))?;
        info!("Graph saved to: {}", path.display());
        Ok(())
    }
}

fn draw_chart(
    renderer: &SvgChartRenderer,
    data: &ChartData,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let scale = data.scale;
    let plotted: Vec<(&ChartPoint, f64, f64)> = data
        .points
        .iter()
        .filter_map(|p| {
            let x = axis_value(p.x, scale.x)?;
            let y = axis_value(p.y, scale.y)?;
            Some((p, x, y))
        })
        .collect();

    let x_range = axis_range(plotted.iter().map(|(_, x, _)| *x));
    let y_range = axis_range(plotted.iter().flat_map(|(p, _, y)| {
        let low = axis_value(p.y_error_low, scale.y).unwrap_or(*y);
        let high = axis_value(p.y_error_high, scale.y).unwrap_or(*y);
        [low, *y, high]
    }));

    let root = SVGBackend::new(path, (renderer.width, renderer.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&data.title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)?;

    let x_formatter = |v: &f64| axis_label(*v, scale.x);
    let y_formatter = |v: &f64| axis_label(*v, scale.y);
    chart
        .configure_mesh()
        .x_desc(data.x_label.as_str())
        .y_desc(data.y_label.as_str())
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .light_line_style(BLACK.mix(0.05))
        .draw()?;

    let mut labelled: Vec<SizeCategory> = Vec::new();
    for (label, category, line) in data.series() {
        let color = series_color(category);
        let style = color.stroke_width(line.stroke_width());
        let points: Vec<(f64, f64)> = plotted
            .iter()
            .filter(|(p, _, _)| p.series == label)
            .map(|(_, x, y)| (*x, *y))
            .collect();

        let annotation = match (data.style, line.dash_pattern()) {
            (ChartStyle::Line, None) => {
                chart.draw_series(LineSeries::new(points.iter().copied(), style))?
            }
            (ChartStyle::Line, Some((size, spacing))) => chart.draw_series(
                DashedLineSeries::new(points.iter().copied(), size, spacing, style),
            )?,
            (ChartStyle::Scatter, _) => chart.draw_series(
                points
                    .iter()
                    .map(|(x, y)| Circle::new((*x, *y), 2, color.mix(0.6).filled())),
            )?,
        };
        // one legend entry per size, taken from its solid series
        if line == LineKind::Solid && !labelled.contains(&category) {
            labelled.push(category);
            annotation.label(category.label()).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
        }

        if data.style == ChartStyle::Line && line == LineKind::Solid {
            chart.draw_series(
                points
                    .iter()
                    .map(|(x, y)| Circle::new((*x, *y), 4, color.filled())),
            )?;
            chart.draw_series(
                plotted
                    .iter()
                    .filter(|(p, _, _)| p.series == label && p.y_error_high > p.y_error_low)
                    .map(|(p, x, y)| {
                        let low = axis_value(p.y_error_low, scale.y).unwrap_or(*y);
                        let high = axis_value(p.y_error_high, scale.y).unwrap_or(*y);
                        ErrorBar::new_vertical(*x, low, *y, high, color.stroke_width(1), 8)
                    }),
            )?;
        }
    }

    if data.has_line_patterns() {
        for (line, text) in PERCENTILE_LEGEND {
            let style = RGBColor(128, 128, 128).stroke_width(line.stroke_width());
            chart
                .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())?
                .label(text)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        }
    }

    if !plotted.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_row(
        threads: u32,
        category: SizeCategory,
        throughput: f64,
        mean: f64,
        stddev: f64,
    ) -> AggregateRow {
        AggregateRow {
            thread_count: threads,
            size_category: category,
            throughput,
            mean_latency: mean,
            median_latency: mean,
            stddev_latency: stddev,
            min_latency: mean - stddev,
            max_latency: mean + stddev,
            sample_count: 10,
        }
    }

    #[test]
    fn test_statistics_points_and_error_bars() {
        let rows = vec![
            stats_row(2, SizeCategory::Kb4, 200.0, 5.0, 1.0),
            stats_row(1, SizeCategory::Kb4, 100.0, 3.0, 4.0),
            stats_row(1, SizeCategory::Kb1, 120.0, 2.0, 0.5),
        ];
        let data = ChartData::from_statistics(&rows, ScaleDecision::linear());

        assert_eq!(data.style, ChartStyle::Line);
        assert_eq!(data.points.len(), 3);
        assert_eq!(data.points[0].series, "1KB");
        assert_eq!(data.points[1].x, 100.0);
        // error bar is clamped at zero latency
        assert_eq!(data.points[1].y_error_low, 0.0);
        assert_eq!(data.points[1].y_error_high, 7.0);
        assert_eq!(data.points[2].y_error_low, 4.0);
        assert_eq!(
            data.series(),
            vec![
                ("1KB", SizeCategory::Kb1, LineKind::Solid),
                ("4KB", SizeCategory::Kb4, LineKind::Solid)
            ]
        );
        assert_eq!(data.legend(), vec!["1KB", "4KB"]);
    }

    #[test]
    fn test_percentile_series() {
        let rows = vec![
            PercentileRow {
                thread_count: 4,
                size_category: SizeCategory::Mb1,
                p50: 10.0,
                p75: 20.0,
                p90: 30.0,
                sample_count: 5,
            },
            PercentileRow {
                thread_count: 1,
                size_category: SizeCategory::Mb1,
                p50: 1.0,
                p75: 2.0,
                p90: 3.0,
                sample_count: 5,
            },
        ];
        let data = ChartData::from_percentiles(&rows);
        assert_eq!(
            data.series(),
            vec![
                ("1MB p50", SizeCategory::Mb1, LineKind::Solid),
                ("1MB p75", SizeCategory::Mb1, LineKind::Dashed),
                ("1MB p90", SizeCategory::Mb1, LineKind::Dotted)
            ]
        );
        assert_eq!(data.scale, ScaleDecision::linear());

        let p90: Vec<(f64, f64)> = data
            .points
            .iter()
            .filter(|p| p.series == "1MB p90")
            .map(|p| (p.x, p.y))
            .collect();
        assert_eq!(p90, vec![(1.0, 3.0), (4.0, 30.0)]);
    }

    #[test]
    fn test_percentile_lines_are_styled_per_percentile() {
        let rows: Vec<PercentileRow> = [SizeCategory::Kb1, SizeCategory::Mb5]
            .into_iter()
            .map(|category| PercentileRow {
                thread_count: 2,
                size_category: category,
                p50: 1.0,
                p75: 2.0,
                p90: 3.0,
                sample_count: 3,
            })
            .collect();
        let data = ChartData::from_percentiles(&rows);

        let p75 = data.points.iter().find(|p| p.series == "5MB p75").unwrap();
        assert_eq!(p75.line, LineKind::Dashed);
        assert_eq!(LineKind::Solid.dash_pattern(), None);
        assert_eq!(LineKind::Dashed.dash_pattern(), Some((5, 2)));
        assert_eq!(LineKind::Dotted.dash_pattern(), Some((2, 2)));
        assert!(LineKind::Dashed.stroke_width() < LineKind::Solid.stroke_width());
        assert!(LineKind::Dotted.stroke_width() < LineKind::Solid.stroke_width());
        assert_eq!(
            data.legend(),
            vec![
                "1KB",
                "5MB",
                "50th percentile (solid)",
                "75th percentile (dashed)",
                "90th percentile (dotted)"
            ]
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latency_percentiles_graph.svg");
        SvgChartRenderer::default().render(&data, &path).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("75th percentile (dashed)"));
    }

    #[test]
    fn test_scatter_groups_by_size() {
        let samples = vec![
            Sample {
                timestamp: 0,
                elapsed_ms: 9.0,
                sent_bytes: 5_242_880,
                active_threads: 8,
            },
            Sample {
                timestamp: 1,
                elapsed_ms: 1.0,
                sent_bytes: 1024,
                active_threads: 2,
            },
        ];
        let data = ChartData::from_samples(&samples);
        assert_eq!(data.style, ChartStyle::Scatter);
        assert_eq!(data.points[0].category, SizeCategory::Kb1);
        assert_eq!(data.points[1].x, 8.0);
    }

    #[test]
    fn test_log_axis_drops_non_positive_values() {
        assert_eq!(axis_value(0.0, AxisScale::Logarithmic), None);
        assert_eq!(axis_value(1000.0, AxisScale::Logarithmic), Some(3.0));
        assert_eq!(axis_value(0.0, AxisScale::Linear), Some(0.0));
        assert_eq!(axis_label(3.0, AxisScale::Logarithmic), "1000");
        assert_eq!(axis_label(2.5, AxisScale::Linear), "2.5");
    }

    #[test]
    fn test_axis_range_padding() {
        assert_eq!(axis_range(std::iter::empty()), 0.0..1.0);
        assert_eq!(axis_range([5.0].into_iter()), 4.0..6.0);
        let range = axis_range([0.0, 100.0].into_iter());
        assert_eq!(range, -5.0..105.0);
    }

    #[test]
    fn test_svg_renderer_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latency_stats_graph.svg");
        let rows = vec![
            stats_row(1, SizeCategory::Kb1, 150_000.0, 2.0, 0.5),
            stats_row(2, SizeCategory::Kb1, 0.0, 400.0, 20.0),
        ];
        let scale = ScaleDecision {
            x: AxisScale::Logarithmic,
            y: AxisScale::Logarithmic,
        };
        let data = ChartData::from_statistics(&rows, scale);
        SvgChartRenderer::default().render(&data, &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_svg_renderer_handles_empty_chart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.svg");
        let data = ChartData::from_percentiles(&[]);
        assert!(data.is_empty());
        SvgChartRenderer::default().render(&data, &path).unwrap();
        assert!(path.exists());
    }
}
