use crate::aggregator::AggregateRow;
use serde::Serialize;
use strum_macros::Display;

/// Throughput above which the x axis switches to a log scale.
pub const LOG_THROUGHPUT_THRESHOLD: f64 = 100_000.0;
/// max/min mean latency ratio above which the y axis switches to a log scale.
pub const LOG_LATENCY_RATIO_THRESHOLD: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    #[default]
    Linear,
    Logarithmic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScaleDecision {
    pub x: AxisScale,
    pub y: AxisScale,
}

impl ScaleDecision {
    pub fn linear() -> Self {
        ScaleDecision::default()
    }
}

pub fn select_scale(rows: &[AggregateRow]) -> ScaleDecision {
    ScaleDecision {
        x: throughput_scale(rows),
        y: latency_scale(rows),
    }
}

fn throughput_scale(rows: &[AggregateRow]) -> AxisScale {
    let max_throughput = rows
        .iter()
        .map(|r| r.throughput)
        .fold(f64::NEG_INFINITY, f64::max);
    if max_throughput > LOG_THROUGHPUT_THRESHOLD {
        AxisScale::Logarithmic
    } else {
        AxisScale::Linear
    }
}

fn latency_scale(rows: &[AggregateRow]) -> AxisScale {
    let max_latency = rows
        .iter()
        .map(|r| r.mean_latency)
        .fold(f64::NEG_INFINITY, f64::max);
    // zero latencies would collapse the ratio
    let min_positive = rows
        .iter()
        .map(|r| r.mean_latency)
        .filter(|l| *l > 0.0)
        .fold(f64::INFINITY, f64::min);

    if !min_positive.is_finite() {
        return AxisScale::Linear;
    }
    if max_latency / min_positive > LOG_LATENCY_RATIO_THRESHOLD {
        AxisScale::Logarithmic
    } else {
        AxisScale::Linear
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::size_category::SizeCategory;

    fn row(
        throughput: f64,
        mean_latency: f64,
    ) -> AggregateRow {
        AggregateRow {
            thread_count: 1,
            size_category: SizeCategory::Kb1,
            throughput,
            mean_latency,
            median_latency: mean_latency,
            stddev_latency: 0.0,
            min_latency: mean_latency,
            max_latency: mean_latency,
            sample_count: 1,
        }
    }

    #[test]
    fn test_empty_table_is_linear() {
        assert_eq!(select_scale(&[]), ScaleDecision::linear());
    }

    #[test]
    fn test_throughput_threshold_is_exclusive() {
        let at = select_scale(&[row(100_000.0, 10.0)]);
        assert_eq!(at.x, AxisScale::Linear);

        let above = select_scale(&[row(10.0, 10.0), row(100_000.5, 10.0)]);
        assert_eq!(above.x, AxisScale::Logarithmic);
    }

    #[test]
    fn test_latency_ratio_threshold() {
        let at = select_scale(&[row(1.0, 1.0), row(1.0, 100.0)]);
        assert_eq!(at.y, AxisScale::Linear);

        let above = select_scale(&[row(1.0, 1.0), row(1.0, 101.0)]);
        assert_eq!(above.y, AxisScale::Logarithmic);
    }

    #[test]
    fn test_zero_latency_excluded_from_minimum() {
        let decision = select_scale(&[row(1.0, 0.0), row(1.0, 2.0), row(1.0, 150.0)]);
        assert_eq!(decision.y, AxisScale::Linear);

        let decision = select_scale(&[row(1.0, 0.0), row(1.0, 1.0), row(1.0, 150.0)]);
        assert_eq!(decision.y, AxisScale::Logarithmic);
    }

    #[test]
    fn test_no_positive_latency_defaults_to_linear() {
        let decision = select_scale(&[row(1.0, 0.0), row(2.0, 0.0)]);
        assert_eq!(decision.y, AxisScale::Linear);
    }

    #[test]
    fn test_display() {
        assert_eq!(AxisScale::Logarithmic.to_string(), "logarithmic");
        assert_eq!(AxisScale::Linear.to_string(), "linear");
    }
}
