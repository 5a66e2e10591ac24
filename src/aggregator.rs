use crate::sample::Sample;
use crate::size_category::SizeCategory;
use serde::Serialize;
use std::collections::BTreeMap;

pub const PERCENTILES: [f64; 3] = [0.50, 0.75, 0.90];

/// Aggregation identity. Orders by thread count, then payload size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub active_threads: u32,
    pub size_category: SizeCategory,
}

impl GroupKey {
    pub fn of(sample: &Sample) -> Self {
        GroupKey {
            active_threads: sample.active_threads,
            size_category: sample.size_category(),
        }
    }
}

/// Samples sharing one `GroupKey`. Latencies keep file order.
#[derive(Debug, Clone)]
pub struct Group {
    pub latencies: Vec<f64>,
    pub min_timestamp: i64,
    pub max_timestamp: i64,
}

impl Group {
    fn new(sample: &Sample) -> Self {
        Group {
            latencies: vec![sample.elapsed_ms],
            min_timestamp: sample.timestamp,
            max_timestamp: sample.timestamp,
        }
    }

    fn push(
        &mut self,
        sample: &Sample,
    ) {
        self.latencies.push(sample.elapsed_ms);
        self.min_timestamp = self.min_timestamp.min(sample.timestamp);
        self.max_timestamp = self.max_timestamp.max(sample.timestamp);
    }

    fn len(&self) -> usize {
        self.latencies.len()
    }

    /// Samples per second over the observed timestamp span, 0 when the span is empty.
    pub fn throughput(&self) -> f64 {
        // abs_diff cannot overflow for timestamps at opposite ends of i64
        let span_secs = self.max_timestamp.abs_diff(self.min_timestamp) as f64 / 1000.0;
        if span_secs <= 0.0 {
            return 0.0;
        }
        self.len() as f64 / span_secs
    }

    fn sorted_latencies(&self) -> Vec<f64> {
        let mut sorted = self.latencies.clone();
        sorted.sort_by(f64::total_cmp);
        sorted
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub thread_count: u32,
    pub size_category: SizeCategory,
    pub throughput: f64,
    pub mean_latency: f64,
    pub median_latency: f64,
    pub stddev_latency: f64,
    pub min_latency: f64,
    pub max_latency: f64,
    pub sample_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentileRow {
    pub thread_count: u32,
    pub size_category: SizeCategory,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub sample_count: usize,
}

pub fn group_samples(samples: &[Sample]) -> BTreeMap<GroupKey, Group> {
    let mut groups: BTreeMap<GroupKey, Group> = BTreeMap::new();
    for sample in samples {
        groups
            .entry(GroupKey::of(sample))
            .and_modify(|group| group.push(sample))
            .or_insert_with(|| Group::new(sample));
    }
    groups
}

/// Nearest-rank percentile: `sorted[floor(n * q)]`, clamped to the last element.
fn nearest_rank(
    sorted: &[f64],
    q: f64,
) -> f64 {
    let idx = ((sorted.len() as f64) * q) as usize;
    sorted[idx.min(sorted.len() - 1)]
}

fn statistics_row(
    key: &GroupKey,
    group: &Group,
) -> AggregateRow {
    let sorted = group.sorted_latencies();
    let n = sorted.len() as f64;

    let mean = sorted.iter().sum::<f64>() / n;
    let variance = sorted.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / n;

    AggregateRow {
        thread_count: key.active_threads,
        size_category: key.size_category,
        throughput: group.throughput(),
        mean_latency: mean,
        // upper median for even n
        median_latency: sorted[sorted.len() / 2],
        stddev_latency: variance.sqrt(),
        min_latency: sorted[0],
        max_latency: sorted[sorted.len() - 1],
        sample_count: sorted.len(),
    }
}

fn percentile_row(
    key: &GroupKey,
    group: &Group,
) -> PercentileRow {
    let sorted = group.sorted_latencies();
    let [p50, p75, p90] = PERCENTILES.map(|q| nearest_rank(&sorted, q));

    PercentileRow {
        thread_count: key.active_threads,
        size_category: key.size_category,
        p50,
        p75,
        p90,
        sample_count: sorted.len(),
    }
}

/// Mean/median/stddev/extrema and throughput per (threads, size) group,
/// ordered by thread count then size.
pub fn aggregate_statistics(samples: &[Sample]) -> Vec<AggregateRow> {
    group_samples(samples)
        .iter()
        .map(|(key, group)| statistics_row(key, group))
        .collect()
}

/// P50/P75/P90 per (threads, size) group, ordered by thread count then size.
pub fn aggregate_percentiles(samples: &[Sample]) -> Vec<PercentileRow> {
    group_samples(samples)
        .iter()
        .map(|(key, group)| percentile_row(key, group))
        .collect()
}
