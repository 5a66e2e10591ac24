use crate::aggregator::{AggregateRow, PercentileRow};
use crate::utils::format_number;

const STATISTICS_HEADER: [&str; 6] = [
    "Threads",
    "Size",
    "Throughput (req/s)",
    "Mean (ms)",
    "StdDev (ms)",
    "Samples",
];
const PERCENTILE_HEADER: [&str; 6] = ["Threads", "Size", "P50 (ms)", "P75 (ms)", "P90 (ms)", "Samples"];

// column widths, first two left aligned
const WIDTHS: [usize; 6] = [8, 7, 19, 12, 12, 10];

fn push_line(
    out: &mut String,
    cells: [&str; 6],
) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(WIDTHS).enumerate() {
        if i > 0 {
            line.push(' ');
        }
        if i < 2 {
            line.push_str(&format!("{:<width$}", cell, width = width));
        } else {
            line.push_str(&format!("{:>width$}", cell, width = width));
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

fn push_header(
    out: &mut String,
    header: [&str; 6],
) {
    push_line(out, header);
    let total = WIDTHS.iter().sum::<usize>() + WIDTHS.len() - 1;
    out.push_str(&"-".repeat(total));
    out.push('\n');
}

/// Fixed-width statistics table, one line per group.
pub fn statistics_table(rows: &[AggregateRow]) -> String {
    let mut out = String::new();
    push_header(&mut out, STATISTICS_HEADER);
    for row in rows {
        let threads = row.thread_count.to_string();
        let throughput = format!("{:.2}", row.throughput);
        let mean = format!("{:.2}", row.mean_latency);
        let stddev = format!("{:.2}", row.stddev_latency);
        let samples = format_number(row.sample_count as u64);
        push_line(
            &mut out,
            [
                &threads,
                row.size_category.label(),
                &throughput,
                &mean,
                &stddev,
                &samples,
            ],
        );
    }
    out
}

/// Fixed-width percentile table, one line per group.
pub fn percentile_table(rows: &[PercentileRow]) -> String {
    let mut out = String::new();
    push_header(&mut out, PERCENTILE_HEADER);
    for row in rows {
        let threads = row.thread_count.to_string();
        let p50 = format!("{:.2}", row.p50);
        let p75 = format!("{:.2}", row.p75);
        let p90 = format!("{:.2}", row.p90);
        let samples = format_number(row.sample_count as u64);
        push_line(
            &mut out,
            [
                &threads,
                row.size_category.label(),
                &p50,
                &p75,
                &p90,
                &samples,
            ],
        );
    }
    out
}
