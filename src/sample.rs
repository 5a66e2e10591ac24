use crate::error::AnalyzerError::{CsvReadError, FileNotFound, FileOpenError};
use crate::error::AnalyzerResult;
use crate::size_category::SizeCategory;
use crate::thread_policy::ThreadPolicy;
use csv::{Reader, ReaderBuilder, StringRecord, StringRecordsIntoIter};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

// JMeter CSV result layout (no header by default):
// timeStamp, elapsed, label, responseCode, responseMessage, threadName,
// dataType, success, failureMessage, bytes, sentBytes, grpThreads, allThreads, ...
const TIMESTAMP_COLUMN: usize = 0;
const ELAPSED_COLUMN: usize = 1;
const SENT_BYTES_COLUMN: usize = 10;
const ALL_THREADS_COLUMN: usize = 12;
const MIN_FIELDS: usize = 13;

/// One JMeter result row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Request start, milliseconds since epoch.
    pub timestamp: i64,
    pub elapsed_ms: f64,
    pub sent_bytes: u64,
    pub active_threads: u32,
}

impl Sample {
    /// Extract a sample from a raw row, `None` when the row is short or any
    /// required column is not numeric.
    pub fn from_record(record: &StringRecord) -> Option<Sample> {
        if record.len() < MIN_FIELDS {
            return None;
        }
        let timestamp = record.get(TIMESTAMP_COLUMN)?.parse::<i64>().ok()?;
        let elapsed_ms = record.get(ELAPSED_COLUMN)?.parse::<f64>().ok()?;
        let sent_bytes = record.get(SENT_BYTES_COLUMN)?.parse::<u64>().ok()?;
        let active_threads = record.get(ALL_THREADS_COLUMN)?.parse::<u32>().ok()?;

        if !elapsed_ms.is_finite() || elapsed_ms < 0.0 {
            return None;
        }

        Some(Sample {
            timestamp,
            elapsed_ms,
            sent_bytes,
            active_threads,
        })
    }

    pub fn size_category(&self) -> SizeCategory {
        SizeCategory::nearest(self.sent_bytes)
    }
}

/// Lazy iterator over the accepted samples of a results file.
///
/// Malformed rows and rows rejected by the thread policy are skipped and
/// counted. Only I/O failures are yielded as errors.
pub struct SampleReader {
    records: StringRecordsIntoIter<File>,
    policy: ThreadPolicy,
    loaded: usize,
    skipped: usize,
    finished: bool,
}

impl SampleReader {
    pub fn open(
        path: impl AsRef<Path>,
        policy: ThreadPolicy,
    ) -> AnalyzerResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FileNotFound(path.to_path_buf()));
        }
        let file = File::open(path).map_err(|source| FileOpenError {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_reader(reader_builder().from_reader(file), policy))
    }

    fn from_reader(
        reader: Reader<File>,
        policy: ThreadPolicy,
    ) -> Self {
        SampleReader {
            records: reader.into_records(),
            policy,
            loaded: 0,
            skipped: 0,
            finished: false,
        }
    }

    pub fn loaded(&self) -> usize {
        self.loaded
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for SampleReader {
    type Item = AnalyzerResult<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        for result in self.records.by_ref() {
            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() => {
                    self.finished = true;
                    return Some(Err(CsvReadError(e)));
                }
                Err(e) => {
                    debug!("Skipping malformed row: {}", e);
                    self.skipped += 1;
                    continue;
                }
            };
            match Sample::from_record(&record) {
                Some(sample) if self.policy.accepts(sample.active_threads) => {
                    self.loaded += 1;
                    return Some(Ok(sample));
                }
                _ => self.skipped += 1,
            }
        }
        self.finished = true;
        info!(
            "Loaded {} samples ({} rows skipped)",
            self.loaded, self.skipped
        );
        None
    }
}

fn reader_builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.has_headers(false).flexible(true);
    builder
}

/// Read every accepted sample of `path` into memory.
pub fn load_samples(
    path: impl AsRef<Path>,
    policy: ThreadPolicy,
) -> AnalyzerResult<Vec<Sample>> {
    let path = path.as_ref();
    info!("Reading JMeter results from: {}", path.display());
    SampleReader::open(path, policy)?.collect()
}
