use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// Standard request payload sizes used by the load test plans.
///
/// Variants are declared in ascending size order; the derived `Ord` follows
/// that order and is used to sort report rows and chart series.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumIter,
    IntoStaticStr,
    Serialize,
)]
pub enum SizeCategory {
    #[strum(serialize = "1KB")]
    #[serde(rename = "1KB")]
    Kb1,
    #[strum(serialize = "4KB")]
    #[serde(rename = "4KB")]
    Kb4,
    #[strum(serialize = "50KB")]
    #[serde(rename = "50KB")]
    Kb50,
    #[strum(serialize = "200KB")]
    #[serde(rename = "200KB")]
    Kb200,
    #[strum(serialize = "1MB")]
    #[serde(rename = "1MB")]
    Mb1,
    #[strum(serialize = "2MB")]
    #[serde(rename = "2MB")]
    Mb2,
    #[strum(serialize = "5MB")]
    #[serde(rename = "5MB")]
    Mb5,
}

impl SizeCategory {
    pub fn bytes(self) -> u64 {
        match self {
            SizeCategory::Kb1 => 1024,
            SizeCategory::Kb4 => 4 * 1024,
            SizeCategory::Kb50 => 50 * 1024,
            SizeCategory::Kb200 => 200 * 1024,
            SizeCategory::Mb1 => 1024 * 1024,
            SizeCategory::Mb2 => 2 * 1024 * 1024,
            SizeCategory::Mb5 => 5 * 1024 * 1024,
        }
    }

    pub fn label(self) -> &'static str {
        self.into()
    }

    /// The category whose canonical size is closest to `sent_bytes`.
    /// Ties go to the smaller category.
    pub fn nearest(sent_bytes: u64) -> SizeCategory {
        let mut nearest = SizeCategory::Kb1;
        let mut min_diff = u64::MAX;
        for category in SizeCategory::iter() {
            let diff = sent_bytes.abs_diff(category.bytes());
            if diff < min_diff {
                min_diff = diff;
                nearest = category;
            }
        }
        nearest
    }

    /// Position in the fixed size order, used to pick a stable series colour.
    pub fn ordinal(self) -> usize {
        self as usize
    }
}
