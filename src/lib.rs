pub mod aggregator;
pub mod chart;
pub mod cli;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod sample;
pub mod scale;
pub mod size_category;
pub mod thread_policy;
pub mod utils;
