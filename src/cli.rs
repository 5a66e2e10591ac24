use crate::thread_policy::ThreadPolicy;
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;
use std::str::FromStr;
use strum_macros::Display;

#[derive(Parser, Debug)]
#[command(name = "latency-analyzer", version, about="JMeter latency analysis tool", long_about = None, arg_required_else_help(true), propagate_version(true))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(arg_required_else_help = true)]
    GenerateAutoComplete { shell: Shell },

    #[command(arg_required_else_help = true)]
    Analyze {
        #[arg(required = true, help = "JMeter CSV results file")]
        csv_file: ExistingCsvFile,
        #[arg(
            short,
            long,
            value_enum,
            env = "LATENCY_MODE",
            default_value_t = AnalysisMode::Stats,
            help = "stats: mean/stddev vs throughput, percentiles: p50/p75/p90 vs threads, scatter: every sample"
        )]
        mode: AnalysisMode,
        #[arg(
            short,
            long,
            value_enum,
            env = "LATENCY_THREAD_POLICY",
            default_value_t = ThreadPolicy::PowersOfTwo,
            help = "accepted allThreads values"
        )]
        thread_policy: ThreadPolicy,
        #[arg(
            short,
            long,
            env = "LATENCY_OUTPUT",
            help = "chart file, defaults to latency_<mode>_graph.svg"
        )]
        output: Option<PathBuf>,
        #[arg(long, help = "also write the aggregate rows as json to this file")]
        json: Option<PathBuf>,
        #[arg(
            long,
            required = false,
            default_value_t = false,
            default_missing_value = "true",
            help = "print the table only, skip the chart"
        )]
        no_chart: bool,
        #[arg(
            short,
            long,
            required = false,
            default_value_t = false,
            default_missing_value = "true",
            help = "debug logging"
        )]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AnalysisMode {
    #[default]
    Stats,
    Percentiles,
    Scatter,
}

impl AnalysisMode {
    pub fn default_output(self) -> PathBuf {
        PathBuf::from(format!("latency_{}_graph.svg", self))
    }
}

#[derive(Clone, Debug)]
pub struct ExistingCsvFile(PathBuf);

impl ExistingCsvFile {
    pub fn path(&self) -> &PathBuf {
        &self.0
    }
}
impl FromStr for ExistingCsvFile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = PathBuf::from(s);

        if !path.exists() {
            return Err(format!("File not found: {}", s));
        }

        if !path.is_file() {
            return Err(format!("Not a file: {}", s));
        }

        Ok(ExistingCsvFile(path))
    }
}
