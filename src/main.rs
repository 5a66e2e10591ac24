use clap::{Command, CommandFactory, Parser};
use clap_complete::{generate, Generator};
use latency_analyzer::chart::SvgChartRenderer;
use latency_analyzer::cli::Commands::{Analyze, GenerateAutoComplete};
use latency_analyzer::cli::{Cli, Commands};
use latency_analyzer::error::AnalyzerResult;
use latency_analyzer::logging::init_logging;
use latency_analyzer::pipeline::{run_analysis, AnalysisConfig};
use std::io;
use std::process::ExitCode;
use tracing::{error, info};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> AnalyzerResult<()> {
    match command {
        GenerateAutoComplete { shell } => {
            let mut cmd = Cli::command();
            eprintln!("Generating completion file for {shell}...");
            print_completions(shell, &mut cmd);
        }
        Analyze {
            csv_file,
            mode,
            thread_policy,
            output,
            json,
            no_chart,
            verbose,
        } => {
            init_logging(verbose);
            info!(
                "Analyzing {} (mode: {}, thread policy: {})",
                csv_file.path().display(),
                mode,
                thread_policy
            );
            let config = AnalysisConfig {
                csv_file: csv_file.path().clone(),
                mode,
                thread_policy,
                chart_output: if no_chart {
                    None
                } else {
                    Some(output.unwrap_or_else(|| mode.default_output()))
                },
                json_output: json,
            };
            run_analysis(&config, &SvgChartRenderer::default())?;
        }
    }
    Ok(())
}

fn print_completions<G: Generator>(
    gen: G,
    cmd: &mut Command,
) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
