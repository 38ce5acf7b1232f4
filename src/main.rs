//! Heatmap compiler for paired-agent trial logs
//!
//! Reads `level;modelA;modelB;seed;outcome[;time]` logs and renders one
//! model x model heatmap for all levels combined, or one per level.
//!
//! Usage:
//!   cargo run                                        # mean steps, all logs, total heatmap
//!   cargo run -- --individual --ignore-order         # one heatmap per level, unordered pairs
//!   cargo run -- --latest --solved-count             # newest log, solve percentage
//!   cargo run -- --file run_03 --time --x            # one log, compute time, 8 models
//!   cargo run -- --settings config/paper.toml        # settings file, flags still override
//!
//! Outputs land in the output folder (default results_plots) as:
//!   <level|total><suffix>.png
//!   <level|total><suffix>.txt (row,col,value,label)
//!   compile_report.json

use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use trialmap::cli::{CompileArgs, init_logging};

#[derive(Parser, Debug)]
#[command(about = "Compile paired-agent trial logs into comparison heatmaps")]
struct Cli {
    #[command(flatten)]
    args: CompileArgs,
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let config = match cli.args.into_config() {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    match trialmap::run(&config) {
        Ok(report) => {
            info!("{}", report.format_summary());
            if report.has_failures() {
                for failure in &report.failures {
                    error!("{}: {}", failure.path.display(), failure.reason);
                }
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
