//! Analysis Tool - print compiled matrices and a model leaderboard as text
//!
//! Loads the same trial logs as the compiler and prints, per view, the
//! aggregated cell labels as an ASCII table followed by a leaderboard of
//! every model by solve rate. Nothing is rendered.
//!
//! Usage:
//!   cargo run --bin analyze
//!   cargo run --bin analyze -- --individual --ignore-order --solved-count
//!   cargo run --bin analyze -- --latest --output analysis.txt

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};

use trialmap::cli::{CompileArgs, init_logging};
use trialmap::{CompileConfig, Leaderboard, compile_views, load_inputs};

#[derive(Parser, Debug)]
#[command(about = "Print trial matrices and a model leaderboard")]
struct Cli {
    #[command(flatten)]
    args: CompileArgs,

    /// Also write the report to this file
    #[arg(long)]
    output: Option<PathBuf>,
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

    match analyze(&config) {
        Ok((report, failed)) => {
            println!("{}", report);
            if let Some(path) = &cli.output {
                if let Err(err) = fs::write(path, &report) {
                    error!("Failed to write {}: {}", path.display(), err);
                    return ExitCode::FAILURE;
                }
                info!("Report written to {}", path.display());
            }
            if failed {
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

/// Build the full text report; the flag is set when any input file failed
fn analyze(config: &CompileConfig) -> trialmap::Result<(String, bool)> {
    let loaded = load_inputs(config)?;
    for failure in &loaded.failures {
        error!("{}: {}", failure.path.display(), failure.reason);
    }

    let log = &loaded.log;
    let mut report = String::new();

    // ============================================================================
    // Header
    // ============================================================================

    report.push_str("============================================================\n");
    report.push_str(&format!(
        "Trials: {} from {} file(s), mode {}\n",
        log.records.len(),
        loaded.files_read.len(),
        config.mode.name()
    ));
    report.push_str(&format!("Levels: {}\n", log.levels.join(", ")));
    if let Some(range) = log.seed_range {
        report.push_str(&format!("Seeds:  {}..={}\n", range.min, range.max));
    }
    if !log.malformed.is_empty() {
        report.push_str(&format!("Malformed lines skipped: {}\n", log.malformed.len()));
    }

    // ============================================================================
    // Matrices
    // ============================================================================

    let views = compile_views(log, config);
    if views.is_empty() {
        warn!("No valid trials found");
    }
    for view in &views {
        report.push_str(&view.format_table());
    }

    // ============================================================================
    // Leaderboard
    // ============================================================================

    let leaderboard = Leaderboard::from_records(&log.records, &config.registry());
    report.push_str(&leaderboard.format_table());

    Ok((report, !loaded.failures.is_empty()))
}
