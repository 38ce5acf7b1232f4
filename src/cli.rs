//! Command-line options shared by the binaries

use std::path::PathBuf;

use clap::Args;

use crate::aggregate::ReportMode;
use crate::config::CompileConfig;
use crate::error::Result;

/// Options that select inputs and shape the compiled matrices.
///
/// Anything left unset keeps the value from the settings file.
#[derive(Args, Debug, Clone, Default)]
pub struct CompileArgs {
    /// Load settings from a JSON or TOML file (flags override it)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// The folder to look for trial logs
    #[arg(long = "in-folder")]
    pub in_folder: Option<PathBuf>,

    /// The folder to write plots to
    #[arg(long = "out-folder")]
    pub out_folder: Option<PathBuf>,

    /// Treat (a, b) and (b, a) as the same pair
    #[arg(long = "ignore-order")]
    pub ignore_order: bool,

    /// Compile only <in-folder>/<FILE>.txt
    #[arg(long, conflicts_with = "latest")]
    pub file: Option<String>,

    /// Compile only the most recently modified log
    #[arg(long)]
    pub latest: bool,

    /// One heatmap per level instead of a merged total
    #[arg(long)]
    pub individual: bool,

    /// Mean steps over solved trials only
    #[arg(long, conflicts_with_all = ["solved_pct", "solved_count", "time"])]
    pub solved: bool,

    /// Percentage of trials solved
    #[arg(long = "solved-pct", conflicts_with_all = ["solved_count", "time"])]
    pub solved_pct: bool,

    /// Percentage of trials solved, with expected run counts
    #[arg(long = "solved-count", conflicts_with = "time")]
    pub solved_count: bool,

    /// Mean compute time
    #[arg(long)]
    pub time: bool,

    /// Use the extended registry that includes mac1
    #[arg(long)]
    pub x: bool,

    /// Add a standard-error line to mean and time labels
    #[arg(long = "error-bars")]
    pub error_bars: bool,

    /// TrueType font used for labels
    #[arg(long)]
    pub font: Option<PathBuf>,
}

impl CompileArgs {
    /// The mode chosen on the command line, if any
    pub fn mode(&self) -> Option<ReportMode> {
        if self.solved {
            Some(ReportMode::OnlySolved)
        } else if self.solved_pct {
            Some(ReportMode::SolvedPercentage)
        } else if self.solved_count {
            Some(ReportMode::SolvedCount)
        } else if self.time {
            Some(ReportMode::Time)
        } else {
            None
        }
    }

    /// Start from the settings file (or default settings files) and apply
    /// the command-line overrides
    pub fn into_config(self) -> Result<CompileConfig> {
        let base = match &self.settings {
            Some(path) => CompileConfig::from_file(path)?,
            None => CompileConfig::from_config_files(),
        };
        let config = self.apply(base);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(self, mut config: CompileConfig) -> CompileConfig {
        if let Some(mode) = self.mode() {
            config.mode = mode;
        }
        if let Some(dir) = self.in_folder {
            config.input.dir = dir;
        }
        if let Some(dir) = self.out_folder {
            config.output_dir = dir;
        }
        if self.file.is_some() {
            config.input.file = self.file;
            config.input.latest = false;
        }
        if self.latest {
            config.input.latest = true;
            config.input.file = None;
        }
        if self.font.is_some() {
            config.font_path = self.font;
        }
        config.ignore_order |= self.ignore_order;
        config.individual |= self.individual;
        config.extended_registry |= self.x;
        config.error_bars |= self.error_bars;
        config
    }
}

/// Log to stderr at `info` unless `RUST_LOG` says otherwise
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        args: CompileArgs,
    }

    fn parse(argv: &[&str]) -> std::result::Result<CompileArgs, clap::Error> {
        let mut full = vec!["trialmap"];
        full.extend_from_slice(argv);
        TestCli::try_parse_from(full).map(|cli| cli.args)
    }

    #[test]
    fn test_flags_override_settings() {
        let args = parse(&[
            "--in-folder",
            "logs",
            "--ignore-order",
            "--individual",
            "--solved-count",
            "--x",
        ])
        .unwrap();
        let config = args.apply(CompileConfig::default());

        assert_eq!(config.input.dir, PathBuf::from("logs"));
        assert_eq!(config.mode, ReportMode::SolvedCount);
        assert!(config.ignore_order);
        assert!(config.individual);
        assert!(config.extended_registry);
    }

    #[test]
    fn test_unset_flags_keep_settings() {
        let base = CompileConfig {
            mode: ReportMode::Time,
            ignore_order: true,
            ..Default::default()
        };
        let config = parse(&[]).unwrap().apply(base.clone());
        assert_eq!(config, base);
    }

    #[test]
    fn test_reporting_modes_are_exclusive() {
        assert!(parse(&["--solved", "--time"]).is_err());
        assert!(parse(&["--solved-count", "--solved-pct"]).is_err());
        assert!(parse(&["--file", "run", "--latest"]).is_err());
    }

    #[test]
    fn test_latest_clears_file_from_settings() {
        let mut base = CompileConfig::default();
        base.input.file = Some("old_run".to_string());
        let config = parse(&["--latest"]).unwrap().apply(base);
        assert!(config.input.latest);
        assert_eq!(config.input.file, None);
    }
}
