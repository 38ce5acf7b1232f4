//! Compilation configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::aggregate::ReportMode;
use crate::error::{CompileError, Result};
use crate::matrix::OrderPolicy;
use crate::registry::ModelRegistry;

/// Template settings (checked into git)
pub const SETTINGS_TEMPLATE: &str = "config/trialmap_settings.template.json";
/// Local settings (gitignored, user's custom settings)
pub const SETTINGS_FILE: &str = "config/trialmap_settings.json";

/// Which log files to read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSelection {
    /// Directory holding `*.txt` trial logs
    pub dir: PathBuf,
    /// Read only `<dir>/<file>.txt`
    pub file: Option<String>,
    /// Read only the most recently modified log
    pub latest: bool,
}

impl Default for InputSelection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("results_bd"),
            file: None,
            latest: false,
        }
    }
}

/// Configuration for one compilation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    pub input: InputSelection,
    /// Directory rendered images are written to
    pub output_dir: PathBuf,
    /// Fold (a, b) and (b, a) into one cell
    pub ignore_order: bool,
    /// One heatmap per level instead of a single merged one
    pub individual: bool,
    pub mode: ReportMode,
    /// Use the 8-entry registry
    pub extended_registry: bool,
    /// Add a standard-error line to mean and time labels
    pub error_bars: bool,
    /// TrueType font for labels (None = search common system locations)
    pub font_path: Option<PathBuf>,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            input: InputSelection::default(),
            output_dir: PathBuf::from("results_plots"),
            ignore_order: false,
            individual: false,
            mode: ReportMode::MeanOutcome,
            extended_registry: false,
            error_bars: false,
            font_path: None,
        }
    }
}

impl CompileConfig {
    /// Load configuration from a settings file (`.toml`, otherwise JSON)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| CompileError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path.extension().is_some_and(|e| e == "toml");
        let parsed = if is_toml {
            toml::from_str(&contents).map_err(|e| e.to_string())
        } else {
            serde_json::from_str(&contents).map_err(|e| e.to_string())
        };
        parsed.map_err(|e| CompileError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load configuration from default settings files
    /// Priority: local settings > template settings > built-in defaults
    pub fn from_config_files() -> Self {
        if let Ok(config) = Self::from_file(SETTINGS_FILE) {
            return config;
        }
        if let Ok(config) = Self::from_file(SETTINGS_TEMPLATE) {
            return config;
        }
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.input.file.is_some() && self.input.latest {
            return Err(CompileError::Config(
                "a specific file and --latest cannot be combined".to_string(),
            ));
        }
        Ok(())
    }

    pub fn order(&self) -> OrderPolicy {
        OrderPolicy::from_flag(self.ignore_order)
    }

    pub fn registry(&self) -> ModelRegistry {
        ModelRegistry::from_flag(self.extended_registry)
    }
}
