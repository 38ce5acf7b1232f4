//! Compilation pipeline
//!
//! logs -> parsed trials -> per-level matrices -> (total) -> aggregated
//! cells -> mask -> rendered heatmaps. Every stage takes its inputs by
//! reference and returns fresh values; nothing is shared between runs.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::aggregate::{
    AggregatedMatrix, AggregationContext, Aggregator, ReportMode, aggregate_matrix,
};
use crate::config::CompileConfig;
use crate::error::{CompileError, Result};
use crate::inputs::discover_inputs;
use crate::mask::build_mask;
use crate::matrix::{PairMatrix, build_level_matrices, compile_total};
use crate::render::{self, load_font, output_stem, render_heatmap, write_heatmap};
use crate::trials::{FileFailure, LoadedTrials, ParsedLog, SeedRange, load_trial_files};

/// Name of the merged cross-level view
pub const TOTAL_VIEW: &str = "total";

/// Name of the JSON run summary written next to the images
pub const REPORT_FILE: &str = "compile_report.json";

/// One heatmap's worth of data: aggregated cells plus display mask
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapView {
    /// Level name, or [`TOTAL_VIEW`]
    pub name: String,
    pub matrix: AggregatedMatrix,
    pub mask: PairMatrix<bool>,
}

impl HeatmapView {
    /// Format as ASCII table; masked cells are blank, multi-line labels
    /// keep only their first line
    pub fn format_table(&self) -> String {
        let models = &self.matrix.models;
        let mut output = format!("\n{}:\n", self.name.to_uppercase());
        output.push_str(&format!("  {:<8}", ""));
        for model in models {
            output.push_str(&format!(" {:>8}", model.name()));
        }
        output.push('\n');

        for (row, model) in models.iter().enumerate() {
            output.push_str(&format!("  {:<8}", model.name()));
            for col in 0..models.len() {
                let label = if *self.mask.at(row, col) {
                    ""
                } else {
                    let cell = self.matrix.cells.at(row, col);
                    cell.label.lines().next().unwrap_or("")
                };
                output.push_str(&format!(" {:>8}", label));
            }
            output.push('\n');
        }

        if let Some(expected) = &self.matrix.expected_runs {
            output.push_str("  expected runs:\n");
            for (row, model) in models.iter().enumerate() {
                output.push_str(&format!("  {:<8}", model.name()));
                for col in 0..models.len() {
                    if *self.mask.at(row, col) {
                        output.push_str(&format!(" {:>8}", ""));
                    } else {
                        output.push_str(&format!(" {:>8}", expected.at(row, col)));
                    }
                }
                output.push('\n');
            }
        }

        output
    }
}

/// Build the views a run would render, without touching the file system.
///
/// An empty log yields no views.
pub fn compile_views(log: &ParsedLog, config: &CompileConfig) -> Vec<HeatmapView> {
    if log.is_empty() {
        return Vec::new();
    }

    let registry = config.registry();
    let order = config.order();
    let matrices = build_level_matrices(log, registry.len(), order, config.mode.observed_value());
    let mask = build_mask(registry.len(), order);

    let aggregator_for = |levels: usize| {
        Aggregator::for_mode(
            config.mode,
            &AggregationContext {
                levels,
                seed_range: log.seed_range,
                error_bars: config.error_bars,
            },
        )
    };

    if config.individual {
        let aggregator = aggregator_for(1);
        matrices
            .levels
            .iter()
            .map(|(level, matrix)| HeatmapView {
                name: level.clone(),
                matrix: aggregate_matrix(matrix, registry.models(), &aggregator, order),
                mask: mask.clone(),
            })
            .collect()
    } else {
        let total = compile_total(&matrices, registry.len());
        let aggregator = aggregator_for(log.level_count());
        vec![HeatmapView {
            name: TOTAL_VIEW.to_string(),
            matrix: aggregate_matrix(&total, registry.models(), &aggregator, order),
            mask,
        }]
    }
}

/// Validate the configuration, find the inputs and parse them
pub fn load_inputs(config: &CompileConfig) -> Result<LoadedTrials> {
    config.validate()?;
    let paths = discover_inputs(&config.input)?;
    info!("Reading {} trial log(s)", paths.len());
    load_trial_files(&paths, &config.registry(), config.mode.parse_options())
}

/// Render and save every view; returns the image paths in view order
pub fn render_views(views: &[HeatmapView], config: &CompileConfig) -> Result<Vec<PathBuf>> {
    if views.is_empty() {
        return Ok(Vec::new());
    }
    render::ensure_output_dir(&config.output_dir)?;

    let font = load_font(config.font_path.as_deref());
    let range = config.mode.value_range();

    views
        .par_iter()
        .map(|view| {
            let image = render_heatmap(&view.matrix, &view.mask, range, font.as_ref());
            let stem = output_stem(&view.name, config.mode);
            write_heatmap(&config.output_dir, &stem, &image, &view.matrix, &view.mask)
        })
        .collect()
}

/// Summary of one run, written as JSON into the output directory
#[derive(Debug, Clone, Serialize)]
pub struct CompileReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Local>,
    pub mode: ReportMode,
    pub files_read: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
    pub malformed_lines: usize,
    pub levels: Vec<String>,
    pub seed_range: Option<SeedRange>,
    pub outputs: Vec<PathBuf>,
}

impl CompileReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn format_summary(&self) -> String {
        let mut out = format!(
            "Compiled {} file(s), {} level(s), {} image(s) [{}]",
            self.files_read.len(),
            self.levels.len(),
            self.outputs.len(),
            self.mode.name()
        );
        if self.malformed_lines > 0 {
            out.push_str(&format!(", {} malformed line(s) skipped", self.malformed_lines));
        }
        if self.has_failures() {
            out.push_str(&format!(", {} file(s) failed", self.failures.len()));
        }
        out
    }
}

/// Run a full compilation
pub fn run(config: &CompileConfig) -> Result<CompileReport> {
    let loaded = load_inputs(config)?;
    let views = compile_views(&loaded.log, config);
    if views.is_empty() {
        warn!("No valid trials found; nothing to render");
    }
    let outputs = render_views(&views, config)?;

    let report = CompileReport {
        run_id: Uuid::new_v4(),
        generated_at: Local::now(),
        mode: config.mode,
        files_read: loaded.files_read,
        failures: loaded.failures,
        malformed_lines: loaded.log.malformed.len(),
        levels: loaded.log.levels,
        seed_range: loaded.log.seed_range,
        outputs,
    };

    if !report.outputs.is_empty() {
        write_report(&report, config)?;
    }
    Ok(report)
}

fn write_report(report: &CompileReport, config: &CompileConfig) -> Result<()> {
    let path = config.output_dir.join(REPORT_FILE);
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| CompileError::Config(format!("failed to serialize run report: {}", e)))?;
    fs::write(&path, json).map_err(|source| CompileError::Io { path, source })
}
