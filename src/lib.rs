//! Trialmap - compiles paired-agent trial logs into comparison heatmaps
//!
//! Trial logs record, per level, model pair and seed, how many steps a pair of
//! planning agents needed (or that they timed out). This crate parses those
//! logs, groups them into model x model matrices and renders each matrix as a
//! heatmap under one of several reporting modes.

pub mod aggregate;
pub mod cli;
pub mod compile;
pub mod config;
pub mod error;
pub mod inputs;
pub mod leaderboard;
pub mod mask;
pub mod matrix;
pub mod registry;
pub mod render;
pub mod trials;

// Re-export commonly used types for convenience
pub use aggregate::{
    AggregatedCell, AggregatedMatrix, AggregationContext, Aggregator, ReportMode, ValueRange,
    aggregate_matrix,
};
pub use compile::{CompileReport, HeatmapView, TOTAL_VIEW, compile_views, load_inputs, run};
pub use config::{CompileConfig, InputSelection};
pub use error::{CompileError, Result};
pub use leaderboard::{Leaderboard, ModelRanking};
pub use mask::build_mask;
pub use matrix::{
    LevelMatrices, ObservedValue, Observations, OrderPolicy, PairMatrix, build_level_matrices,
    compile_total,
};
pub use registry::{ModelId, ModelRegistry, ModelSlot};
pub use trials::{ParseOptions, ParsedLog, SeedRange, TrialRecord, UNSOLVED_THRESHOLD};
