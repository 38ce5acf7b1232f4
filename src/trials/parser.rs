//! Trial log parser
//!
//! Turns whole log files into [`ParsedLog`]s and merges several files into
//! one trial set for a compilation run.

use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info, warn};
use serde::Serialize;

use super::record::{ParseOptions, ParsedLine, TrialRecord, parse_line};
use crate::error::{CompileError, Result};
use crate::registry::ModelRegistry;

/// Inclusive range of seeds observed across parsed lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedRange {
    pub min: i64,
    pub max: i64,
}

impl SeedRange {
    pub fn single(seed: i64) -> Self {
        Self {
            min: seed,
            max: seed,
        }
    }

    pub fn include(&mut self, seed: i64) {
        self.min = self.min.min(seed);
        self.max = self.max.max(seed);
    }

    pub fn union(self, other: SeedRange) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Number of seeds in the range, `max - min + 1`
    pub fn span(&self) -> u64 {
        self.max.abs_diff(self.min).saturating_add(1)
    }
}

/// Diagnostic for a line that was skipped as malformed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedLine {
    pub line_number: usize,
    pub field_count: usize,
    /// Rendered [`CompileError::MalformedRecord`]
    pub message: String,
    pub content: String,
}

/// Parsed contents of one or more log files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLog {
    /// Retained trials in file order
    pub records: Vec<TrialRecord>,
    /// Distinct levels in first-encounter order, including levels whose
    /// trials were all excluded by only-solved filtering
    pub levels: Vec<String>,
    pub seed_range: Option<SeedRange>,
    pub malformed: Vec<MalformedLine>,
}

impl ParsedLog {
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    fn note_level(&mut self, level: &str) {
        if !self.levels.iter().any(|l| l == level) {
            self.levels.push(level.to_string());
        }
    }

    fn note_seed(&mut self, seed: i64) {
        match &mut self.seed_range {
            Some(range) => range.include(seed),
            None => self.seed_range = Some(SeedRange::single(seed)),
        }
    }

    /// Append another log, keeping first-encounter level order
    pub fn merge(&mut self, other: ParsedLog) {
        for level in &other.levels {
            self.note_level(level);
        }
        self.seed_range = match (self.seed_range, other.seed_range) {
            (Some(a), Some(b)) => Some(a.union(b)),
            (a, b) => a.or(b),
        };
        self.records.extend(other.records);
        self.malformed.extend(other.malformed);
    }
}

/// Parse log content (for testing or in-memory parsing).
///
/// Either the whole content parses or nothing is returned: an unknown model
/// or unparsable number anywhere discards the content entirely.
pub fn parse_log_content(
    content: &str,
    registry: &ModelRegistry,
    options: ParseOptions,
) -> Result<ParsedLog> {
    let mut parsed = ParsedLog::default();

    for (idx, line) in content.lines().enumerate() {
        let line_number = idx + 1;
        match parse_line(line, line_number, registry, options)? {
            ParsedLine::Blank => {}
            ParsedLine::Malformed { fields, reason } => {
                let diagnostic = CompileError::MalformedRecord {
                    line: line_number,
                    reason,
                };
                warn!("Bad format data, {}: {}", diagnostic, line);
                parsed.malformed.push(MalformedLine {
                    line_number,
                    field_count: fields,
                    message: diagnostic.to_string(),
                    content: line.to_string(),
                });
            }
            ParsedLine::Excluded { level, seed } => {
                parsed.note_seed(seed);
                parsed.note_level(&level);
            }
            ParsedLine::Trial(record) => {
                parsed.note_seed(record.seed);
                parsed.note_level(&record.level);
                parsed.records.push(record);
            }
        }
    }

    Ok(parsed)
}

/// Parse a trial log file
pub fn parse_log_file<P: AsRef<Path>>(
    path: P,
    registry: &ModelRegistry,
    options: ParseOptions,
) -> Result<ParsedLog> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| CompileError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_log_content(&content, registry, options).map_err(|e| e.in_file(path))
}

/// A file that could not be compiled
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Trials gathered from a set of files
#[derive(Debug, Default)]
pub struct LoadedTrials {
    pub log: ParsedLog,
    pub files_read: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
}

/// Parse every file and merge the successful ones.
///
/// A file that fails with a file-local error contributes nothing; the
/// failure is logged and returned alongside the merged trials so the caller
/// can decide the exit status. Any other error aborts the whole load.
pub fn load_trial_files(
    paths: &[PathBuf],
    registry: &ModelRegistry,
    options: ParseOptions,
) -> Result<LoadedTrials> {
    let mut loaded = LoadedTrials::default();

    for path in paths {
        match parse_log_file(path, registry, options) {
            Ok(parsed) => {
                info!(
                    "Parsed {}: {} trials, {} levels, {} malformed lines",
                    path.display(),
                    parsed.records.len(),
                    parsed.levels.len(),
                    parsed.malformed.len()
                );
                loaded.log.merge(parsed);
                loaded.files_read.push(path.clone());
            }
            Err(err) if !err.is_file_local() => return Err(err),
            Err(err) => {
                error!("Skipping {}: {}", path.display(), err);
                loaded.failures.push(FileFailure {
                    path: path.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok(loaded)
}
