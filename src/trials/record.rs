//! Single trial record parsing
//!
//! One log line is `level;modelA;modelB;seed;outcome[;time]`.

use crate::error::{CompileError, Result};
use crate::registry::{ModelRegistry, ModelSlot};

/// Step count at or above which a trial counts as unsolved (timed out)
pub const UNSOLVED_THRESHOLD: i64 = 100;

/// Minimum number of `;`-separated fields in a valid line
pub const MIN_FIELDS: usize = 5;

/// How lines are turned into records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Drop unsolved trials instead of clamping them to the threshold
    pub only_solved: bool,
    /// Read the optional sixth (time) field
    pub read_time: bool,
}

/// One observed trial
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialRecord {
    pub level: String,
    /// Row model (first model named in the log line)
    pub model_a: ModelSlot,
    /// Column model
    pub model_b: ModelSlot,
    pub seed: i64,
    /// Step count, clamped to [`UNSOLVED_THRESHOLD`]
    pub outcome: i64,
    /// Compute time; only read when the parse options ask for it
    pub time: Option<i64>,
}

impl TrialRecord {
    pub fn is_solved(&self) -> bool {
        self.outcome < UNSOLVED_THRESHOLD
    }
}

/// Result of parsing one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// Blank line, ignored without a diagnostic
    Blank,
    /// Fewer than [`MIN_FIELDS`] fields, or an empty level name
    Malformed { fields: usize, reason: String },
    /// Valid but unsolved while only-solved filtering is on. The level and
    /// seed still count towards the observed level list and seed range.
    Excluded { level: String, seed: i64 },
    Trial(TrialRecord),
}

/// Parse one log line.
///
/// `line_number` is 1-based and only used for error messages. Unknown models
/// and non-integer numeric fields are hard errors. A time field that is
/// present but empty counts as non-integer; a missing one is "no time".
pub fn parse_line(
    line: &str,
    line_number: usize,
    registry: &ModelRegistry,
    options: ParseOptions,
) -> Result<ParsedLine> {
    if line.trim().is_empty() {
        return Ok(ParsedLine::Blank);
    }

    let fields: Vec<&str> = line.split(';').map(str::trim).collect();
    if fields.len() < MIN_FIELDS {
        return Ok(ParsedLine::Malformed {
            fields: fields.len(),
            reason: format!(
                "expected at least {} fields, found {}",
                MIN_FIELDS,
                fields.len()
            ),
        });
    }
    if fields[0].is_empty() {
        return Ok(ParsedLine::Malformed {
            fields: fields.len(),
            reason: "empty level name".to_string(),
        });
    }

    let level = fields[0].to_string();
    let seed = parse_int(fields[3], "seed", line_number)?;
    let model_a = registry.resolve(fields[1], line_number)?;
    let model_b = registry.resolve(fields[2], line_number)?;
    let raw_outcome = parse_int(fields[4], "outcome", line_number)?;

    if raw_outcome >= UNSOLVED_THRESHOLD && options.only_solved {
        return Ok(ParsedLine::Excluded { level, seed });
    }
    let outcome = raw_outcome.min(UNSOLVED_THRESHOLD);

    let time = match fields.get(5) {
        Some(value) if options.read_time => {
            Some(parse_int(value, "time", line_number)?)
        }
        _ => None,
    };

    Ok(ParsedLine::Trial(TrialRecord {
        level,
        model_a,
        model_b,
        seed,
        outcome,
        time,
    }))
}

fn parse_int(value: &str, field: &'static str, line: usize) -> Result<i64> {
    value
        .parse::<i64>()
        .map_err(|_| CompileError::UnparsableNumeric {
            line,
            field,
            value: value.to_string(),
        })
}
