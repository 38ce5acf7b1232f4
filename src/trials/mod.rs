//! Trial log parsing
//!
//! Converts raw `;`-delimited experiment logs into typed trial records.

pub mod parser;
pub mod record;

pub use parser::{
    FileFailure, LoadedTrials, MalformedLine, ParsedLog, SeedRange, load_trial_files,
    parse_log_content, parse_log_file,
};
pub use record::{MIN_FIELDS, ParseOptions, ParsedLine, TrialRecord, UNSOLVED_THRESHOLD, parse_line};
