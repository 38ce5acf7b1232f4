//! Error taxonomy for trial-log compilation

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading trial logs and producing heatmaps.
///
/// `MalformedRecord` is recoverable: the parser records it as a diagnostic and
/// moves on to the next line. Everything else stops the current file (parse
/// errors) or the whole run (configuration and output errors).
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("line {line}: unknown model '{name}'")]
    UnknownModel { line: usize, name: String },

    #[error("line {line}: {field} is not an integer: '{value}'")]
    UnparsableNumeric {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot create output directory {}: {source}", path.display())]
    OutputPathUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write image {}: {source}", path.display())]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("no input files found in {}", dir.display())]
    NoInputs { dir: PathBuf },

    #[error("{}: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<CompileError>,
    },
}

impl CompileError {
    /// Attach the file a parse error came from.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        CompileError::InFile {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// True for errors that abort a single input file rather than the run.
    pub fn is_file_local(&self) -> bool {
        match self {
            CompileError::UnknownModel { .. }
            | CompileError::UnparsableNumeric { .. }
            | CompileError::Io { .. } => true,
            CompileError::InFile { source, .. } => source.is_file_local(),
            _ => false,
        }
    }
}

pub type Result<T, E = CompileError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_file_message_names_path() {
        let err = CompileError::UnknownModel {
            line: 3,
            name: "astar".to_string(),
        }
        .in_file("results_bd/run.txt");

        let message = err.to_string();
        assert!(message.contains("results_bd/run.txt"));
        assert!(message.contains("unknown model 'astar'"));
        assert!(err.is_file_local());
    }

    #[test]
    fn test_malformed_record_message() {
        let err = CompileError::MalformedRecord {
            line: 7,
            reason: "empty level name".to_string(),
        };
        assert_eq!(err.to_string(), "line 7: empty level name");
        assert!(!err.is_file_local());
    }

    #[test]
    fn test_config_errors_are_not_file_local() {
        let err = CompileError::Config("file and latest both set".to_string());
        assert!(!err.is_file_local());
    }
}
