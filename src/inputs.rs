//! Trial log discovery

use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::config::InputSelection;
use crate::error::{CompileError, Result};

const LOG_EXTENSION: &str = "txt";

/// Resolve the selection to a list of files.
///
/// All logs are returned sorted by file name so repeated runs read them in
/// the same order.
pub fn discover_inputs(selection: &InputSelection) -> Result<Vec<PathBuf>> {
    if let Some(file) = &selection.file {
        let name = if file.ends_with(".txt") {
            file.clone()
        } else {
            format!("{}.{}", file, LOG_EXTENSION)
        };
        return Ok(vec![selection.dir.join(name)]);
    }

    let mut logs = list_logs(selection)?;
    if logs.is_empty() {
        return Err(CompileError::NoInputs {
            dir: selection.dir.clone(),
        });
    }

    if selection.latest {
        let newest = logs
            .into_iter()
            .max_by_key(|(_, modified)| *modified)
            .map(|(path, _)| path);
        return Ok(newest.into_iter().collect());
    }

    logs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(logs.into_iter().map(|(path, _)| path).collect())
}

fn list_logs(selection: &InputSelection) -> Result<Vec<(PathBuf, SystemTime)>> {
    let entries = fs::read_dir(&selection.dir).map_err(|source| CompileError::Io {
        path: selection.dir.clone(),
        source,
    })?;

    let mut logs = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() || path.extension().is_none_or(|e| e != LOG_EXTENSION) {
            continue;
        }
        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        logs.push((path, modified));
    }
    Ok(logs)
}
