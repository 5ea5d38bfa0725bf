//! Rebuilds the local state of a source from the files already downloaded.

use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::{plan::LocalState, source::SourceDescriptor};

/// Scans the download directory of `source` and records, for every stream,
/// the latest reference date found among its files.
///
/// Paths are taken relative to the source directory and parsed with the full
/// template, so region or variable directories count. Files that do not match
/// the template are ignored. A missing directory means nothing has been
/// downloaded yet.
pub fn scan_local_state(source: &SourceDescriptor, download_dir: &Path) -> Result<LocalState> {
    let mut state = LocalState::new();
    let local_dir = source.local_dir(download_dir);

    if !local_dir.is_dir() {
        return Ok(state);
    }

    let mut paths = Vec::new();
    collect_relative_paths(&local_dir, "", &mut paths)?;

    for stream in source.streams() {
        for path in paths.iter().filter(|path| source.accepts(file_name(path))) {
            if let Ok(date) = source.template.parse_date(path, &stream) {
                state.record(&stream, date);
            }
        }
    }

    Ok(state)
}

/// Collects every file below `dir` as a `/`-separated path relative to the
/// scan root.
fn collect_relative_paths(dir: &Path, prefix: &str, paths: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let entry = entry?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        let relative = if prefix.is_empty() {
            name
        } else {
            format!("{}/{}", prefix, name)
        };

        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_relative_paths(&entry.path(), &relative, paths)?;
        } else if file_type.is_file() {
            paths.push(relative);
        }
    }

    Ok(())
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

// -- Tests -------------------------------------------------------------------
