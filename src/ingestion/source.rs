//! Input path resolution.
//!
//! An input path is one of:
//!
//! - a single file
//! - a directory: every regular file directly inside it, in file-name order, skipping names that
//!   start with `_` or `.` (e.g. `_SUCCESS`, `.crc` sidecars)
//! - a glob pattern such as `data/2024-*.csv`, matched in path order

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{ProcessingError, ProcessingResult};

/// Resolve `input` into the list of files to read.
///
/// A plain path that does not exist is returned as-is so the read step reports the missing file.
pub fn resolve_input_files(input: impl AsRef<Path>) -> ProcessingResult<Vec<PathBuf>> {
    let input = input.as_ref();

    if input.is_dir() {
        let files = list_directory(input)?;
        return non_empty(files, input);
    }

    if !input.exists() && looks_like_pattern(input) {
        let pattern = input.to_string_lossy();
        let mut files = Vec::new();
        for entry in glob::glob(&pattern)? {
            let path = entry.map_err(std::io::Error::from)?;
            if path.is_file() && !is_hidden(&path) {
                files.push(path);
            }
        }
        return non_empty(files, input);
    }

    Ok(vec![input.to_path_buf()])
}

fn list_directory(dir: &Path) -> ProcessingResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && !is_hidden(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn non_empty(files: Vec<PathBuf>, input: &Path) -> ProcessingResult<Vec<PathBuf>> {
    if files.is_empty() {
        return Err(ProcessingError::NoInputFiles {
            path: input.display().to_string(),
        });
    }
    Ok(files)
}

fn looks_like_pattern(path: &Path) -> bool {
    path.to_string_lossy()
        .chars()
        .any(|c| matches!(c, '*' | '?' | '['))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('_') || n.starts_with('.'))
}
