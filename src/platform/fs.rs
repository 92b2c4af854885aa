// RLM Log Reader - platform/fs.rs
//
// Filesystem helpers: reading logs, listing batch inputs, and opening the
// OS file manager.

use crate::util::error::{ConfigError, ParseError};
use std::path::{Path, PathBuf};

/// Read a log file as lines.
///
/// Invalid UTF-8 is replaced rather than rejected, lines are split on `\n`,
/// and every `\r` is dropped so Windows and Unix logs read the same. An
/// empty file yields a single empty line.
pub fn read_log_lines(path: &Path) -> Result<Vec<String>, ParseError> {
    let bytes = std::fs::read(path).map_err(|source| ParseError::CannotOpenFile {
        path: path.to_path_buf(),
        source,
    })?;

    let text = String::from_utf8_lossy(&bytes);
    let lines: Vec<String> = text.split('\n').map(|line| line.replace('\r', "")).collect();

    tracing::debug!(path = %path.display(), lines = lines.len(), "Read log file");
    Ok(lines)
}

/// Compile glob patterns matched against file names.
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<glob::Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|p| {
            glob::Pattern::new(p).map_err(|source| ConfigError::InvalidPattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}

/// List the regular files directly inside `dir` whose names match any of
/// `patterns`, sorted by path and capped at `max_files`.
///
/// Unreadable entries are skipped with a warning.
pub fn list_files(dir: &Path, patterns: &[glob::Pattern], max_files: usize) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            patterns.iter().any(|p| p.matches(&name))
        })
        .map(|e| e.into_path())
        .collect();

    files.sort();
    if files.len() > max_files {
        tracing::warn!(
            dir = %dir.display(),
            found = files.len(),
            max_files,
            "Too many matching files; truncating"
        );
        files.truncate(max_files);
    }
    files
}

/// Open `dir` in the system file manager.
///
/// The subprocess is spawned detached; a launch failure is logged at WARN
/// and never propagated.
pub fn open_directory(dir: &Path) {
    #[cfg(target_os = "windows")]
    let program = "explorer";
    #[cfg(target_os = "macos")]
    let program = "open";
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let program = "xdg-open";

    if let Err(e) = std::process::Command::new(program).arg(dir).spawn() {
        tracing::warn!(
            dir = %dir.display(),
            program,
            error = %e,
            "Failed to open directory in file manager"
        );
    }
}
