// RLM Log Reader - app/batch.rs
//
// Batch mode: analyse every matching log in a directory in parallel.
// Each file succeeds or fails on its own; one bad log never stops the run.

use crate::app::analysis::{AnalysisOptions, LogAnalysis, Publication};
use crate::core::text::file_stem;
use crate::platform::config::AppConfig;
use crate::platform::fs;
use crate::util::error::{ExportError, Result};
use rayon::prelude::*;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Which files a batch run picks up and how each is analysed.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub analysis: AnalysisOptions,
    pub include_patterns: Vec<String>,
    pub max_files: usize,
}

impl From<&AppConfig> for BatchOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            analysis: AnalysisOptions::from(config),
            include_patterns: config.include_patterns.clone(),
            max_files: config.max_batch_files,
        }
    }
}

/// What happened to one input file.
#[derive(Debug)]
pub enum BatchOutcome {
    /// All outputs were written.
    Published(Vec<PathBuf>),
    /// Outputs already existed and `force` was not set.
    Skipped(Vec<PathBuf>),
    /// Analysis or publishing failed with this message.
    Failed(String),
}

/// Result for one input file.
#[derive(Debug)]
pub struct BatchEntry {
    pub input: PathBuf,
    pub outcome: BatchOutcome,
}

fn process_file(input: &Path, output_dir: &Path, options: &AnalysisOptions, force: bool) -> BatchOutcome {
    let input_text = input.to_string_lossy();
    let analysis = match LogAnalysis::load(&input_text, output_dir, options) {
        Ok(a) => a,
        Err(e) => {
            tracing::warn!(input = %input.display(), error = %e, "Batch file failed");
            return BatchOutcome::Failed(e.to_string());
        }
    };

    match analysis.publish_unless_conflicting(force) {
        Ok(Publication::Written(written)) => BatchOutcome::Published(written),
        Ok(Publication::Refused(conflicts)) => BatchOutcome::Skipped(conflicts),
        Err(e) => {
            tracing::warn!(input = %input.display(), error = %e, "Batch publish failed");
            BatchOutcome::Failed(e.to_string())
        }
    }
}

/// Where batch results go: `output_dir` when given, else the input directory.
pub fn resolve_output_dir<'a>(dir: &'a Path, output_dir: Option<&'a Path>) -> &'a Path {
    output_dir.unwrap_or(dir)
}

/// Process exit code for a finished batch: 1 when any file failed.
///
/// Skipped files are not failures.
pub fn exit_code(entries: &[BatchEntry]) -> i32 {
    let failed = entries
        .iter()
        .any(|e| matches!(e.outcome, BatchOutcome::Failed(_)));
    i32::from(failed)
}

/// For each input, the earlier input that already owns its output names.
///
/// Outputs are named after the file stem, so `site.log` and `site.txt`
/// would write the same files. The first in sorted order keeps them.
fn output_owners(inputs: &[PathBuf]) -> Vec<Option<PathBuf>> {
    let mut owners: HashMap<String, &PathBuf> = HashMap::new();
    inputs
        .iter()
        .map(|input| match owners.entry(file_stem(&input.to_string_lossy())) {
            Entry::Occupied(owner) => Some(owner.get().to_path_buf()),
            Entry::Vacant(slot) => {
                slot.insert(input);
                None
            }
        })
        .collect()
}

/// Analyse every log in `dir` matching the include patterns and publish
/// results into `output_dir`. Entries come back sorted by input path.
pub fn run_batch(
    dir: &Path,
    output_dir: &Path,
    options: &BatchOptions,
    force: bool,
) -> Result<Vec<BatchEntry>> {
    for required in [dir, output_dir] {
        if !required.is_dir() {
            return Err(ExportError::DirectoryNotFound {
                path: required.to_path_buf(),
            }
            .into());
        }
    }

    let patterns = fs::compile_patterns(&options.include_patterns)?;
    let inputs = fs::list_files(dir, &patterns, options.max_files);
    tracing::info!(dir = %dir.display(), files = inputs.len(), "Batch started");

    let owners = output_owners(&inputs);
    let entries: Vec<BatchEntry> = inputs
        .par_iter()
        .zip(owners.par_iter())
        .map(|(input, owner)| {
            let outcome = match owner {
                Some(owner) => {
                    tracing::warn!(
                        input = %input.display(),
                        owner = %owner.display(),
                        "Output names collide with an earlier input"
                    );
                    BatchOutcome::Failed(format!(
                        "Output files collide with {}",
                        owner.display()
                    ))
                }
                None => process_file(input, output_dir, &options.analysis, force),
            };
            BatchEntry {
                input: input.clone(),
                outcome,
            }
        })
        .collect();

    let failed = entries
        .iter()
        .filter(|e| matches!(e.outcome, BatchOutcome::Failed(_)))
        .count();
    tracing::info!(files = entries.len(), failed, "Batch finished");
    Ok(entries)
}
