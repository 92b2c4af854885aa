// RLM Log Reader - app/state.rs
//
// Application state for the window: the two path fields, the event-data
// option, the running job, the pending overwrite confirmation, and the
// error and status messages.
// Owned by the eframe::App implementation.

use crate::app::analysis::{self, AnalysisOptions, LogAnalysis};
use crate::app::job::AnalysisJob;
use crate::app::settings::{self, Settings};
use crate::platform::config::AppConfig;
use crate::platform::fs;
use crate::util::error::ExportError;
use std::path::{Path, PathBuf};

/// An analysis whose outputs already exist, awaiting the user's answer.
#[derive(Debug)]
pub struct PendingOverwrite {
    pub analysis: LogAnalysis,
    pub conflicts: Vec<PathBuf>,
    /// Set until the prompt has given No its initial keyboard focus.
    pub needs_focus: bool,
}

impl PendingOverwrite {
    pub fn new(analysis: LogAnalysis, conflicts: Vec<PathBuf>) -> Self {
        Self {
            analysis,
            conflicts,
            needs_focus: true,
        }
    }
}

/// Top-level application state.
pub struct AppState {
    /// Input log path as typed or picked.
    pub input_path: String,

    /// Output directory as typed or picked.
    pub output_dir: String,

    /// Also write `_AllEventData.txt`.
    pub write_event_data: bool,

    /// Open the output directory after publishing.
    pub open_output_dir: bool,

    /// Lines examined for format detection.
    pub detection_lines: usize,

    /// Background analysis, while one is running.
    pub job: Option<AnalysisJob>,

    /// Waiting on the "Overwrite?" dialog.
    pub pending: Option<PendingOverwrite>,

    /// Message for the modal error window.
    pub error: Option<String>,

    /// Status bar text.
    pub status: String,

    /// Config warnings shown once at startup.
    pub warnings: Vec<String>,

    pub show_about: bool,

    settings: Settings,
    settings_path: Option<PathBuf>,
}

impl AppState {
    /// Build the initial state, restoring the last used paths.
    pub fn new(config: &AppConfig, settings_path: Option<PathBuf>, warnings: Vec<String>) -> Self {
        let settings = settings_path
            .as_deref()
            .and_then(settings::load)
            .unwrap_or_default();

        let display = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };

        Self {
            input_path: display(&settings.input_file),
            output_dir: display(&settings.output_dir),
            write_event_data: config.write_event_data,
            open_output_dir: config.open_output_dir,
            detection_lines: config.detection_lines,
            job: None,
            pending: None,
            error: None,
            status: "Ready.".to_string(),
            warnings,
            show_about: false,
            settings,
            settings_path,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_busy(&self) -> bool {
        self.job.is_some()
    }

    /// The output directory field must name an existing directory.
    pub fn validate_output_dir(&self) -> Result<PathBuf, ExportError> {
        analysis::validate_output_dir(&self.output_dir)
    }

    pub fn options(&self) -> AnalysisOptions {
        AnalysisOptions {
            detection_lines: self.detection_lines,
            write_event_data: self.write_event_data,
        }
    }

    /// Record a picked input file and persist it.
    pub fn remember_input(&mut self, path: &Path) {
        self.input_path = path.display().to_string();
        self.settings.input_file = Some(path.to_path_buf());
        self.save_settings();
    }

    /// Record a picked output directory and persist it.
    pub fn remember_output_dir(&mut self, path: &Path) {
        self.output_dir = path.display().to_string();
        self.settings.output_dir = Some(path.to_path_buf());
        self.save_settings();
    }

    fn save_settings(&self) {
        if let Some(path) = &self.settings_path {
            if let Err(e) = settings::save(&self.settings, path) {
                tracing::warn!(error = %e, "Could not save settings");
            }
        }
    }

    /// Validate the form and start the background analysis.
    pub fn start_generate(&mut self) {
        if self.is_busy() {
            return;
        }
        let output_dir = match self.validate_output_dir() {
            Ok(dir) => dir,
            Err(e) => {
                self.error = Some(e.to_string());
                return;
            }
        };

        self.status = format!("Analysing {}...", self.input_path);
        self.job = Some(AnalysisJob::start(
            self.input_path.clone(),
            output_dir,
            self.options(),
        ));
    }

    /// Collect a finished job. Publishes straight away unless outputs
    /// already exist, in which case the overwrite prompt is raised.
    pub fn poll_job(&mut self) {
        let Some(result) = self.job.as_ref().and_then(AnalysisJob::poll) else {
            return;
        };
        self.job = None;

        match result {
            Ok(analysis) => {
                let conflicts = analysis.conflicts();
                if conflicts.is_empty() {
                    self.publish(&analysis);
                } else {
                    self.status = "Waiting for overwrite confirmation.".to_string();
                    self.pending = Some(PendingOverwrite::new(analysis, conflicts));
                }
            }
            Err(message) => {
                self.status = "Analysis failed.".to_string();
                self.error = Some(message);
            }
        }
    }

    /// The user accepted the overwrite.
    pub fn confirm_overwrite(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.publish(&pending.analysis);
        }
    }

    /// The user declined the overwrite.
    pub fn cancel_overwrite(&mut self) {
        if self.pending.take().is_some() {
            self.status = "Cancelled; no files were written.".to_string();
        }
    }

    fn publish(&mut self, analysis: &LogAnalysis) {
        match analysis.publish_all() {
            Ok(written) => {
                self.status = format!(
                    "{} file(s) written for {} ({}).",
                    written.len(),
                    analysis.input(),
                    analysis.format()
                );
                if self.open_output_dir {
                    fs::open_directory(Path::new(&self.output_dir));
                }
            }
            Err(e) => {
                self.status = "Publishing failed.".to_string();
                self.error = Some(e.to_string());
            }
        }
    }
}
