// RLM Log Reader - app/job.rs
//
// Runs the analysis of one log on a background thread so the window stays
// responsive. The result comes back over an mpsc channel that the UI polls
// once per frame.

use crate::app::analysis::{AnalysisOptions, LogAnalysis};
use std::path::PathBuf;
use std::sync::mpsc;

/// Outcome sent from the worker: the analysis, or the error message to show.
pub type JobResult = Result<LogAnalysis, String>;

/// A single background analysis.
pub struct AnalysisJob {
    rx: mpsc::Receiver<JobResult>,
}

impl AnalysisJob {
    /// Spawn the worker immediately.
    pub fn start(input: String, output_dir: PathBuf, options: AnalysisOptions) -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            let result = LogAnalysis::load(&input, &output_dir, &options).map_err(|e| {
                tracing::warn!(input = %input, error = %e, "Analysis failed");
                e.to_string()
            });
            // The receiver is gone if the window closed mid-job.
            let _ = tx.send(result);
        });

        tracing::debug!("Analysis job started");
        Self { rx }
    }

    /// Non-blocking check for completion. `None` while still running.
    pub fn poll(&self) -> Option<JobResult> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                Some(Err("Analysis stopped unexpectedly".to_string()))
            }
        }
    }
}
