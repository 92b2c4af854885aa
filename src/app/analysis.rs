// RLM Log Reader - app/analysis.rs
//
// The full pipeline for one log file: read, detect, tokenise, extract,
// analyse, and publish the output files.

use crate::core::duration::usage_durations;
use crate::core::events::extract_events;
use crate::core::export::{self, OutputPlan};
use crate::core::format::detect_format;
use crate::core::model::{DurationReport, EventLog, LogFormat, UsageOverTime};
use crate::core::text::tokenize_lines;
use crate::core::usage::concurrent_usage;
use crate::platform::config::AppConfig;
use crate::platform::fs;
use crate::util::constants;
use crate::util::error::{ExportError, ParseError, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Settings that change how a log is analysed and published.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Lines examined for format detection.
    pub detection_lines: usize,
    /// Also write the `_AllEventData.txt` dump.
    pub write_event_data: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            detection_lines: constants::DEFAULT_CONTENT_DETECTION_LINES,
            write_event_data: false,
        }
    }
}

impl From<&AppConfig> for AnalysisOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            detection_lines: config.detection_lines,
            write_event_data: config.write_event_data,
        }
    }
}

/// Check that an output directory was given and exists.
pub fn validate_output_dir(dir: &str) -> std::result::Result<PathBuf, ExportError> {
    if dir.trim().is_empty() {
        return Err(ExportError::NoDirectorySelected);
    }
    let path = PathBuf::from(dir);
    if !path.is_dir() {
        return Err(ExportError::DirectoryNotFound { path });
    }
    Ok(path)
}

/// What a headless publish did with a log's results.
#[derive(Debug, PartialEq, Eq)]
pub enum Publication {
    /// These files were written.
    Written(Vec<PathBuf>),
    /// These outputs already existed and nothing was written.
    Refused(Vec<PathBuf>),
}

impl Publication {
    /// Process exit code for the command line: refusing is a failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Publication::Written(_) => 0,
            Publication::Refused(_) => 1,
        }
    }
}

/// A fully analysed log, ready to publish.
#[derive(Debug)]
pub struct LogAnalysis {
    input: String,
    format: LogFormat,
    log: EventLog,
    usage: UsageOverTime,
    durations: Option<DurationReport>,
    plan: OutputPlan,
    write_event_data: bool,
}

impl LogAnalysis {
    /// Read and analyse `input`, planning outputs in `output_dir`.
    ///
    /// Nothing is written until `publish` is called.
    pub fn load(input: &str, output_dir: &Path, options: &AnalysisOptions) -> Result<Self> {
        if input.trim().is_empty() {
            return Err(ParseError::NoFileSelected.into());
        }

        let lines = fs::read_log_lines(Path::new(input))?;
        let format = detect_format(&lines, options.detection_lines)?;
        tracing::info!(input, format = %format, lines = lines.len(), "Analysing log");

        let log = extract_events(tokenize_lines(&lines), format)?;
        let usage = concurrent_usage(&log, format)?;
        let durations = if format.has_durations() {
            Some(usage_durations(&log)?)
        } else {
            None
        };

        Ok(Self {
            input: input.to_string(),
            format,
            plan: OutputPlan::new(output_dir, input, format),
            log,
            usage,
            durations,
            write_event_data: options.write_event_data,
        })
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    pub fn events(&self) -> &EventLog {
        &self.log
    }

    pub fn usage(&self) -> &UsageOverTime {
        &self.usage
    }

    pub fn durations(&self) -> Option<&DurationReport> {
        self.durations.as_ref()
    }

    pub fn plan(&self) -> &OutputPlan {
        &self.plan
    }

    pub fn writes_event_data(&self) -> bool {
        self.write_event_data
    }

    /// Output files that already exist and would be overwritten.
    pub fn conflicts(&self) -> Vec<PathBuf> {
        self.plan.conflicts(self.write_event_data)
    }

    /// Write the summary, usage, and (report logs) duration files.
    pub fn publish(&self) -> Result<Vec<PathBuf>> {
        let plan = &self.plan;
        let mut written = Vec::new();

        export::write_summary(&self.log, &self.input, create(&plan.summary)?, &plan.summary)?;
        written.push(plan.summary.clone());

        export::write_usage_csv(&self.usage, create(&plan.usage)?, &plan.usage)?;
        written.push(plan.usage.clone());

        if let (Some(report), Some(path)) = (&self.durations, &plan.usage_duration) {
            export::write_duration_csv(report, create(path)?, path)?;
            written.push(path.clone());
        }
        if let (Some(report), Some(path)) = (&self.durations, &plan.total_duration) {
            export::write_total_duration_csv(report, create(path)?, path)?;
            written.push(path.clone());
        }

        tracing::info!(input = %self.input, files = written.len(), "Results published");
        Ok(written)
    }

    /// Write the `_AllEventData.txt` dump.
    pub fn publish_event_data(&self) -> Result<PathBuf> {
        let path = &self.plan.event_data;
        let count = export::write_event_data(&self.log, create(path)?, path)?;
        tracing::info!(path = %path.display(), events = count, "Event data published");
        Ok(path.clone())
    }

    /// `publish`, plus the event dump when enabled.
    pub fn publish_all(&self) -> Result<Vec<PathBuf>> {
        let mut written = self.publish()?;
        if self.write_event_data {
            written.push(self.publish_event_data()?);
        }
        Ok(written)
    }

    /// `publish_all`, unless outputs already exist and `force` is unset.
    pub fn publish_unless_conflicting(&self, force: bool) -> Result<Publication> {
        let conflicts = self.conflicts();
        if !conflicts.is_empty() && !force {
            tracing::info!(
                input = %self.input,
                conflicts = conflicts.len(),
                "Existing outputs left in place"
            );
            return Ok(Publication::Refused(conflicts));
        }
        self.publish_all().map(Publication::Written)
    }
}

fn create(path: &Path) -> std::result::Result<BufWriter<File>, ExportError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::error::RlmLogError;

    #[test]
    fn test_validate_output_dir() {
        assert_eq!(
            validate_output_dir("  ").unwrap_err().to_string(),
            "No directory selected"
        );
        assert_eq!(
            validate_output_dir("/no/such/dir").unwrap_err().to_string(),
            "Unable to open directory: /no/such/dir"
        );
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_string_lossy().into_owned();
        assert_eq!(validate_output_dir(&path).unwrap(), dir.path());
    }

    #[test]
    fn test_load_requires_input() {
        let err = LogAnalysis::load("", Path::new("."), &AnalysisOptions::default()).unwrap_err();
        assert!(matches!(err, RlmLogError::Parse(ParseError::NoFileSelected)));
    }

    const ISV_LOG: &str = "05/11 15:16 (isv) Server started on box\n\
                           05/11 15:17 (isv) OUT: analytics v2.09 by cecil@box\n";

    #[test]
    fn test_publish_isv_log() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("isv.log");
        std::fs::write(&input, ISV_LOG).unwrap();

        let options = AnalysisOptions {
            write_event_data: true,
            ..AnalysisOptions::default()
        };
        let analysis =
            LogAnalysis::load(&input.to_string_lossy(), dir.path(), &options).unwrap();
        assert_eq!(analysis.format(), LogFormat::Isv);
        assert!(analysis.durations().is_none());
        assert!(analysis.conflicts().is_empty());

        let written = analysis.publish_all().unwrap();
        assert_eq!(written.len(), 3);
        assert!(written.iter().all(|p| p.exists()));
        assert_eq!(analysis.conflicts().len(), 3);
    }

    #[test]
    fn test_existing_outputs_refused_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("isv.log");
        std::fs::write(&input, ISV_LOG).unwrap();
        let summary = dir.path().join("isv_Summary.txt");
        std::fs::write(&summary, "old").unwrap();

        let options = AnalysisOptions::default();
        let analysis =
            LogAnalysis::load(&input.to_string_lossy(), dir.path(), &options).unwrap();

        let refused = analysis.publish_unless_conflicting(false).unwrap();
        assert_eq!(refused, Publication::Refused(vec![summary.clone()]));
        assert_eq!(refused.exit_code(), 1);
        assert_eq!(std::fs::read_to_string(&summary).unwrap(), "old");
        assert!(!dir.path().join("isv_UsageOverTime.csv").exists());

        let forced = analysis.publish_unless_conflicting(true).unwrap();
        assert!(matches!(&forced, Publication::Written(files) if files.len() == 2));
        assert_eq!(forced.exit_code(), 0);
        assert_ne!(std::fs::read_to_string(&summary).unwrap(), "old");
    }

    #[test]
    fn test_fresh_outputs_written_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("isv.log");
        std::fs::write(&input, ISV_LOG).unwrap();

        let options = AnalysisOptions::default();
        let analysis =
            LogAnalysis::load(&input.to_string_lossy(), dir.path(), &options).unwrap();
        let publication = analysis.publish_unless_conflicting(false).unwrap();
        assert_eq!(publication.exit_code(), 0);
        assert!(dir.path().join("isv_Summary.txt").exists());
    }
}
