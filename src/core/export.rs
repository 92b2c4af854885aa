// RLM Log Reader - core/export.rs
//
// Output file naming and the writers for each report.
// Core layer: writes to any Write trait object; opening files is left to
// the caller.

use crate::core::model::{DurationReport, EventLog, LogFormat, UsageOverTime};
use crate::core::text::file_stem;
use crate::core::time::format_hms;
use crate::util::constants;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::{Path, PathBuf};

// =============================================================================
// Output plan
// =============================================================================

/// The files produced for one input log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlan {
    pub summary: PathBuf,
    pub event_data: PathBuf,
    pub usage: PathBuf,
    /// Report logs only.
    pub usage_duration: Option<PathBuf>,
    /// Report logs only.
    pub total_duration: Option<PathBuf>,
}

impl OutputPlan {
    /// Name the outputs `<stem><suffix>` inside `output_dir`, where `stem`
    /// is the input file name without its final extension.
    pub fn new(output_dir: &Path, input_path: &str, format: LogFormat) -> Self {
        let stem = file_stem(input_path);
        let named = |suffix: &str| output_dir.join(format!("{stem}{suffix}"));

        let (usage_duration, total_duration) = if format.has_durations() {
            (
                Some(named(constants::USAGE_DURATION_SUFFIX)),
                Some(named(constants::TOTAL_DURATION_SUFFIX)),
            )
        } else {
            (None, None)
        };

        Self {
            summary: named(constants::SUMMARY_SUFFIX),
            event_data: named(constants::EVENT_DATA_SUFFIX),
            usage: named(constants::USAGE_SUFFIX),
            usage_duration,
            total_duration,
        }
    }

    /// Every planned path, including the event-data file.
    pub fn paths(&self) -> Vec<&Path> {
        let mut paths = vec![
            self.summary.as_path(),
            self.event_data.as_path(),
            self.usage.as_path(),
        ];
        paths.extend(self.usage_duration.as_deref());
        paths.extend(self.total_duration.as_deref());
        paths
    }

    /// Planned paths that already exist on disk.
    ///
    /// The event-data file only counts when it will be written.
    pub fn conflicts(&self, include_event_data: bool) -> Vec<PathBuf> {
        self.paths()
            .into_iter()
            .filter(|p| include_event_data || *p != self.event_data.as_path())
            .filter(|p| p.exists())
            .map(Path::to_path_buf)
            .collect()
    }
}

// =============================================================================
// Writers
// =============================================================================

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ExportError + '_ {
    move |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn csv_error(path: &Path) -> impl FnOnce(csv::Error) -> ExportError + '_ {
    move |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

fn csv_writer<W: Write>(writer: W, delimiter: u8) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(writer)
}

/// Write the plain-text summary: server name, starts, shutdowns, products,
/// users, and denials.
pub fn write_summary<W: Write>(
    log: &EventLog,
    input_path: &str,
    mut writer: W,
    export_path: &Path,
) -> Result<(), ExportError> {
    let mut text = String::new();
    text.push_str("Log Data Summary For:\n");
    text.push_str(input_path);
    text.push_str("\n\n");
    text.push_str(&format!(
        "Server Name: {}\n\n",
        log.server_name.as_deref().unwrap_or("")
    ));

    let starts: Vec<_> = log.starts().collect();
    text.push_str(&format!("Server Start(s): ({} Total)\n", starts.len()));
    for start in &starts {
        text.push_str(&format!(
            "{} {} {} \n",
            start.stamp.date, start.stamp.time, start.server
        ));
    }
    text.push('\n');

    let shutdowns: Vec<_> = log.shutdowns().collect();
    text.push_str(&format!("Server Shutdown(s): ({} Total)\n", shutdowns.len()));
    for stamp in &shutdowns {
        text.push_str(&format!("{} {} \n", stamp.date, stamp.time));
    }
    text.push('\n');

    text.push_str(&format!("Product(s): ({} Total)\n", log.products.len()));
    for product in &log.products {
        text.push_str(product);
        text.push('\n');
    }
    text.push('\n');

    text.push_str(&format!("Users(s): ({} Total)\n", log.users.len()));
    for user in &log.users {
        text.push_str(user);
        text.push('\n');
    }
    text.push('\n');

    let denials: Vec<_> = log.denials().collect();
    text.push_str(&format!("Denials(s): ({} Total)\n", denials.len()));
    for denial in &denials {
        text.push_str(&format!(
            "{} {} {} {} {} \n",
            denial.stamp.date, denial.stamp.time, denial.product, denial.version, denial.user
        ));
    }

    writer
        .write_all(text.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(io_error(export_path))
}

/// Write every extracted event, one per line, fields separated by spaces.
pub fn write_event_data<W: Write>(
    log: &EventLog,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(b' ')
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(writer);

    for event in &log.events {
        out.write_record(event.fields())
            .map_err(csv_error(export_path))?;
    }
    out.flush().map_err(io_error(export_path))?;
    Ok(log.events.len())
}

/// Write the concurrent usage table as CSV.
pub fn write_usage_csv<W: Write>(
    usage: &UsageOverTime,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut out = csv_writer(writer, b',');
    out.write_record(usage.header())
        .map_err(csv_error(export_path))?;

    let rows = usage.rows();
    for row in &rows {
        out.write_record(row).map_err(csv_error(export_path))?;
    }
    out.flush().map_err(io_error(export_path))?;
    Ok(rows.len())
}

/// Write one row per checkout with its check-in time and duration.
pub fn write_duration_csv<W: Write>(
    report: &DurationReport,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut out = csv_writer(writer, b',');
    out.write_record([
        "Checkout Date/Time",
        "Checkin Date/Time",
        "Product",
        "Version",
        "User",
        "Duration (HH:MM:SS)",
    ])
    .map_err(csv_error(export_path))?;

    for session in &report.sessions {
        let checkin = session
            .checkin
            .as_ref()
            .map(|s| s.to_string())
            .unwrap_or_else(|| constants::STILL_CHECKED_OUT.to_string());
        out.write_record([
            session.checkout.to_string(),
            checkin,
            session.product.clone(),
            session.version.clone(),
            session.user.clone(),
            format_hms(session.duration),
        ])
        .map_err(csv_error(export_path))?;
    }
    out.flush().map_err(io_error(export_path))?;
    Ok(report.sessions.len())
}

/// Write the user-by-product matrix of total checkout time.
pub fn write_total_duration_csv<W: Write>(
    report: &DurationReport,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut out = csv_writer(writer, b',');

    let mut header = vec!["User".to_string()];
    header.extend(
        report
            .products
            .iter()
            .map(|p| format!("{p} Duration (HH:MM:SS)")),
    );
    out.write_record(&header).map_err(csv_error(export_path))?;

    for (user, totals) in report.users.iter().zip(&report.totals) {
        let mut row = vec![user.clone()];
        row.extend(totals.iter().map(|d| format_hms(*d)));
        out.write_record(&row).map_err(csv_error(export_path))?;
    }
    out.flush().map_err(io_error(export_path))?;
    Ok(report.users.len())
}
