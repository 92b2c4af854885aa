// RLM Log Reader - tests/e2e_logs.rs
//
// End-to-end tests for the analysis pipeline.
//
// Each test reads a real log from tests/fixtures, runs detection, extraction,
// usage and duration analysis, publishes into a temporary directory, and
// checks the written files line by line.

use rlm_log_reader::app::analysis::{AnalysisOptions, LogAnalysis};
use rlm_log_reader::app::batch::{run_batch, BatchOptions, BatchOutcome};
use rlm_log_reader::core::model::LogFormat;
use rlm_log_reader::util::constants;
use std::fs;
use std::path::{Path, PathBuf};

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture files.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn with_event_data() -> AnalysisOptions {
    AnalysisOptions {
        write_event_data: true,
        ..AnalysisOptions::default()
    }
}

fn load(name: &str, output_dir: &Path, options: &AnalysisOptions) -> LogAnalysis {
    let input = fixture(name);
    LogAnalysis::load(&input.to_string_lossy(), output_dir, options)
        .unwrap_or_else(|e| panic!("failed to analyse {name}: {e}"))
}

fn load_error(name: &str) -> String {
    let out = tempfile::tempdir().unwrap();
    let input = fixture(name);
    match LogAnalysis::load(&input.to_string_lossy(), out.path(), &AnalysisOptions::default()) {
        Ok(_) => panic!("expected {name} to be rejected"),
        Err(e) => e.to_string(),
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
        .lines()
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Report log
// =============================================================================

#[test]
fn e2e_report_log_publishes_five_files() {
    let out = tempfile::tempdir().unwrap();
    let analysis = load("SampleLog_Report.log", out.path(), &with_event_data());

    assert_eq!(analysis.format(), LogFormat::Report);
    assert_eq!(analysis.events().events.len(), 20);

    let written = analysis.publish_all().unwrap();
    let names: Vec<_> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        [
            "SampleLog_Report_Summary.txt",
            "SampleLog_Report_UsageOverTime.csv",
            "SampleLog_Report_UsageDuration.csv",
            "SampleLog_Report_TotalDuration.csv",
            "SampleLog_Report_AllEventData.txt",
        ]
    );
}

#[test]
fn e2e_report_log_summary() {
    let out = tempfile::tempdir().unwrap();
    let analysis = load("SampleLog_Report.log", out.path(), &AnalysisOptions::default());
    analysis.publish().unwrap();

    let lines = read_lines(&analysis.plan().summary);
    let expected = [
        "Log Data Summary For:",
        analysis.input(),
        "",
        "Server Name: Win2008",
        "",
        "Server Start(s): (2 Total)",
        "05/11/2013 15:16:49 Win2008 ",
        "05/11/2013 15:24:28 Win2008 ",
        "",
        "Server Shutdown(s): (1 Total)",
        "05/11/2013 15:23:15 ",
        "",
        "Product(s): (3 Total)",
        "simulator",
        "analytics",
        "datavis",
        "",
        "Users(s): (2 Total)",
        "cecil",
        "terra",
        "",
        "Denials(s): (1 Total)",
        "05/11/2013 15:20 simulator 2.1 cecil ",
    ];
    assert_eq!(lines, expected);
}

#[test]
fn e2e_report_log_usage_over_time() {
    let out = tempfile::tempdir().unwrap();
    let analysis = load("SampleLog_Report.log", out.path(), &AnalysisOptions::default());
    analysis.publish().unwrap();

    let lines = read_lines(&analysis.plan().usage);
    assert_eq!(
        lines[0],
        "Date/Time,\
         simulator Licenses in use,simulator Unique user count,simulator Total licenses,\
         analytics Licenses in use,analytics Unique user count,analytics Total licenses,\
         datavis Licenses in use,datavis Unique user count,datavis Total licenses"
    );
    assert_eq!(
        &lines[1..],
        [
            "05/11/2013 15:17:14,0,0,1,1,1,2,0,0,0",
            "05/11/2013 15:19:08,1,1,1,1,1,2,0,0,0",
            "05/11/2013 15:22:13,0,0,1,1,1,2,0,0,0",
            "05/11/2013 15:23:15,0,0,1,0,0,2,0,0,0",
            "05/11/2013 15:25:00,0,0,50,0,0,3,1,1,10",
            "05/11/2013 15:26:36,0,0,50,1,1,3,1,1,10",
            "05/11/2013 15:28:06,0,0,50,1,1,3,2,1,10",
            "05/11/2013 16:07:39,0,0,50,0,0,3,2,1,10",
            // Check-in by a user with no recorded checkout while licenses
            // remain out: one unique user is reported.
            "05/12/2013 01:32:28,0,0,50,0,0,3,1,1,10",
        ]
    );
}

#[test]
fn e2e_report_log_usage_durations() {
    let out = tempfile::tempdir().unwrap();
    let analysis = load("SampleLog_Report.log", out.path(), &AnalysisOptions::default());
    analysis.publish().unwrap();

    let plan = analysis.plan();
    let sessions = read_lines(plan.usage_duration.as_ref().unwrap());
    assert_eq!(
        sessions,
        [
            "Checkout Date/Time,Checkin Date/Time,Product,Version,User,Duration (HH:MM:SS)",
            "05/11/2013 15:17:14,05/11/2013 15:23:15,analytics,2.09,cecil,00:06:01",
            "05/11/2013 15:19:08,05/11/2013 15:22:13,simulator,2.12,terra,00:03:05",
            format!(
                "05/11/2013 15:25:00,{},datavis,2.04,cecil,10:07:28",
                constants::STILL_CHECKED_OUT
            )
            .as_str(),
            "05/11/2013 15:26:36,05/11/2013 16:07:39,analytics,3.03,terra,00:41:03",
            "05/11/2013 15:28:06,05/12/2013 01:32:28,datavis,3.01,cecil,10:04:22",
        ]
    );

    let totals = read_lines(plan.total_duration.as_ref().unwrap());
    assert_eq!(
        totals,
        [
            "User,simulator Duration (HH:MM:SS),analytics Duration (HH:MM:SS),datavis Duration (HH:MM:SS)",
            "cecil,00:00:00,00:06:01,20:11:50",
            "terra,00:03:05,00:41:03,00:00:00",
        ]
    );
}

#[test]
fn e2e_report_log_event_data() {
    let out = tempfile::tempdir().unwrap();
    let analysis = load("SampleLog_Report.log", out.path(), &with_event_data());
    let path = analysis.publish_event_data().unwrap();

    let lines = read_lines(&path);
    assert_eq!(lines.len(), 20);
    assert_eq!(lines[0], "START 05/11/2013 15:16:49 Win2008");
    assert_eq!(lines[1], "PRODUCT simulator 3.12 1");
    assert_eq!(lines[3], "OUT 05/11/2013 15:17:14 analytics 2.09 cecil win2008 1 41");
    assert_eq!(lines[5], "DENY 05/11/2013 15:20 simulator 2.1 cecil win2008 1");
    assert_eq!(lines[6], "IN 05/11/2013 15:22:13 simulator 2.12 terra ubuntu 0 81");
    assert_eq!(lines[7], "SHUTDOWN 05/11/2013 15:23:15");
    assert_eq!(lines[19], "IN 05/12/2013 01:32:28 datavis 3.01 terra ubuntu 1 c1");
}

#[test]
fn e2e_report_log_year_advances_at_new_year() {
    let out = tempfile::tempdir().unwrap();
    let analysis = load("NewYear.log", out.path(), &AnalysisOptions::default());
    analysis.publish().unwrap();

    let usage = read_lines(&analysis.plan().usage);
    assert_eq!(
        &usage[1..],
        [
            "12/31/2012 17:55:19,6,1,50",
            "01/01/2013 00:00:05,5,1,50",
            "01/01/2013 01:03:47,6,1,50",
        ]
    );

    let sessions = read_lines(analysis.plan().usage_duration.as_ref().unwrap());
    assert_eq!(
        sessions[1],
        "12/31/2012 17:55:19,01/01/2013 00:00:05,analytics,3.03,amy,06:04:46"
    );
}

// =============================================================================
// ISV log
// =============================================================================

#[test]
fn e2e_isv_log_publishes_without_durations() {
    let out = tempfile::tempdir().unwrap();
    let analysis = load("SampleLog_ISV.log", out.path(), &with_event_data());

    assert_eq!(analysis.format(), LogFormat::Isv);
    assert!(analysis.durations().is_none());
    assert!(analysis.plan().usage_duration.is_none());

    let written = analysis.publish_all().unwrap();
    assert_eq!(written.len(), 3);
    assert!(written.iter().all(|p| p.exists()));
    assert!(!out.path().join("SampleLog_ISV_UsageDuration.csv").exists());
}

#[test]
fn e2e_isv_log_summary_and_usage() {
    let out = tempfile::tempdir().unwrap();
    let analysis = load("SampleLog_ISV.log", out.path(), &AnalysisOptions::default());
    analysis.publish().unwrap();

    let summary = read_lines(&analysis.plan().summary);
    assert_eq!(summary[3], "Server Name: Win2008");
    assert_eq!(summary[5], "Server Start(s): (2 Total)");
    assert_eq!(summary[6], "05/11 15:16 Win2008 ");
    assert!(summary.contains(&"05/11 15:23 ".to_string()));
    assert_eq!(
        summary.last().map(String::as_str),
        Some("05/11 15:20 simulator 2.1 cecil ")
    );

    let usage = read_lines(&analysis.plan().usage);
    assert_eq!(
        usage,
        [
            "Date/Time,\
             analytics Licenses in use,analytics Unique user count,\
             simulator Licenses in use,simulator Unique user count,\
             datavis Licenses in use,datavis Unique user count",
            "05/11 15:17,1,1,0,0,0,0",
            "05/11 15:19,1,1,1,1,0,0",
            "05/11 15:22,1,1,0,0,0,0",
            "05/11 15:23,0,0,0,0,0,0",
            "05/11 15:25,0,0,0,0,1,1",
            "05/11 15:26,1,1,0,0,1,1",
            "05/11 15:28,1,1,0,0,3,1",
            "05/11 16:07,0,0,0,0,3,1",
            "05/12 01:32,0,0,0,0,1,1",
        ]
    );
}

#[test]
fn e2e_windows_line_endings_match_unix() {
    let unix_out = tempfile::tempdir().unwrap();
    let windows_out = tempfile::tempdir().unwrap();
    let unix = load("SampleLog_ISV.log", unix_out.path(), &AnalysisOptions::default());
    let windows = load("WindowsLineEndings.log", windows_out.path(), &AnalysisOptions::default());
    unix.publish().unwrap();
    windows.publish().unwrap();

    assert_eq!(
        read_lines(&unix.plan().usage),
        read_lines(&windows.plan().usage)
    );
    assert_eq!(windows.events().server_name.as_deref(), Some("Win2008"));
}

// =============================================================================
// Rejected logs
// =============================================================================

#[test]
fn e2e_rejects_unsupported_files() {
    for name in ["Empty.log", "PlainText.txt", "RLMServer.log"] {
        let message = load_error(name);
        assert!(
            message.starts_with("Log file format is invalid."),
            "{name}: unexpected error {message}"
        );
    }
}

#[test]
fn e2e_reports_line_of_bad_event() {
    assert_eq!(load_error("MissingData.log"), "Missing data on line 5");
    assert_eq!(
        load_error("ISVBadVersion.log"),
        "Invalid product version formatting on line 2"
    );
}

#[test]
fn e2e_missing_input_file() {
    let message = load_error("NoSuchLog.log");
    assert!(message.starts_with("Unable to open file:"), "{message}");
}

// =============================================================================
// Overwrite and batch
// =============================================================================

#[test]
fn e2e_second_run_reports_conflicts() {
    let out = tempfile::tempdir().unwrap();
    let first = load("SampleLog_Report.log", out.path(), &AnalysisOptions::default());
    assert!(first.conflicts().is_empty());
    first.publish().unwrap();

    let second = load("SampleLog_Report.log", out.path(), &with_event_data());
    // The event-data file was never written, so only four files clash.
    assert_eq!(second.conflicts().len(), 4);
}

#[test]
fn e2e_batch_over_fixtures() {
    let out = tempfile::tempdir().unwrap();
    let options = BatchOptions {
        analysis: AnalysisOptions::default(),
        include_patterns: vec!["*.log".to_string(), "*.txt".to_string()],
        max_files: 100,
    };
    let fixtures = fixture("");

    let entries = run_batch(&fixtures, out.path(), &options, false).unwrap();
    let outcome = |name: &str| {
        entries
            .iter()
            .find(|e| e.input.file_name().is_some_and(|n| n == name))
            .map(|e| &e.outcome)
            .unwrap_or_else(|| panic!("{name} missing from batch"))
    };

    assert_eq!(entries.len(), 9);
    assert!(matches!(outcome("SampleLog_Report.log"), BatchOutcome::Published(f) if f.len() == 4));
    assert!(matches!(outcome("SampleLog_ISV.log"), BatchOutcome::Published(f) if f.len() == 2));
    assert!(matches!(outcome("NewYear.log"), BatchOutcome::Published(_)));
    assert!(matches!(outcome("MissingData.log"), BatchOutcome::Failed(m) if m == "Missing data on line 5"));
    assert!(matches!(outcome("PlainText.txt"), BatchOutcome::Failed(_)));

    // A second pass finds every output in place.
    let again = run_batch(&fixtures, out.path(), &options, false).unwrap();
    let skipped = again
        .iter()
        .filter(|e| matches!(e.outcome, BatchOutcome::Skipped(_)))
        .count();
    assert_eq!(skipped, 4);
}
