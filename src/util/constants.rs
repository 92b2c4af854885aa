// RLM Log Reader - util/constants.rs
//
// Single source of truth for named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "RLM Log Reader";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "RLMLogReader";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Format detection
// =============================================================================

/// Number of lines examined from the start of a file for format detection.
/// Both report and ISV logs identify themselves on their first lines.
pub const DEFAULT_CONTENT_DETECTION_LINES: usize = 20;

/// Upper bound on the configurable detection window.
pub const MAX_CONTENT_DETECTION_LINES: usize = 10_000;

/// Marker line written at the top of every RLM report log.
pub const REPORT_LOG_MARKER: &str = "RLM Report Log Format";

/// Tag carried by every line of the RLM server's own debug log.
/// That log has the ISV shape but no usage data.
pub const RLM_SERVER_LOG_TAG: &str = "rlm";

// =============================================================================
// Batch processing
// =============================================================================

/// Maximum number of files to process in a single batch run.
pub const DEFAULT_MAX_BATCH_FILES: usize = 500;

/// Minimum sensible batch file limit.
pub const MIN_MAX_BATCH_FILES: usize = 1;

/// Hard upper bound on batch file count.
pub const ABSOLUTE_MAX_BATCH_FILES: usize = 10_000;

/// Default filename globs for batch discovery.
pub const DEFAULT_INCLUDE_PATTERNS: &[&str] = &["*.log", "*.txt"];

// =============================================================================
// Output files
// =============================================================================

/// Suffix of the plain-text summary report.
pub const SUMMARY_SUFFIX: &str = "_Summary.txt";

/// Suffix of the space-separated dump of every extracted event.
pub const EVENT_DATA_SUFFIX: &str = "_AllEventData.txt";

/// Suffix of the usage-over-time CSV.
pub const USAGE_SUFFIX: &str = "_UsageOverTime.csv";

/// Suffix of the per-checkout duration CSV (report logs only).
pub const USAGE_DURATION_SUFFIX: &str = "_UsageDuration.csv";

/// Suffix of the per-user total duration CSV (report logs only).
pub const TOTAL_DURATION_SUFFIX: &str = "_TotalDuration.csv";

/// Check-in column text for a checkout with no matching IN or SHUTDOWN.
pub const STILL_CHECKED_OUT: &str = "(Still checked out)";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// GUI settings file name (stored in the platform data directory).
pub const SETTINGS_FILE_NAME: &str = "settings.json";
