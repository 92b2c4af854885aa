// RLM Log Reader - platform/config.rs
//
// Platform directory resolution and config.toml loading with startup
// validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for configuration and saved settings.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/rlmlogreader/ or %APPDATA%\RLMLogReader\config\)
    pub config_dir: PathBuf,

    /// Data directory holding the GUI settings file.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        match ProjectDirs::from("", "", constants::APP_ID) {
            Some(dirs) => {
                let config_dir = dirs.config_dir().to_path_buf();
                let data_dir = dirs.data_dir().to_path_buf();
                tracing::debug!(
                    config = %config_dir.display(),
                    data = %data_dir.display(),
                    "Platform paths resolved"
                );
                Self {
                    config_dir,
                    data_dir,
                }
            }
            None => {
                tracing::warn!("Could not determine platform directories, using current directory");
                Self {
                    config_dir: PathBuf::from("."),
                    data_dir: PathBuf::from("."),
                }
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are ignored so a newer config file still loads.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub logging: LoggingSection,
    pub parsing: ParsingSection,
    pub output: OutputSection,
    pub batch: BatchSection,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// `[parsing]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ParsingSection {
    /// Lines examined for format detection.
    pub detection_lines: Option<usize>,
}

/// `[output]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Also write the `_AllEventData.txt` dump.
    pub write_event_data: Option<bool>,
    /// Open the output directory after publishing (GUI only).
    pub open_output_dir: Option<bool>,
}

/// `[batch]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct BatchSection {
    /// File name globs selecting batch inputs.
    pub include_patterns: Option<Vec<String>>,
    /// Maximum files processed per batch run.
    pub max_files: Option<usize>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: Option<String>,
    pub log_file: Option<String>,

    pub detection_lines: usize,

    pub write_event_data: bool,
    pub open_output_dir: bool,

    pub include_patterns: Vec<String>,
    pub max_batch_files: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            log_file: None,
            detection_lines: constants::DEFAULT_CONTENT_DETECTION_LINES,
            write_event_data: false,
            open_output_dir: true,
            include_patterns: constants::DEFAULT_INCLUDE_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            max_batch_files: constants::DEFAULT_MAX_BATCH_FILES,
        }
    }
}

/// Load and validate `config.toml` from `config_dir`.
///
/// Returns the validated config and a list of non-fatal warnings. A missing
/// file gives defaults with no warnings. An unreadable or unparseable file
/// gives defaults with one warning.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(source) => {
            let err = ConfigError::Io {
                path: config_path.clone(),
                source,
            };
            tracing::warn!(error = %err, "Using default configuration");
            warnings.push(format!("{err}. Using defaults."));
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(source) => {
            let err = ConfigError::TomlParse {
                path: config_path.clone(),
                source,
            };
            tracing::warn!(error = %err, "Using default configuration");
            warnings.push(format!(
                "{err}. Using defaults. See config.example.toml for the expected format."
            ));
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let config = validate(raw, &mut warnings);
    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }
    (config, warnings)
}

fn out_of_range(field: &str, value: impl ToString, expected: String) -> String {
    ConfigError::ValueOutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        expected,
    }
    .to_string()
}

/// Check each raw field against its limits, accumulating all warnings.
fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    if let Some(level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level);
        } else {
            warnings.push(out_of_range(
                "logging.level",
                &level,
                format!("one of {}. Using default ({})", valid.join(", "), constants::DEFAULT_LOG_LEVEL),
            ));
        }
    }

    if let Some(file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file);
        }
    }

    if let Some(lines) = raw.parsing.detection_lines {
        if (1..=constants::MAX_CONTENT_DETECTION_LINES).contains(&lines) {
            config.detection_lines = lines;
        } else {
            warnings.push(out_of_range(
                "parsing.detection_lines",
                lines,
                format!(
                    "1-{}. Using default ({})",
                    constants::MAX_CONTENT_DETECTION_LINES,
                    constants::DEFAULT_CONTENT_DETECTION_LINES
                ),
            ));
        }
    }

    if let Some(write) = raw.output.write_event_data {
        config.write_event_data = write;
    }
    if let Some(open) = raw.output.open_output_dir {
        config.open_output_dir = open;
    }

    if let Some(patterns) = raw.batch.include_patterns {
        let mut valid = Vec::new();
        for pattern in patterns {
            match glob::Pattern::new(&pattern) {
                Ok(_) => valid.push(pattern),
                Err(source) => warnings.push(
                    ConfigError::InvalidPattern {
                        pattern: pattern.clone(),
                        source,
                    }
                    .to_string(),
                ),
            }
        }
        if valid.is_empty() {
            warnings.push("[batch] include_patterns has no valid pattern. Using defaults.".to_string());
        } else {
            config.include_patterns = valid;
        }
    }

    if let Some(files) = raw.batch.max_files {
        if (constants::MIN_MAX_BATCH_FILES..=constants::ABSOLUTE_MAX_BATCH_FILES).contains(&files) {
            config.max_batch_files = files;
        } else {
            warnings.push(out_of_range(
                "batch.max_files",
                files,
                format!(
                    "{}-{}. Using default ({})",
                    constants::MIN_MAX_BATCH_FILES,
                    constants::ABSOLUTE_MAX_BATCH_FILES,
                    constants::DEFAULT_MAX_BATCH_FILES
                ),
            ));
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_from(content: &str) -> (AppConfig, Vec<String>) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(constants::CONFIG_FILE_NAME), content).unwrap();
        load_config(dir.path())
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(dir.path());
        assert!(warnings.is_empty());
        assert_eq!(config.detection_lines, constants::DEFAULT_CONTENT_DETECTION_LINES);
        assert!(!config.write_event_data);
        assert!(config.open_output_dir);
        assert_eq!(config.include_patterns, ["*.log", "*.txt"]);
    }

    #[test]
    fn test_valid_values_are_applied() {
        let (config, warnings) = load_from(
            r#"
            [logging]
            level = "debug"
            file = "/tmp/rlm.log"

            [parsing]
            detection_lines = 50

            [output]
            write_event_data = true
            open_output_dir = false

            [batch]
            include_patterns = ["*.rlog"]
            max_files = 20
            "#,
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.log_file.as_deref(), Some("/tmp/rlm.log"));
        assert_eq!(config.detection_lines, 50);
        assert!(config.write_event_data);
        assert!(!config.open_output_dir);
        assert_eq!(config.include_patterns, ["*.rlog"]);
        assert_eq!(config.max_batch_files, 20);
    }

    #[test]
    fn test_out_of_range_values_warn_and_default() {
        let (config, warnings) = load_from(
            r#"
            [parsing]
            detection_lines = 0

            [batch]
            max_files = 1000000
            "#,
        );
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("parsing.detection_lines"));
        assert_eq!(config.detection_lines, constants::DEFAULT_CONTENT_DETECTION_LINES);
        assert_eq!(config.max_batch_files, constants::DEFAULT_MAX_BATCH_FILES);
    }

    #[test]
    fn test_bad_level_and_pattern_warn() {
        let (config, warnings) = load_from(
            r#"
            [logging]
            level = "loud"

            [batch]
            include_patterns = ["[", "*.log"]
            "#,
        );
        assert_eq!(warnings.len(), 2);
        assert!(config.log_level.is_none());
        assert_eq!(config.include_patterns, ["*.log"]);
    }

    #[test]
    fn test_unparseable_file_warns() {
        let (config, warnings) = load_from("this is = = not toml");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Config parse error"));
        assert_eq!(config.max_batch_files, constants::DEFAULT_MAX_BATCH_FILES);
    }
}
