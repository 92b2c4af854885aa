// RLM Log Reader - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// User-facing messages are shown verbatim in the GUI error dialog and on
// stderr, so their wording is part of the interface.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all RLM Log Reader operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum RlmLogError {
    /// Reading or interpreting the input log failed.
    Parse(ParseError),

    /// Computing usage statistics failed.
    Analysis(AnalysisError),

    /// Writing the result files failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),
}

impl fmt::Display for RlmLogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "{e}"),
            Self::Analysis(e) => write!(f, "{e}"),
            Self::Export(e) => write!(f, "{e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for RlmLogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Analysis(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// Errors raised while loading the log and extracting its events.
#[derive(Debug)]
pub enum ParseError {
    /// No input file was given.
    NoFileSelected,

    /// The input file could not be opened or read.
    CannotOpenFile { path: PathBuf, source: io::Error },

    /// The file is neither an RLM report log nor an ISV log.
    InvalidFormat,

    /// An event line has fewer columns than its layout requires.
    MissingData { line: usize },

    /// An ISV IN line carries a parenthesised detail that could not be removed.
    UnexpectedInDetail { line: usize },

    /// An ISV product version does not start with `v`.
    InvalidProductVersion { line: usize },

    /// A date column does not have the `MM/DD/YYYY` shape.
    InvalidDate { line: usize, raw: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFileSelected => write!(f, "No file selected"),
            Self::CannotOpenFile { path, .. } => {
                write!(f, "Unable to open file: {}", path.display())
            }
            Self::InvalidFormat => write!(
                f,
                "Log file format is invalid.  Only RLM report and ISV logs are supported.  \
                 Consult the README file for more information."
            ),
            Self::MissingData { line } => write!(f, "Missing data on line {line}"),
            Self::UnexpectedInDetail { line } => {
                write!(f, "Unexpected IN event details on line {line}")
            }
            Self::InvalidProductVersion { line } => {
                write!(f, "Invalid product version formatting on line {line}")
            }
            Self::InvalidDate { line, raw } => {
                write!(f, "Invalid date '{raw}' on line {line}")
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CannotOpenFile { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ParseError> for RlmLogError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// Analysis errors
// ---------------------------------------------------------------------------

/// Errors raised while computing usage and duration tables.
#[derive(Debug)]
pub enum AnalysisError {
    /// A product or user name was not registered during extraction.
    UnknownName { name: String },

    /// A date/time pair could not be interpreted.
    InvalidTimestamp { date: String, time: String },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownName { name } => write!(f, "No index to '{name}'"),
            Self::InvalidTimestamp { date, time } => {
                write!(f, "Cannot interpret date/time '{date} {time}'")
            }
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<AnalysisError> for RlmLogError {
    fn from(e: AnalysisError) -> Self {
        Self::Analysis(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to writing result files.
#[derive(Debug)]
pub enum ExportError {
    /// No output directory was given.
    NoDirectorySelected,

    /// The output directory does not exist or is not a directory.
    DirectoryNotFound { path: PathBuf },

    /// A result file could not be created or written.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDirectorySelected => write!(f, "No directory selected"),
            Self::DirectoryNotFound { path } => {
                write!(f, "Unable to open directory: {}", path.display())
            }
            Self::Io { path, .. } => write!(f, "Unable to open file: {}", path.display()),
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ExportError> for RlmLogError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// A glob pattern in the config is invalid.
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::InvalidPattern { pattern, source } => {
                write!(f, "Invalid file pattern '{pattern}': {source}")
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::InvalidPattern { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for RlmLogError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for RLM Log Reader results.
pub type Result<T> = std::result::Result<T, RlmLogError>;
