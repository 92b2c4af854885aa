// RLM Log Reader - core/format.rs
//
// Content-based detection of the two supported log flavours.

use crate::core::model::LogFormat;
use crate::util::constants;
use crate::util::error::ParseError;
use regex::Regex;
use std::sync::OnceLock;

/// `MM/DD HH:MM (tag)` somewhere in the line, as written by ISV servers.
/// Captures the first parenthesised group, which is the server tag.
fn isv_line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\d+/\d+[^:]*?\d+:\d+.*?\(([^()]*)\)").expect("ISV line pattern is valid")
    })
}

/// Detect the log format from the first `max_lines` lines.
///
/// The first line that identifies a format wins. A report log announces
/// itself with a marker line. An ISV log is recognised by its date, time,
/// and parenthesised server tag; lines tagged `(rlm)` belong to the RLM
/// server's own log, which has no usage events and is rejected.
pub fn detect_format(lines: &[String], max_lines: usize) -> Result<LogFormat, ParseError> {
    for line in lines.iter().take(max_lines) {
        if line.contains(constants::REPORT_LOG_MARKER) {
            tracing::debug!("Detected RLM report log marker");
            return Ok(LogFormat::Report);
        }

        if let Some(caps) = isv_line_pattern().captures(line) {
            let tag = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
            if tag != constants::RLM_SERVER_LOG_TAG {
                tracing::debug!(tag, "Detected ISV log line");
                return Ok(LogFormat::Isv);
            }
        }
    }

    Err(ParseError::InvalidFormat)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.split('\n').map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detects_report_log() {
        let content = lines(
            "RLM Report Log Format 2, version 12.0 authentication flag: 0\n\
             START Win2008 05/11/2013 15:16:49",
        );
        assert_eq!(detect_format(&content, 20).unwrap(), LogFormat::Report);
    }

    #[test]
    fn test_detects_isv_log() {
        let content = lines("05/11 15:16 (isv) Server started on Win2008");
        assert_eq!(detect_format(&content, 20).unwrap(), LogFormat::Isv);
    }

    #[test]
    fn test_rejects_rlm_server_log() {
        let content = lines(
            "05/11 15:16 (rlm) RLM License Server Version 12.0\n\
             05/11 15:16 (rlm) Server started on Win2008 (hostid: 0a1b2c)",
        );
        assert!(matches!(
            detect_format(&content, 20),
            Err(ParseError::InvalidFormat)
        ));
    }

    #[test]
    fn test_rejects_empty_file() {
        assert!(matches!(
            detect_format(&lines(""), 20),
            Err(ParseError::InvalidFormat)
        ));
    }

    #[test]
    fn test_rejects_plain_text() {
        let content = lines("Hello world\nnothing to see: here");
        assert!(detect_format(&content, 20).is_err());
    }

    #[test]
    fn test_honours_detection_window() {
        let mut content = vec!["filler".to_string(); 5];
        content.push("RLM Report Log Format 2".to_string());
        assert!(detect_format(&content, 5).is_err());
        assert_eq!(detect_format(&content, 6).unwrap(), LogFormat::Report);
    }
}
