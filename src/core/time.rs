// RLM Log Reader - core/time.rs
//
// Conversions between the date/time columns of report logs and chrono.

use crate::core::text::leading_number;
use crate::util::error::AnalysisError;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// Combine a `MM/DD/YYYY` date and an `HH:MM[:SS]` time.
///
/// Report logs write most times with seconds, but DENY "last attempt"
/// columns omit them; a missing seconds field is zero.
pub fn parse_timestamp(date: &str, time: &str) -> Result<NaiveDateTime, AnalysisError> {
    let invalid = || AnalysisError::InvalidTimestamp {
        date: date.to_string(),
        time: time.to_string(),
    };

    let day = NaiveDate::parse_from_str(date, "%m/%d/%Y").map_err(|_| invalid())?;

    let parts: Vec<&str> = time.split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return Err(invalid());
    }
    let hours = u32::try_from(leading_number(parts[0])).map_err(|_| invalid())?;
    let minutes = u32::try_from(leading_number(parts[1])).map_err(|_| invalid())?;
    let seconds = match parts.get(2) {
        Some(s) => u32::try_from(leading_number(s)).map_err(|_| invalid())?,
        None => 0,
    };

    day.and_hms_opt(hours, minutes, seconds).ok_or_else(invalid)
}

/// Render a duration as `HH:MM:SS`.
///
/// Hours are not wrapped at 24 and negative spans carry a leading `-`.
pub fn format_hms(duration: TimeDelta) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{sign}{hours:02}:{minutes:02}:{seconds:02}")
}
