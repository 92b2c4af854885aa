// RLM Log Reader - core/events.rs
//
// Event extraction from tokenised log rows.
//
// Report logs are read through fixed column layouts. ISV logs first have
// each row rewritten into a report-like shape (keyword renames, `v` prefix
// stripping, `user@host` splitting, token counts) and are then read through
// their own layouts. Row numbers in errors are 1-based line numbers.

use crate::core::model::{
    Denial, EventLog, LicenseEvent, LogEvent, LogFormat, ProductPool, ServerStart, Stamp,
};
use crate::core::text::{leading_number, push_unique, tokenize};
use crate::util::error::ParseError;

// =============================================================================
// Column layouts
// =============================================================================

/// Source columns of an OUT, IN, or DENY row.
#[derive(Debug, Clone, Copy)]
struct LicenseColumns {
    date: usize,
    time: usize,
    product: usize,
    version: usize,
    user: usize,
    host: usize,
    count: Option<usize>,
    handle: Option<usize>,
}

/// Source columns of a START row.
#[derive(Debug, Clone, Copy)]
struct StartColumns {
    date: usize,
    time: usize,
    server: usize,
}

/// Source columns of a SHUTDOWN row.
#[derive(Debug, Clone, Copy)]
struct ShutdownColumns {
    date: usize,
    time: usize,
}

/// Source columns of a PRODUCT row.
#[derive(Debug, Clone, Copy)]
struct ProductColumns {
    product: usize,
    version: usize,
    count: usize,
}

/// Complete column layout of one log format.
#[derive(Debug, Clone, Copy)]
struct Layout {
    keyword: usize,
    out: LicenseColumns,
    checkin: LicenseColumns,
    deny: LicenseColumns,
    start: StartColumns,
    shutdown: ShutdownColumns,
    product: Option<ProductColumns>,
}

const REPORT_LAYOUT: Layout = Layout {
    keyword: 0,
    out: LicenseColumns {
        date: 16,
        time: 17,
        product: 1,
        version: 2,
        user: 4,
        host: 5,
        count: Some(8),
        handle: Some(10),
    },
    checkin: LicenseColumns {
        date: 11,
        time: 12,
        product: 2,
        version: 3,
        user: 4,
        host: 5,
        count: Some(8),
        handle: Some(10),
    },
    deny: LicenseColumns {
        date: 9,
        time: 10,
        product: 1,
        version: 2,
        user: 3,
        host: 4,
        count: Some(6),
        handle: None,
    },
    start: StartColumns {
        date: 2,
        time: 3,
        server: 1,
    },
    shutdown: ShutdownColumns { date: 3, time: 4 },
    product: Some(ProductColumns {
        product: 1,
        version: 2,
        count: 4,
    }),
};

/// Keyword column of ISV rows: `MM/DD HH:MM (isv) KEYWORD ...`.
const ISV_KEYWORD: usize = 3;

/// Column that holds the token count after ISV OUT/IN normalisation.
const ISV_TOKEN_COUNT: usize = 9;

const ISV_LAYOUT: Layout = Layout {
    keyword: ISV_KEYWORD,
    out: LicenseColumns {
        date: 0,
        time: 1,
        product: 4,
        version: 5,
        user: 7,
        host: 8,
        count: Some(ISV_TOKEN_COUNT),
        handle: None,
    },
    checkin: LicenseColumns {
        date: 0,
        time: 1,
        product: 4,
        version: 5,
        user: 7,
        host: 8,
        count: Some(ISV_TOKEN_COUNT),
        handle: None,
    },
    deny: LicenseColumns {
        date: 0,
        time: 1,
        product: 5,
        version: 6,
        user: 8,
        host: 9,
        count: None,
        handle: None,
    },
    start: StartColumns {
        date: 0,
        time: 1,
        server: 6,
    },
    shutdown: ShutdownColumns { date: 0, time: 1 },
    product: None,
};

impl Layout {
    fn for_format(format: LogFormat) -> &'static Layout {
        match format {
            LogFormat::Report => &REPORT_LAYOUT,
            LogFormat::Isv => &ISV_LAYOUT,
        }
    }
}

fn column<'a>(row: &'a [String], col: usize, line: usize) -> Result<&'a str, ParseError> {
    row.get(col)
        .map(String::as_str)
        .ok_or(ParseError::MissingData { line })
}

// =============================================================================
// Year tracking (report logs)
// =============================================================================

/// Report-log event dates are `MM/DD`; the year comes from START lines and
/// from standalone `MM/DD/YYYY HH:MM` date lines.
#[derive(Debug, Default)]
struct YearTracker {
    year: String,
    /// The current year already applies to January 1st, either because it
    /// was announced on that date or because it was rolled over.
    covers_new_year: bool,
}

impl YearTracker {
    fn set(&mut self, year: &str, announced_on: &str) {
        self.year = year.to_string();
        self.covers_new_year = announced_on == "01/01";
    }

    /// Pick up the year from a `MM/DD/YYYY HH:MM[:SS]` date line.
    fn observe_row(&mut self, row: &[String]) {
        if row.len() != 2 {
            return;
        }
        let parts = tokenize(&row[0], "/");
        if parts.len() == 3 {
            let announced_on = format!("{}/{}", parts[0], parts[1]);
            self.set(&parts[2], &announced_on);
        }
    }

    /// Append the year to an event date.
    ///
    /// Events in the first minute after midnight on January 1st are logged
    /// before the line announcing the new year, so they advance it.
    fn stamp(&mut self, date: &str, time: &str) -> String {
        if date == "01/01" && !self.covers_new_year {
            let clock = tokenize(time, ":");
            let first_minute = clock.len() >= 2 && clock[0] == "00" && clock[1] == "00";
            if first_minute {
                if let Ok(year) = self.year.parse::<i32>() {
                    self.year = (year + 1).to_string();
                    self.covers_new_year = true;
                    tracing::debug!(year = %self.year, "Year advanced at midnight on January 1st");
                }
            }
        }
        format!("{date}/{}", self.year)
    }
}

// =============================================================================
// ISV normalisation
// =============================================================================

/// Rewrite an ISV row in place so the ISV layout can read it.
fn normalise_isv_row(row: &mut Vec<String>, line: usize) -> Result<(), ParseError> {
    let Some(keyword) = row.get(ISV_KEYWORD) else {
        return Ok(());
    };

    match keyword.as_str() {
        "OUT:" => {
            row[ISV_KEYWORD] = "OUT".to_string();
            strip_version_prefix(row, ISV_LAYOUT.out.version, line)?;
            split_user_host(row, ISV_LAYOUT.out.user, line)?;
            insert_token_count(row);
        }
        "IN:" => {
            remove_in_details(row, line)?;
            if column(row, ISV_LAYOUT.checkin.product, line)?.contains('(') {
                return Err(ParseError::UnexpectedInDetail { line });
            }
            row[ISV_KEYWORD] = "IN".to_string();
            strip_version_prefix(row, ISV_LAYOUT.checkin.version, line)?;
            split_user_host(row, ISV_LAYOUT.checkin.user, line)?;
            insert_token_count(row);
        }
        "DENIED:" => {
            remove_no_good(row);
            row[ISV_KEYWORD] = "DENY".to_string();
            strip_version_prefix(row, ISV_LAYOUT.deny.version, line)?;
            split_user_host(row, ISV_LAYOUT.deny.user, line)?;
        }
        "Server" => row[ISV_KEYWORD] = "START".to_string(),
        "Shutdown" => row[ISV_KEYWORD] = "SHUTDOWN".to_string(),
        _ => {}
    }
    Ok(())
}

/// Drop a parenthesised note after `IN:`, e.g. `IN: (client exit) ...`.
/// A note with no closing paren is left in place.
fn remove_in_details(row: &mut Vec<String>, line: usize) -> Result<(), ParseError> {
    let first = ISV_LAYOUT.checkin.product;
    if !column(row, first, line)?.starts_with('(') {
        return Ok(());
    }
    if let Some(last) = (first..row.len()).find(|&col| row[col].contains(')')) {
        row.drain(first..=last);
    }
    Ok(())
}

/// Drop the `no good` pair some servers write after `DENIED:`.
fn remove_no_good(row: &mut Vec<String>) {
    let first = ISV_LAYOUT.deny.product;
    let is_no_good = row.get(first).is_some_and(|t| t == "no")
        && row.get(first + 1).is_some_and(|t| t == "good");
    if is_no_good {
        row.drain(first..first + 2);
    }
}

/// ISV versions are written `v1.2`; the `v` is required and removed.
fn strip_version_prefix(row: &mut [String], col: usize, line: usize) -> Result<(), ParseError> {
    let version = column(row, col, line)?;
    match version.strip_prefix('v') {
        Some(rest) => {
            row[col] = rest.to_string();
            Ok(())
        }
        None => Err(ParseError::InvalidProductVersion { line }),
    }
}

/// Split `user@host` into two adjacent columns.
fn split_user_host(row: &mut Vec<String>, col: usize, line: usize) -> Result<(), ParseError> {
    let mut parts = tokenize(column(row, col, line)?, "@").into_iter();
    let (Some(user), Some(host)) = (parts.next(), parts.next()) else {
        return Err(ParseError::MissingData { line });
    };
    row[col] = user;
    row.insert(col + 1, host);
    Ok(())
}

/// Insert the token count taken from a trailing `(N licenses)` note,
/// or 1 when the event has none.
fn insert_token_count(row: &mut Vec<String>) {
    let search_from = ISV_LAYOUT.out.host;
    let count = (search_from.max(1)..row.len())
        .find(|&col| row[col].contains("licenses)"))
        .map(|col| row[col - 1].chars().skip(1).collect::<String>())
        .unwrap_or_else(|| "1".to_string());
    let at = ISV_TOKEN_COUNT.min(row.len());
    row.insert(at, count);
}

// =============================================================================
// Extraction
// =============================================================================

struct Extractor {
    format: LogFormat,
    layout: &'static Layout,
    years: YearTracker,
    log: EventLog,
}

impl Extractor {
    fn event_date(&mut self, date: &str, time: &str) -> String {
        match self.format {
            LogFormat::Report => self.years.stamp(date, time),
            LogFormat::Isv => date.to_string(),
        }
    }

    fn push_timed(&mut self, event: LogEvent) {
        self.log.events.push(event);
        self.log.last_timed = Some(self.log.events.len() - 1);
    }

    fn license_event(
        &mut self,
        row: &[String],
        cols: LicenseColumns,
        line: usize,
    ) -> Result<LicenseEvent, ParseError> {
        let date = column(row, cols.date, line)?;
        let time = column(row, cols.time, line)?;
        let product = column(row, cols.product, line)?;
        let version = column(row, cols.version, line)?;
        let user = column(row, cols.user, line)?;
        let host = column(row, cols.host, line)?;
        let count = match cols.count {
            Some(col) => leading_number(column(row, col, line)?),
            None => 0,
        };
        let handle = match cols.handle {
            Some(col) => Some(column(row, col, line)?.to_string()),
            None => None,
        };

        let date = self.event_date(date, time);
        push_unique(product, &mut self.log.products);
        push_unique(user, &mut self.log.users);

        Ok(LicenseEvent {
            stamp: Stamp::new(date, time),
            product: product.to_string(),
            version: version.to_string(),
            user: user.to_string(),
            host: host.to_string(),
            count,
            handle,
        })
    }

    fn denial(&mut self, row: &[String], line: usize) -> Result<Denial, ParseError> {
        let cols = self.layout.deny;
        let date = column(row, cols.date, line)?;
        let time = column(row, cols.time, line)?;
        let product = column(row, cols.product, line)?;
        let version = column(row, cols.version, line)?;
        let user = column(row, cols.user, line)?;
        let host = column(row, cols.host, line)?;
        let count = match cols.count {
            Some(col) => Some(leading_number(column(row, col, line)?)),
            None => None,
        };

        Ok(Denial {
            stamp: Stamp::new(self.event_date(date, time), time),
            product: product.to_string(),
            version: version.to_string(),
            user: user.to_string(),
            host: host.to_string(),
            count,
        })
    }

    fn start(&mut self, row: &[String], line: usize) -> Result<ServerStart, ParseError> {
        let cols = self.layout.start;
        let date = column(row, cols.date, line)?;
        let time = column(row, cols.time, line)?;
        let server = column(row, cols.server, line)?;

        if self.format == LogFormat::Report {
            let parts = tokenize(date, "/");
            if parts.len() != 3 {
                return Err(ParseError::InvalidDate {
                    line,
                    raw: date.to_string(),
                });
            }
            let announced_on = format!("{}/{}", parts[0], parts[1]);
            self.years.set(&parts[2], &announced_on);
        }

        self.log.server_name = Some(server.to_string());
        Ok(ServerStart {
            stamp: Stamp::new(date, time),
            server: server.to_string(),
        })
    }

    fn shutdown(&mut self, row: &[String], line: usize) -> Result<Stamp, ParseError> {
        let cols = self.layout.shutdown;
        let date = column(row, cols.date, line)?;
        let time = column(row, cols.time, line)?;
        Ok(Stamp::new(self.event_date(date, time), time))
    }

    fn product(
        &mut self,
        row: &[String],
        cols: ProductColumns,
        line: usize,
    ) -> Result<ProductPool, ParseError> {
        let product = column(row, cols.product, line)?;
        let version = column(row, cols.version, line)?;
        let count = leading_number(column(row, cols.count, line)?);
        push_unique(product, &mut self.log.products);
        Ok(ProductPool {
            product: product.to_string(),
            version: version.to_string(),
            count,
        })
    }

    fn process_row(&mut self, row: &[String], line: usize) -> Result<(), ParseError> {
        self.years.observe_row(row);

        let Some(keyword) = row.get(self.layout.keyword) else {
            return Ok(());
        };

        match keyword.as_str() {
            "OUT" => {
                let event = self.license_event(row, self.layout.out, line)?;
                self.push_timed(LogEvent::Out(event));
            }
            "IN" => {
                let event = self.license_event(row, self.layout.checkin, line)?;
                self.push_timed(LogEvent::In(event));
            }
            "DENY" => {
                let denial = self.denial(row, line)?;
                self.push_timed(LogEvent::Deny(denial));
            }
            "START" => {
                let start = self.start(row, line)?;
                self.push_timed(LogEvent::Start(start));
            }
            "SHUTDOWN" => {
                let stamp = self.shutdown(row, line)?;
                self.push_timed(LogEvent::Shutdown(stamp));
            }
            "PRODUCT" => {
                if let Some(cols) = self.layout.product {
                    let pool = self.product(row, cols, line)?;
                    self.log.events.push(LogEvent::Product(pool));
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Extract typed events from tokenised rows (one row per log line).
pub fn extract_events(
    mut rows: Vec<Vec<String>>,
    format: LogFormat,
) -> Result<EventLog, ParseError> {
    if format == LogFormat::Isv {
        for (idx, row) in rows.iter_mut().enumerate() {
            normalise_isv_row(row, idx + 1)?;
        }
    }

    let mut extractor = Extractor {
        format,
        layout: Layout::for_format(format),
        years: YearTracker::default(),
        log: EventLog::default(),
    };

    for (idx, row) in rows.iter().enumerate() {
        extractor.process_row(row, idx + 1)?;
    }

    let log = extractor.log;
    tracing::debug!(
        format = %format,
        events = log.events.len(),
        products = log.products.len(),
        users = log.users.len(),
        "Events extracted"
    );
    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::text::tokenize_lines;

    fn extract(text: &str, format: LogFormat) -> Result<EventLog, ParseError> {
        let lines: Vec<String> = text.lines().map(|s| s.trim().to_string()).collect();
        extract_events(tokenize_lines(&lines), format)
    }

    fn event_lines(log: &EventLog) -> Vec<String> {
        log.events.iter().map(|e| e.fields().join(" ")).collect()
    }

    #[test]
    fn test_report_events_get_year_from_start() {
        let log = extract(
            r#"RLM Report Log Format 2, version 12.0 authentication flag: 0
               START Win2008 05/11/2013 15:16:49
               PRODUCT analytics 3.12 2 2 0 0 "" "" "" "" "" "" 0 0 0 0
               OUT analytics 2.09 2 cecil win2008 "" 1 1 0 41 41 2316 "" "" "" 05/11 15:17:14
               IN 1 analytics 2.09 cecil win2008 "" 1 0 0 41 05/11 15:22:13"#,
            LogFormat::Report,
        )
        .unwrap();

        assert_eq!(
            event_lines(&log),
            [
                "START 05/11/2013 15:16:49 Win2008",
                "PRODUCT analytics 3.12 2",
                "OUT 05/11/2013 15:17:14 analytics 2.09 cecil win2008 1 41",
                "IN 05/11/2013 15:22:13 analytics 2.09 cecil win2008 0 41",
            ]
        );
        assert_eq!(log.server_name.as_deref(), Some("Win2008"));
        assert_eq!(log.products, ["analytics"]);
        assert_eq!(log.users, ["cecil"]);
        assert_eq!(log.last_timed, Some(3));
    }

    #[test]
    fn test_report_year_rolls_over_once_at_midnight() {
        let log = extract(
            r#"RLM Report Log Format 2
               START host 12/31/2012 17:00:00
               OUT x 1.0 1 amy pc "" 1 6 0 a1 a1 10 "" "" "" 12/31 17:55:19
               IN 1 x 1.0 amy pc "" 1 5 0 a1 01/01 00:00:05
               OUT x 1.0 1 amy pc "" 1 6 0 a2 a2 10 "" "" "" 01/01 00:00:40
               OUT x 1.0 1 amy pc "" 1 7 0 a3 a3 10 "" "" "" 01/01 01:03:47"#,
            LogFormat::Report,
        )
        .unwrap();

        let dates: Vec<&str> = log
            .events
            .iter()
            .filter_map(|e| e.stamp())
            .map(|s| s.date.as_str())
            .collect();
        assert_eq!(
            dates,
            ["12/31/2012", "12/31/2012", "01/01/2013", "01/01/2013", "01/01/2013"]
        );
    }

    #[test]
    fn test_report_date_line_sets_year() {
        let log = extract(
            r#"RLM Report Log Format 2
               START host 12/31/2012 17:00:00
               01/01/2013 00:01
               OUT x 1.0 1 amy pc "" 1 6 0 a1 a1 10 "" "" "" 01/01 00:02:00"#,
            LogFormat::Report,
        )
        .unwrap();
        assert_eq!(log.events[1].stamp().unwrap().date, "01/01/2013");
    }

    #[test]
    fn test_report_short_row_is_missing_data() {
        let err = extract(
            "RLM Report Log Format 2\nSTART host 05/11/2013 15:16:49\nOUT analytics 2.09 2",
            LogFormat::Report,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing data on line 3");
    }

    #[test]
    fn test_report_start_requires_full_date() {
        let err = extract("RLM Report Log Format 2\nSTART host 05/11 15:16:49", LogFormat::Report)
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidDate { line: 2, .. }));
    }

    #[test]
    fn test_isv_rows_are_normalised() {
        let log = extract(
            "05/11 15:16 (isv) Server started on Win2008\n\
             05/11 15:17 (isv) OUT: analytics v2.09 by cecil@win2008\n\
             05/11 15:20 (isv) DENIED: (1) simulator v2.1 to cecil@win2008\n\
             05/11 15:22 (isv) IN: analytics v2.09 by cecil@win2008\n\
             05/11 15:23 (isv) Shutdown requested by admin@win2008",
            LogFormat::Isv,
        )
        .unwrap();

        assert_eq!(
            event_lines(&log),
            [
                "START 05/11 15:16 Win2008",
                "OUT 05/11 15:17 analytics 2.09 cecil win2008 1",
                "DENY 05/11 15:20 simulator 2.1 cecil win2008",
                "IN 05/11 15:22 analytics 2.09 cecil win2008 1",
                "SHUTDOWN 05/11 15:23",
            ]
        );
        // Denials register neither products nor users.
        assert_eq!(log.products, ["analytics"]);
    }

    #[test]
    fn test_isv_token_count_from_licenses_note() {
        let log = extract(
            "06/13 08:52 (isv) OUT: analytics v3.03 by bob@pc (14 licenses)",
            LogFormat::Isv,
        )
        .unwrap();
        match &log.events[0] {
            LogEvent::Out(e) => assert_eq!(e.count, 14),
            other => panic!("expected OUT, got {other:?}"),
        }
    }

    #[test]
    fn test_isv_in_details_are_removed() {
        let log = extract(
            "03/19 09:15 (isv) IN: (failed server back up) datavis v3.1 by cecil@winxp",
            LogFormat::Isv,
        )
        .unwrap();
        assert_eq!(
            event_lines(&log),
            ["IN 03/19 09:15 datavis 3.1 cecil winxp 1"]
        );
    }

    #[test]
    fn test_isv_unclosed_in_detail_is_rejected() {
        let err = extract(
            "03/19 08:00 (isv) Server started on macpro\n\
             03/19 09:15 (isv) IN: (odd datavis v3.1 by cecil@winxp",
            LogFormat::Isv,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Unexpected IN event details on line 2");
    }

    #[test]
    fn test_isv_deny_no_good_is_removed() {
        let log = extract(
            "03/18 19:19 (isv) DENIED: (1) no good analytics v3.03 to edgar@vaio",
            LogFormat::Isv,
        )
        .unwrap();
        assert_eq!(
            event_lines(&log),
            ["DENY 03/18 19:19 analytics 3.03 edgar vaio"]
        );
    }

    #[test]
    fn test_isv_version_without_v_is_rejected() {
        let err = extract(
            "05/11 15:17 (isv) OUT: analytics 2.09 by cecil@win2008",
            LogFormat::Isv,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid product version formatting on line 1"
        );
    }

    #[test]
    fn test_isv_user_without_host_is_missing_data() {
        let err = extract("05/11 15:17 (isv) OUT: analytics v2.09 by cecil", LogFormat::Isv)
            .unwrap_err();
        assert!(matches!(err, ParseError::MissingData { line: 1 }));
    }
}
