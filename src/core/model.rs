// RLM Log Reader - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::TimeDelta;

// =============================================================================
// Log format
// =============================================================================

/// The two RLM log flavours that carry license usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogFormat {
    /// The server's report log (`RLM Report Log Format ...` header).
    /// Carries years, server-side counts, checkout handles, and pool sizes.
    Report,

    /// An ISV server's debug log (`MM/DD HH:MM (isv) ...` lines).
    /// No years, no handles; token counts are inferred per event.
    Isv,
}

impl LogFormat {
    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            LogFormat::Report => "RLM report log",
            LogFormat::Isv => "ISV log",
        }
    }

    /// Report logs carry enough data for duration and pool-size tables.
    pub fn has_durations(&self) -> bool {
        matches!(self, LogFormat::Report)
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Events
// =============================================================================

/// Date and time columns exactly as they appear in the event output.
/// Report-log dates have the year appended during extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    pub date: String,
    pub time: String,
}

impl Stamp {
    pub fn new(date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
        }
    }
}

impl std::fmt::Display for Stamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.date, self.time)
    }
}

/// A license checkout (OUT) or check-in (IN).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseEvent {
    pub stamp: Stamp,
    pub product: String,
    pub version: String,
    pub user: String,
    pub host: String,
    /// Report logs: licenses in use after this event.
    /// ISV logs: licenses taken or returned by this event.
    pub count: u64,
    /// Server handle pairing an OUT with its IN (report logs only).
    pub handle: Option<String>,
}

/// A denied checkout request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub stamp: Stamp,
    pub product: String,
    pub version: String,
    pub user: String,
    pub host: String,
    /// Requested count (report logs only).
    pub count: Option<u64>,
}

/// A server start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerStart {
    pub stamp: Stamp,
    pub server: String,
}

/// A license pool declaration (report logs only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPool {
    pub product: String,
    pub version: String,
    pub count: u64,
}

/// One extracted event, in log order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    Out(LicenseEvent),
    In(LicenseEvent),
    Deny(Denial),
    Start(ServerStart),
    Shutdown(Stamp),
    Product(ProductPool),
}

impl LogEvent {
    /// Keyword used for this event in the event-data output.
    pub fn keyword(&self) -> &'static str {
        match self {
            LogEvent::Out(_) => "OUT",
            LogEvent::In(_) => "IN",
            LogEvent::Deny(_) => "DENY",
            LogEvent::Start(_) => "START",
            LogEvent::Shutdown(_) => "SHUTDOWN",
            LogEvent::Product(_) => "PRODUCT",
        }
    }

    /// Date and time of the event. PRODUCT lines carry none.
    pub fn stamp(&self) -> Option<&Stamp> {
        match self {
            LogEvent::Out(e) | LogEvent::In(e) => Some(&e.stamp),
            LogEvent::Deny(d) => Some(&d.stamp),
            LogEvent::Start(s) => Some(&s.stamp),
            LogEvent::Shutdown(stamp) => Some(stamp),
            LogEvent::Product(_) => None,
        }
    }

    /// Columns written for this event, keyword first.
    pub fn fields(&self) -> Vec<String> {
        let mut fields = vec![self.keyword().to_string()];
        match self {
            LogEvent::Out(e) | LogEvent::In(e) => {
                fields.extend([
                    e.stamp.date.clone(),
                    e.stamp.time.clone(),
                    e.product.clone(),
                    e.version.clone(),
                    e.user.clone(),
                    e.host.clone(),
                    e.count.to_string(),
                ]);
                fields.extend(e.handle.clone());
            }
            LogEvent::Deny(d) => {
                fields.extend([
                    d.stamp.date.clone(),
                    d.stamp.time.clone(),
                    d.product.clone(),
                    d.version.clone(),
                    d.user.clone(),
                    d.host.clone(),
                ]);
                fields.extend(d.count.map(|c| c.to_string()));
            }
            LogEvent::Start(s) => {
                fields.extend([s.stamp.date.clone(), s.stamp.time.clone(), s.server.clone()]);
            }
            LogEvent::Shutdown(stamp) => {
                fields.extend([stamp.date.clone(), stamp.time.clone()]);
            }
            LogEvent::Product(p) => {
                fields.extend([p.product.clone(), p.version.clone(), p.count.to_string()]);
            }
        }
        fields
    }
}

/// Everything extracted from one log file.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    /// Events in log order.
    pub events: Vec<LogEvent>,

    /// Products in first-seen order (OUT, IN, and PRODUCT events).
    pub products: Vec<String>,

    /// Users in first-seen order (OUT and IN events).
    pub users: Vec<String>,

    /// Server named by the most recent START.
    pub server_name: Option<String>,

    /// Index into `events` of the last event carrying a time. Used as the
    /// end time of checkouts that are never returned.
    pub last_timed: Option<usize>,
}

impl EventLog {
    pub fn starts(&self) -> impl Iterator<Item = &ServerStart> {
        self.events.iter().filter_map(|e| match e {
            LogEvent::Start(s) => Some(s),
            _ => None,
        })
    }

    pub fn shutdowns(&self) -> impl Iterator<Item = &Stamp> {
        self.events.iter().filter_map(|e| match e {
            LogEvent::Shutdown(s) => Some(s),
            _ => None,
        })
    }

    pub fn denials(&self) -> impl Iterator<Item = &Denial> {
        self.events.iter().filter_map(|e| match e {
            LogEvent::Deny(d) => Some(d),
            _ => None,
        })
    }
}

// =============================================================================
// Usage over time
// =============================================================================

/// Per-product counters at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProductUsage {
    pub in_use: u64,
    pub unique_users: u64,
    /// Pool size from the latest PRODUCT line (report logs only).
    pub total: Option<u64>,
}

/// Usage of every product after one OUT, IN, or SHUTDOWN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageSample {
    pub stamp: Stamp,
    /// Indexed like `UsageOverTime::products`.
    pub products: Vec<ProductUsage>,
}

/// Concurrent usage table.
#[derive(Debug, Clone, Default)]
pub struct UsageOverTime {
    pub products: Vec<String>,
    pub include_totals: bool,
    pub samples: Vec<UsageSample>,
}

impl UsageOverTime {
    /// CSV header row.
    pub fn header(&self) -> Vec<String> {
        let mut header = vec!["Date/Time".to_string()];
        for product in &self.products {
            header.push(format!("{product} Licenses in use"));
            header.push(format!("{product} Unique user count"));
            if self.include_totals {
                header.push(format!("{product} Total licenses"));
            }
        }
        header
    }

    /// CSV data rows.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.samples
            .iter()
            .map(|sample| {
                let mut row = vec![sample.stamp.to_string()];
                for usage in &sample.products {
                    row.push(usage.in_use.to_string());
                    row.push(usage.unique_users.to_string());
                    if self.include_totals {
                        row.push(usage.total.unwrap_or(0).to_string());
                    }
                }
                row
            })
            .collect()
    }
}

// =============================================================================
// Usage duration
// =============================================================================

/// One checkout and how long it was held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageSession {
    pub checkout: Stamp,
    /// `None` when the license was still out at the end of the log.
    pub checkin: Option<Stamp>,
    pub product: String,
    pub version: String,
    pub user: String,
    pub duration: TimeDelta,
}

/// Per-checkout sessions plus totals by user and product.
#[derive(Debug, Clone, Default)]
pub struct DurationReport {
    pub sessions: Vec<UsageSession>,
    pub users: Vec<String>,
    pub products: Vec<String>,
    /// `totals[user][product]`, indexed like `users` and `products`.
    pub totals: Vec<Vec<TimeDelta>>,
}
