// RLM Log Reader - core/duration.rs
//
// Checkout durations for report logs.
//
// Each OUT is closed by the first later IN carrying the same handle, or by
// the first later SHUTDOWN, whichever comes first. Checkouts never closed
// run until the last timed event in the log.

use crate::core::model::{DurationReport, EventLog, LicenseEvent, LogEvent, Stamp, UsageSession};
use crate::core::time::parse_timestamp;
use crate::util::error::AnalysisError;
use chrono::TimeDelta;

/// The event that ends the checkout at `out_idx`, if any.
fn closing_stamp<'a>(
    events: &'a [LogEvent],
    out_idx: usize,
    out: &LicenseEvent,
) -> Option<&'a Stamp> {
    events[out_idx + 1..].iter().find_map(|event| match event {
        LogEvent::In(checkin) if checkin.handle == out.handle => Some(&checkin.stamp),
        LogEvent::Shutdown(stamp) => Some(stamp),
        _ => None,
    })
}

fn position(name: &str, names: &[String]) -> Result<usize, AnalysisError> {
    names
        .iter()
        .position(|n| n == name)
        .ok_or_else(|| AnalysisError::UnknownName {
            name: name.to_string(),
        })
}

/// Compute per-checkout sessions and per-user, per-product totals.
pub fn usage_durations(log: &EventLog) -> Result<DurationReport, AnalysisError> {
    let mut totals = vec![vec![TimeDelta::zero(); log.products.len()]; log.users.len()];
    let mut sessions = Vec::new();

    let log_end = log
        .last_timed
        .and_then(|idx| log.events.get(idx))
        .and_then(LogEvent::stamp);

    for (idx, event) in log.events.iter().enumerate() {
        let LogEvent::Out(out) = event else {
            continue;
        };

        let checkin = closing_stamp(&log.events, idx, out);
        let Some(end) = checkin.or(log_end) else {
            continue;
        };

        let start = parse_timestamp(&out.stamp.date, &out.stamp.time)?;
        let finish = parse_timestamp(&end.date, &end.time)?;
        let duration = finish - start;

        let user = position(&out.user, &log.users)?;
        let product = position(&out.product, &log.products)?;
        totals[user][product] += duration;

        sessions.push(UsageSession {
            checkout: out.stamp.clone(),
            checkin: checkin.cloned(),
            product: out.product.clone(),
            version: out.version.clone(),
            user: out.user.clone(),
            duration,
        });
    }

    tracing::debug!(sessions = sessions.len(), "Usage durations computed");

    Ok(DurationReport {
        sessions,
        users: log.users.clone(),
        products: log.products.clone(),
        totals,
    })
}
