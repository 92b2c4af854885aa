// RLM Log Reader - core/usage.rs
//
// Concurrent license usage over time.
//
// One sample is taken after every OUT, IN, and SHUTDOWN. Report logs state
// the in-use count directly on each event; ISV logs only give the number of
// tokens moved, so the running count is accumulated here.

use crate::core::model::{
    EventLog, LicenseEvent, LogEvent, LogFormat, ProductUsage, Stamp, UsageOverTime, UsageSample,
};
use crate::util::error::AnalysisError;

fn index_of(name: &str, names: &[String]) -> Result<usize, AnalysisError> {
    names
        .iter()
        .position(|n| n == name)
        .ok_or_else(|| AnalysisError::UnknownName {
            name: name.to_string(),
        })
}

/// Running counters while walking the event list.
struct UsageTracker {
    format: LogFormat,
    in_use: Vec<u64>,
    unique: Vec<u64>,
    totals: Vec<Option<u64>>,
    /// Checkouts held, `[user][product]`.
    held: Vec<Vec<u64>>,
    samples: Vec<UsageSample>,
}

impl UsageTracker {
    fn new(format: LogFormat, products: usize, users: usize) -> Self {
        Self {
            format,
            in_use: vec![0; products],
            unique: vec![0; products],
            totals: vec![None; products],
            held: vec![vec![0; products]; users],
            samples: Vec::new(),
        }
    }

    fn sample(&mut self, stamp: &Stamp) {
        let products = (0..self.in_use.len())
            .map(|p| ProductUsage {
                in_use: self.in_use[p],
                unique_users: self.unique[p],
                total: self.totals[p],
            })
            .collect();
        self.samples.push(UsageSample {
            stamp: stamp.clone(),
            products,
        });
    }

    fn checkout(&mut self, event: &LicenseEvent, product: usize, user: usize) {
        match self.format {
            LogFormat::Report => self.in_use[product] = event.count,
            LogFormat::Isv => {
                self.in_use[product] = self.in_use[product].saturating_add(event.count)
            }
        }

        let held = &mut self.held[user][product];
        *held += 1;
        if *held == 1 {
            self.unique[product] += 1;
        }

        self.sample(&event.stamp);
    }

    fn checkin(&mut self, event: &LicenseEvent, product: usize, user: usize) {
        match self.format {
            LogFormat::Report => self.in_use[product] = event.count,
            LogFormat::Isv => {
                self.in_use[product] = self.in_use[product].saturating_sub(event.count)
            }
        }

        // A log that starts with licenses already out has check-ins with no
        // matching checkout.
        let held = &mut self.held[user][product];
        if *held > 0 {
            *held -= 1;
        }
        if *held == 0 && self.unique[product] > 0 {
            self.unique[product] -= 1;
        }

        if self.in_use[product] > 0 && self.unique[product] == 0 {
            // Licenses are out but their holders are unknown: report at
            // least one user, then drop back so a later OUT is not counted
            // twice.
            self.unique[product] = 1;
            self.sample(&event.stamp);
            self.unique[product] = 0;
        } else {
            self.sample(&event.stamp);
        }
    }

    fn shutdown(&mut self, stamp: &Stamp) {
        self.in_use.fill(0);
        self.unique.fill(0);
        for row in &mut self.held {
            row.fill(0);
        }
        self.sample(stamp);
    }
}

/// Build the concurrent usage table for an extracted log.
///
/// Pool sizes from PRODUCT lines are only reported for report logs.
pub fn concurrent_usage(log: &EventLog, format: LogFormat) -> Result<UsageOverTime, AnalysisError> {
    let mut tracker = UsageTracker::new(format, log.products.len(), log.users.len());

    for event in &log.events {
        match event {
            LogEvent::Out(e) => {
                let product = index_of(&e.product, &log.products)?;
                let user = index_of(&e.user, &log.users)?;
                tracker.checkout(e, product, user);
            }
            LogEvent::In(e) => {
                let product = index_of(&e.product, &log.products)?;
                let user = index_of(&e.user, &log.users)?;
                tracker.checkin(e, product, user);
            }
            LogEvent::Shutdown(stamp) => tracker.shutdown(stamp),
            LogEvent::Product(pool) if format == LogFormat::Report => {
                let product = index_of(&pool.product, &log.products)?;
                tracker.totals[product] = Some(pool.count);
            }
            _ => {}
        }
    }

    tracing::debug!(samples = tracker.samples.len(), "Concurrent usage computed");

    Ok(UsageOverTime {
        products: log.products.clone(),
        include_totals: format == LogFormat::Report,
        samples: tracker.samples,
    })
}
