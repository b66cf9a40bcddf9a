use std::collections::HashMap;
use std::time::Duration;

use super::types::Sample;
use super::window::{RollingWindow, WindowStats};

#[derive(Debug)]
struct TargetStats {
    window: RollingWindow,
    samples: u64,
    errors: u64,
}

/// Per-URL statistics, kept in first-seen order.
#[derive(Debug)]
pub struct StatsBook {
    capacity: usize,
    order: Vec<String>,
    targets: HashMap<String, TargetStats>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSummary {
    pub url: String,
    pub samples: u64,
    pub errors: u64,
    pub window: Option<WindowStats>,
    pub p50: Duration,
    pub p90: Duration,
    pub p99: Duration,
}

impl StatsBook {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            order: Vec::new(),
            targets: HashMap::new(),
        }
    }

    /// Records a sample and returns the window statistics for its URL.
    /// Failed samples count as errors and leave the window untouched.
    pub fn record(&mut self, sample: &Sample) -> Option<WindowStats> {
        let key = sample.url.as_str();
        if !self.targets.contains_key(key) {
            self.order.push(key.to_owned());
        }
        let capacity = self.capacity;
        let target = self
            .targets
            .entry(key.to_owned())
            .or_insert_with(|| TargetStats {
                window: RollingWindow::new(capacity),
                samples: 0,
                errors: 0,
            });

        target.samples = target.samples.saturating_add(1);
        if sample.is_failure() {
            target.errors = target.errors.saturating_add(1);
        } else {
            target.window.push(sample.timing.total);
        }
        target.window.stats()
    }

    #[must_use]
    pub fn summaries(&self) -> Vec<TargetSummary> {
        self.order
            .iter()
            .filter_map(|url| {
                let target = self.targets.get(url)?;
                let (p50, p90, p99) = target.window.percentiles();
                Some(TargetSummary {
                    url: url.clone(),
                    samples: target.samples,
                    errors: target.errors,
                    window: target.window.stats(),
                    p50,
                    p90,
                    p99,
                })
            })
            .collect()
    }
}
