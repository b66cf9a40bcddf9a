use std::time::Duration;

use crate::args::{MonitorArgs, PositiveU64, PositiveUsize};

/// Upper bound on how much of a page body is kept for resource scanning.
/// The body is still drained completely for timing and size.
pub(super) const MAX_SCAN_BYTES: usize = 8 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub interval: Duration,
    pub count: Option<PositiveU64>,
    pub connect_timeout: Duration,
    pub external: bool,
    pub foreign_only: bool,
    pub resource_concurrency: PositiveUsize,
}

impl ProbeSettings {
    #[must_use]
    pub fn from_args(args: &MonitorArgs) -> Self {
        Self {
            interval: args.interval,
            count: args.count,
            connect_timeout: args.connect_timeout,
            external: args.external,
            foreign_only: args.foreign_only,
            resource_concurrency: args.resource_concurrency,
        }
    }
}
