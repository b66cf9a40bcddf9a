use std::collections::VecDeque;
use std::time::Duration;

/// Percentile labels reported in summaries.
const PERCENTILE_P50: u64 = 50;
const PERCENTILE_P90: u64 = 90;
const PERCENTILE_P99: u64 = 99;
const PERCENT_DIVISOR: u64 = 100;
/// Rounding offset for percentile selection.
const PERCENTILE_ROUNDING: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowStats {
    pub last: Duration,
    pub min: Duration,
    pub max: Duration,
    pub avg: Duration,
    /// Population standard deviation.
    pub stddev: Duration,
    pub len: usize,
}

/// Fixed-capacity window of recent total times. Pushing past capacity evicts
/// the oldest value.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    values_us: VecDeque<u64>,
}

impl RollingWindow {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            values_us: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, value: Duration) {
        if self.values_us.len() >= self.capacity {
            self.values_us.pop_front();
        }
        self.values_us.push_back(duration_to_us(value));
    }

    #[must_use]
    pub fn stats(&self) -> Option<WindowStats> {
        let last = *self.values_us.back()?;
        let count = u128::try_from(self.values_us.len()).ok()?;

        let mut min = u64::MAX;
        let mut max = 0u64;
        let mut sum: u128 = 0;
        for &value in &self.values_us {
            min = min.min(value);
            max = max.max(value);
            sum = sum.saturating_add(u128::from(value));
        }
        let avg = sum.checked_div(count).unwrap_or(0);

        let mut squares: u128 = 0;
        for &value in &self.values_us {
            let diff = u128::from(value).abs_diff(avg);
            squares = squares.saturating_add(diff.saturating_mul(diff));
        }
        let variance = squares.checked_div(count).unwrap_or(0);

        Some(WindowStats {
            last: Duration::from_micros(last),
            min: Duration::from_micros(min),
            max: Duration::from_micros(max),
            avg: Duration::from_micros(u64::try_from(avg).unwrap_or(u64::MAX)),
            stddev: Duration::from_micros(u64::try_from(variance.isqrt()).unwrap_or(u64::MAX)),
            len: self.values_us.len(),
        })
    }

    /// Returns (p50, p90, p99) over the values currently held.
    #[must_use]
    pub fn percentiles(&self) -> (Duration, Duration, Duration) {
        let mut sorted: Vec<u64> = self.values_us.iter().copied().collect();
        sorted.sort_unstable();
        (
            Duration::from_micros(percentile(&sorted, PERCENTILE_P50)),
            Duration::from_micros(percentile(&sorted, PERCENTILE_P90)),
            Duration::from_micros(percentile(&sorted, PERCENTILE_P99)),
        )
    }
}

fn percentile(values: &[u64], percentile: u64) -> u64 {
    if values.is_empty() {
        return 0;
    }
    let count = u64::try_from(values.len().saturating_sub(1)).unwrap_or(u64::MAX);
    let index = percentile
        .saturating_mul(count)
        .saturating_add(PERCENTILE_ROUNDING)
        .checked_div(PERCENT_DIVISOR)
        .unwrap_or(0);
    let idx = usize::try_from(index).unwrap_or_else(|_| values.len().saturating_sub(1));
    *values.get(idx).unwrap_or(&0)
}

fn duration_to_us(value: Duration) -> u64 {
    u64::try_from(value.as_micros()).unwrap_or(u64::MAX)
}
