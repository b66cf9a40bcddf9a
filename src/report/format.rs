use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use crossterm::style::Stylize;

use crate::metrics::{ResourceKind, SampleStatus, WindowStats};

/// Sub-second digits kept when printing seconds.
const SUBSEC_DIVISOR: u32 = 100;
const MISSING: &str = "-";

pub(super) const TIME_WIDTH: usize = 8;
pub(super) const STATUS_WIDTH: usize = 7;
pub(super) const SECS_WIDTH: usize = 8;
pub(super) const SIZE_WIDTH: usize = 9;

/// Formats a duration as seconds with four decimals, e.g. `0.0421`.
#[must_use]
pub fn format_secs(value: Duration) -> String {
    let tenths_of_ms = value
        .subsec_micros()
        .checked_div(SUBSEC_DIVISOR)
        .unwrap_or(0);
    format!("{}.{:04}", value.as_secs(), tenths_of_ms)
}

pub(super) fn format_opt_secs(value: Option<Duration>) -> String {
    value.map_or_else(|| MISSING.to_owned(), format_secs)
}

pub(super) fn format_clock(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M:%S").to_string()
}

pub(super) fn header_line() -> String {
    format!(
        "{:<tw$} {:>sw$} {:>w$} {:>w$} {:>w$} {:>zw$} {:>w$} {:>w$} {:>w$} {:>w$} url",
        "time",
        "status",
        "last",
        "connect",
        "ttfb",
        "size",
        "min",
        "max",
        "avg",
        "stddev",
        tw = TIME_WIDTH,
        sw = STATUS_WIDTH,
        w = SECS_WIDTH,
        zw = SIZE_WIDTH,
    )
}

/// Window columns (`min max avg stddev`), dashes while the window is empty.
pub(super) fn window_cells(stats: Option<&WindowStats>) -> String {
    let cells = stats.map_or_else(
        || [MISSING.to_owned(), MISSING.to_owned(), MISSING.to_owned(), MISSING.to_owned()],
        |stats| {
            [
                format_secs(stats.min),
                format_secs(stats.max),
                format_secs(stats.avg),
                format_secs(stats.stddev),
            ]
        },
    );
    let [min, max, avg, stddev] = cells;
    format!(
        "{:>w$} {:>w$} {:>w$} {:>w$}",
        min,
        max,
        avg,
        stddev,
        w = SECS_WIDTH
    )
}

/// Pads the status label, then colours it: failures red, responses outside
/// 2xx/3xx yellow.
pub(super) fn status_cell(status: &SampleStatus, color: bool) -> String {
    let padded = format!("{:>w$}", status.label(), w = STATUS_WIDTH);
    if !color {
        return padded;
    }
    match status {
        SampleStatus::Timeout | SampleStatus::Error(_) => padded.red().to_string(),
        SampleStatus::Http(code) if !(200..400).contains(code) => padded.yellow().to_string(),
        SampleStatus::Http(_) => padded,
    }
}

pub(super) fn target_cell(url: &str, kind: Option<ResourceKind>) -> String {
    match kind {
        Some(kind) => format!("+ {} {}", kind.as_str(), url),
        None => url.to_owned(),
    }
}
