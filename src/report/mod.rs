//! Turns ticks into output rows: aligned text columns with rolling
//! statistics, or one JSON object per sample.
mod format;
mod reporter;


pub use format::format_secs;
pub use reporter::{ReportOptions, Reporter};
