//! Sample types and the in-memory rolling statistics kept per URL.
mod stats;
mod types;
mod window;


pub use stats::{StatsBook, TargetSummary};
pub use types::{ResourceKind, Sample, SampleStatus, SubResourceSample, Tick, Timing};
pub use window::{RollingWindow, WindowStats};
