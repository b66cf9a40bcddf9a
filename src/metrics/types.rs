use std::time::Duration;

use chrono::{DateTime, Utc};
use url::Url;

use crate::error::ProbeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleStatus {
    /// A response was received; holds the final status code after redirects.
    Http(u16),
    Timeout,
    Error(String),
}

impl SampleStatus {
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, SampleStatus::Timeout | SampleStatus::Error(_))
    }

    #[must_use]
    pub fn label(&self) -> String {
        match self {
            SampleStatus::Http(code) => code.to_string(),
            SampleStatus::Timeout => "timeout".to_owned(),
            SampleStatus::Error(_) => "error".to_owned(),
        }
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            SampleStatus::Error(message) => Some(message),
            SampleStatus::Http(_) | SampleStatus::Timeout => None,
        }
    }
}

/// Wall-clock breakdown of one request. Phases that were never reached stay
/// `None`; `total` always covers start to completion or failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timing {
    pub resolve: Option<Duration>,
    pub connect: Option<Duration>,
    pub ttfb: Option<Duration>,
    pub total: Duration,
}

#[derive(Debug, Clone)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub url: Url,
    pub status: SampleStatus,
    pub timing: Timing,
    pub size: u64,
}

impl Sample {
    #[must_use]
    pub fn failed(timestamp: DateTime<Utc>, url: Url, error: &ProbeError, timing: Timing) -> Self {
        let status = if error.is_timeout() {
            SampleStatus::Timeout
        } else {
            SampleStatus::Error(error.to_string())
        };
        Self {
            timestamp,
            url,
            status,
            timing,
            size: 0,
        }
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        self.status.is_failure()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Image,
    Stylesheet,
    Script,
}

impl ResourceKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Stylesheet => "stylesheet",
            ResourceKind::Script => "script",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubResourceSample {
    pub parent: Url,
    pub kind: ResourceKind,
    pub sample: Sample,
}

/// Everything measured during one iteration of the polling loop.
#[derive(Debug, Clone)]
pub struct Tick {
    pub index: u64,
    pub page: Sample,
    pub resources: Vec<SubResourceSample>,
}
