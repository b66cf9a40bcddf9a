use std::time::Duration;

use serde::Deserialize;

use crate::args::{OutputFormat, parse_duration_arg};
use crate::error::ValidationError;

/// On-disk configuration. Keys mirror the long CLI option names.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub external: Option<bool>,
    pub foreign_only: Option<bool>,
    pub resource_concurrency: Option<usize>,
    pub interval: Option<DurationValue>,
    pub count: Option<u64>,
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub redirect: Option<u32>,
    pub keepalive: Option<bool>,
    pub headers: Option<Vec<String>>,
    pub insecure: Option<bool>,
    pub num_datapoints: Option<usize>,
    pub output_format: Option<OutputFormat>,
    pub summary: Option<bool>,
    pub no_color: Option<bool>,
    pub verbose: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(0) => Err(ValidationError::DurationZero),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration_arg(text),
        }
    }
}
