use std::time::Duration;

use thiserror::Error;

/// Failure of a single timed request. Never fatal: the sampler turns it into
/// a failed sample and keeps going.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("timed out after {}ms", .after.as_millis())]
    Timeout { after: Duration },
    #[error("failed to resolve {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: std::io::Error,
    },
    #[error("no addresses resolved for {host}")]
    NoAddresses { host: String },
    #[error("connect to {addr} failed: {source}")]
    Connect {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("request failed: {source}")]
    Request {
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to read response body: {source}")]
    Body {
        #[source]
        source: reqwest::Error,
    },
}

impl ProbeError {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Request { source } | Self::Body { source } => source.is_timeout(),
            Self::Resolve { .. } | Self::NoAddresses { .. } | Self::Connect { .. } => false,
        }
    }
}
