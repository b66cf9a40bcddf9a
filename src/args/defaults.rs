pub(crate) const DEFAULT_USER_AGENT: &str = concat!("httpstat/", env!("CARGO_PKG_VERSION"));

/// Config files picked up from the working directory when `--config` is absent.
pub(crate) const DEFAULT_CONFIG_FILES: [&str; 2] = ["httpstat.toml", "httpstat.json"];

pub(super) const DEFAULT_INTERVAL: &str = "1s";
pub(super) const DEFAULT_TIMEOUT: &str = "5s";
pub(super) const DEFAULT_CONNECT_TIMEOUT: &str = "5s";
pub(super) const DEFAULT_REDIRECT_LIMIT: &str = "10";
pub(super) const DEFAULT_NUM_DATAPOINTS: &str = "500";
pub(super) const DEFAULT_RESOURCE_CONCURRENCY: &str = "4";
