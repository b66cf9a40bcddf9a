use clap::Parser;
use std::time::Duration;

use super::defaults::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_INTERVAL, DEFAULT_NUM_DATAPOINTS,
    DEFAULT_REDIRECT_LIMIT, DEFAULT_RESOURCE_CONCURRENCY, DEFAULT_TIMEOUT,
};
use super::parsers::{
    parse_duration_arg, parse_header, parse_positive_u64, parse_positive_usize,
};
use super::types::{OutputFormat, PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "httpstat",
    version,
    about = "Fetch a URL every interval and print one row of response-time statistics per fetch, like vmstat/iostat for HTTP.",
    after_help = "Examples:\n  httpstat http://example.com -c 1\n  httpstat http://example.com -i 2s\n  httpstat -e http://example.com -i 5s -c 10"
)]
pub struct MonitorArgs {
    /// Target URL (http:// is assumed when no scheme is given)
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Also fetch the page's images, stylesheets and scripts and report their times
    #[arg(long, short = 'e')]
    pub external: bool,

    /// With --external, only time resources hosted on a different host than the page
    #[arg(long = "foreign-only")]
    pub foreign_only: bool,

    /// Maximum number of sub-resource fetches in flight during one tick
    #[arg(
        long = "resource-concurrency",
        default_value = DEFAULT_RESOURCE_CONCURRENCY,
        value_parser = parse_positive_usize
    )]
    pub resource_concurrency: PositiveUsize,

    /// Polling interval (supports ms/s/m/h)
    #[arg(
        long,
        short = 'i',
        default_value = DEFAULT_INTERVAL,
        value_parser = parse_duration_arg
    )]
    pub interval: Duration,

    /// Stop after N ticks (runs until interrupted when omitted)
    #[arg(long, short = 'c', value_parser = parse_positive_u64)]
    pub count: Option<PositiveU64>,

    /// Request timeout (supports ms/s/m/h)
    #[arg(
        long = "timeout",
        default_value = DEFAULT_TIMEOUT,
        value_parser = parse_duration_arg
    )]
    pub request_timeout: Duration,

    /// Timeout for name resolution and the TCP connect probe (supports ms/s/m/h)
    #[arg(
        long = "connect-timeout",
        default_value = DEFAULT_CONNECT_TIMEOUT,
        value_parser = parse_duration_arg
    )]
    pub connect_timeout: Duration,

    /// Maximum redirects to follow (0 disables redirects)
    #[arg(long = "redirect", default_value = DEFAULT_REDIRECT_LIMIT)]
    pub redirect_limit: u32,

    /// Reuse connections between requests (connections are closed after every request otherwise)
    #[arg(long, short = 'k')]
    pub keepalive: bool,

    /// Extra HTTP headers in 'Key: Value' format (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Accept invalid TLS certificates and hostnames
    #[arg(long)]
    pub insecure: bool,

    /// Number of recent data points per URL used for min/max/avg/stddev
    #[arg(
        long = "num-datapoints",
        short = 'n',
        default_value = DEFAULT_NUM_DATAPOINTS,
        value_parser = parse_positive_usize
    )]
    pub num_datapoints: PositiveUsize,

    /// Row format for the sample stream
    #[arg(long = "output-format", value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    /// Print a per-URL summary (count, errors, percentiles) when the run ends
    #[arg(long)]
    pub summary: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Enable verbose logging (sets log level to debug unless overridden by HTTPSTAT_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Path to config file (TOML/JSON). Defaults to ./httpstat.toml or ./httpstat.json if present.
    #[arg(long)]
    pub config: Option<String>,
}
