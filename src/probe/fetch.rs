use std::net::SocketAddr;
use std::time::Duration;

use chrono::Utc;
use futures_util::StreamExt;
use reqwest::{Client, header::CONTENT_TYPE};
use tokio::net::{TcpStream, lookup_host};
use tokio::time::{Instant, timeout};
use tracing::{debug, warn};
use url::{Host, Url};

use super::settings::MAX_SCAN_BYTES;
use crate::error::ProbeError;
use crate::extract::is_html;
use crate::metrics::{Sample, SampleStatus, Timing};

/// Result of one timed fetch. `page` carries the final URL and the body text
/// when the caller asked for HTML and the response was a successful HTML page.
#[derive(Debug)]
pub(super) struct Fetched {
    pub(super) sample: Sample,
    pub(super) page: Option<PageBody>,
}

#[derive(Debug)]
pub(super) struct PageBody {
    pub(super) final_url: Url,
    pub(super) html: String,
}

struct Response {
    status: u16,
    size: u64,
    page: Option<PageBody>,
}

/// Measures resolve, connect, time-to-first-byte and total time for a GET of
/// `url`. Never fails: errors become a failed sample.
pub(super) async fn fetch(
    client: &Client,
    url: &Url,
    connect_timeout: Duration,
    capture_html: bool,
) -> Fetched {
    let timestamp = Utc::now();
    let started = Instant::now();
    let mut timing = Timing::default();

    let result = match probe_connection(url, connect_timeout, &mut timing).await {
        Ok(()) => timed_get(client, url, capture_html, &mut timing).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(response) => Fetched {
            sample: Sample {
                timestamp,
                url: url.clone(),
                status: SampleStatus::Http(response.status),
                timing,
                size: response.size,
            },
            page: response.page,
        },
        Err(err) => {
            if timing.total.is_zero() {
                timing.total = started.elapsed();
            }
            warn!("{}: {}", url, err);
            Fetched {
                sample: Sample::failed(timestamp, url.clone(), &err, timing),
                page: None,
            }
        }
    }
}

/// Resolves the host, then opens (and drops) a TCP connection to the first
/// resolved address that accepts. Only a resolve failure is an error: when
/// no address accepts, `connect` stays `None` and the GET still runs.
async fn probe_connection(
    url: &Url,
    connect_timeout: Duration,
    timing: &mut Timing,
) -> Result<(), ProbeError> {
    let port = url.port_or_known_default().unwrap_or(80);

    let started = Instant::now();
    let addrs = resolve(url, port, connect_timeout).await?;
    timing.resolve = Some(started.elapsed());

    if addrs.is_empty() {
        return Err(ProbeError::NoAddresses {
            host: url.host_str().unwrap_or_default().to_owned(),
        });
    }

    match connect_any(&addrs, connect_timeout).await {
        Ok((addr, elapsed)) => {
            timing.connect = Some(elapsed);
            debug!("{} connected to {} in {:?}", url, addr, elapsed);
        }
        Err(err) => debug!("{}: connect probe failed: {}", url, err),
    }
    Ok(())
}

/// Tries `addrs` in order under one overall `connect_timeout`. Returns the
/// first address that accepted and how long that attempt took, or the last
/// failure.
pub(super) async fn connect_any(
    addrs: &[SocketAddr],
    connect_timeout: Duration,
) -> Result<(SocketAddr, Duration), ProbeError> {
    let deadline = Instant::now().checked_add(connect_timeout);
    let mut last_error = ProbeError::NoAddresses {
        host: String::new(),
    };

    for &addr in addrs {
        let remaining = deadline.map_or(connect_timeout, |deadline| {
            deadline.saturating_duration_since(Instant::now())
        });
        let started = Instant::now();
        match timeout(remaining, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                let elapsed = started.elapsed();
                drop(stream);
                return Ok((addr, elapsed));
            }
            Ok(Err(err)) => {
                debug!("connect to {} failed: {}", addr, err);
                last_error = ProbeError::Connect { addr, source: err };
            }
            Err(_elapsed) => {
                return Err(ProbeError::Timeout {
                    after: connect_timeout,
                });
            }
        }
    }
    Err(last_error)
}

async fn resolve(
    url: &Url,
    port: u16,
    connect_timeout: Duration,
) -> Result<Vec<SocketAddr>, ProbeError> {
    match url.host() {
        Some(Host::Ipv4(ip)) => Ok(vec![SocketAddr::from((ip, port))]),
        Some(Host::Ipv6(ip)) => Ok(vec![SocketAddr::from((ip, port))]),
        Some(Host::Domain(domain)) => {
            let addrs = timeout(connect_timeout, lookup_host((domain, port)))
                .await
                .map_err(|_elapsed| ProbeError::Timeout {
                    after: connect_timeout,
                })?
                .map_err(|err| ProbeError::Resolve {
                    host: domain.to_owned(),
                    source: err,
                })?;
            Ok(addrs.collect())
        }
        None => Err(ProbeError::NoAddresses {
            host: String::new(),
        }),
    }
}

async fn timed_get(
    client: &Client,
    url: &Url,
    capture_html: bool,
    timing: &mut Timing,
) -> Result<Response, ProbeError> {
    let sent = Instant::now();
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|err| {
            timing.total = sent.elapsed();
            ProbeError::Request { source: err }
        })?;
    timing.ttfb = Some(sent.elapsed());

    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let capture = capture_html && status.is_success() && is_html(content_type);
    let final_url = response.url().clone();

    let mut body = Vec::new();
    let mut size: u64 = 0;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let bytes = chunk.map_err(|err| {
            timing.total = sent.elapsed();
            ProbeError::Body { source: err }
        })?;
        size = size.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
        if capture && body.len() < MAX_SCAN_BYTES {
            let room = MAX_SCAN_BYTES.saturating_sub(body.len());
            body.extend_from_slice(bytes.get(..room.min(bytes.len())).unwrap_or_default());
        }
    }
    timing.total = sent.elapsed();

    let page = capture.then(|| PageBody {
        final_url,
        html: String::from_utf8_lossy(&body).into_owned(),
    });

    Ok(Response {
        status: status.as_u16(),
        size,
        page,
    })
}
