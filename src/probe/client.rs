use std::time::Duration;

use reqwest::{
    Client,
    header::{HeaderMap, HeaderName, HeaderValue},
    redirect,
};
use tracing::error;
use url::Url;

use crate::args::{DEFAULT_USER_AGENT, MonitorArgs};
use crate::error::{AppError, AppResult, HttpError};

/// Parses the target URL, assuming `http://` when no scheme is given.
///
/// # Errors
///
/// Returns an error when the URL is unparseable, not http(s), or has no host.
pub fn normalize_target(raw: &str) -> AppResult<Url> {
    let trimmed = raw.trim();
    let candidate = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("http://{}", trimmed)
    };
    let url = Url::parse(&candidate).map_err(|err| {
        AppError::http(HttpError::InvalidUrl {
            url: raw.to_owned(),
            source: err,
        })
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::http(HttpError::UnsupportedScheme {
            scheme: url.scheme().to_owned(),
        }));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(AppError::http(HttpError::MissingHost {
            url: raw.to_owned(),
        }));
    }
    Ok(url)
}

/// Builds the HTTP client used for every fetch.
///
/// # Errors
///
/// Returns an error when a header is invalid or the client cannot be built.
pub fn build_client(args: &MonitorArgs) -> AppResult<Client> {
    let mut client_builder = Client::builder()
        .timeout(args.request_timeout)
        .connect_timeout(args.connect_timeout)
        .user_agent(DEFAULT_USER_AGENT)
        .default_headers(build_headers(&args.headers)?);

    if args.redirect_limit == 0 {
        client_builder = client_builder.redirect(redirect::Policy::none());
    } else {
        client_builder = client_builder.redirect(redirect::Policy::limited(
            usize::try_from(args.redirect_limit).unwrap_or(10),
        ));
    }

    if !args.keepalive {
        client_builder = client_builder
            .pool_max_idle_per_host(0)
            .pool_idle_timeout(Some(Duration::from_secs(0)));
    }

    if args.insecure {
        client_builder = client_builder
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true);
    }

    match client_builder.build() {
        Ok(client) => Ok(client),
        Err(err) => {
            error!("Failed to build HTTP client: {}", err);
            Err(AppError::http(HttpError::BuildClientFailed { source: err }))
        }
    }
}

fn build_headers(headers: &[(String, String)]) -> AppResult<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|err| {
            AppError::http(HttpError::InvalidHeaderName {
                header: key.clone(),
                source: err,
            })
        })?;
        let val = HeaderValue::from_str(value).map_err(|err| {
            AppError::http(HttpError::InvalidHeaderValue {
                header: key.clone(),
                source: err,
            })
        })?;
        map.append(name, val);
    }
    Ok(map)
}
