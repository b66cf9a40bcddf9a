use futures_util::{StreamExt, stream};
use reqwest::Client;
use tokio::time::{MissedTickBehavior, interval};
use tracing::debug;
use url::Url;

use super::client::{build_client, normalize_target};
use super::fetch::fetch;
use super::settings::ProbeSettings;
use crate::args::MonitorArgs;
use crate::error::AppResult;
use crate::extract::scan_resources;
use crate::metrics::{SubResourceSample, Tick};
use crate::shutdown::ShutdownSender;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The configured tick count was reached.
    Completed { ticks: u64 },
    /// A shutdown was broadcast; an in-flight tick, if any, was dropped.
    Interrupted { ticks: u64 },
}

/// Polls one target URL. Each tick runs to completion before the next one
/// is scheduled.
#[derive(Debug)]
pub struct Sampler {
    client: Client,
    target: Url,
    settings: ProbeSettings,
}

impl Sampler {
    /// Builds a sampler from CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is missing or invalid, or the HTTP
    /// client cannot be built.
    pub fn new(args: &MonitorArgs) -> AppResult<Self> {
        let target = normalize_target(args.url.as_deref().unwrap_or_default())?;
        let client = build_client(args)?;
        Ok(Self::from_parts(client, target, ProbeSettings::from_args(args)))
    }

    #[must_use]
    pub const fn from_parts(client: Client, target: Url, settings: ProbeSettings) -> Self {
        Self {
            client,
            target,
            settings,
        }
    }

    #[must_use]
    pub const fn target(&self) -> &Url {
        &self.target
    }

    /// Fetches the page once and, with external resources enabled, every
    /// distinct resource it references.
    pub async fn tick(&self, index: u64) -> Tick {
        let fetched = fetch(
            &self.client,
            &self.target,
            self.settings.connect_timeout,
            self.settings.external,
        )
        .await;

        let resources = match fetched.page.as_ref() {
            Some(page) if self.settings.external => {
                self.fetch_resources(&page.html, &page.final_url).await
            }
            Some(_) | None => Vec::new(),
        };

        Tick {
            index,
            page: fetched.sample,
            resources,
        }
    }

    async fn fetch_resources(&self, html: &str, page_url: &Url) -> Vec<SubResourceSample> {
        let client = &self.client;
        let parent = &self.target;
        let connect_timeout = self.settings.connect_timeout;

        let resources: Vec<SubResourceSample> =
            stream::iter(scan_resources(html, page_url, self.settings.foreign_only))
                .map(|resource| async move {
                    let fetched = fetch(client, &resource.url, connect_timeout, false).await;
                    SubResourceSample {
                        parent: parent.clone(),
                        kind: resource.kind,
                        sample: fetched.sample,
                    }
                })
                .buffer_unordered(self.settings.resource_concurrency.get())
                .collect()
                .await;

        debug!("{} sub-resources fetched for {}", resources.len(), page_url);
        resources
    }

    /// Runs ticks on the configured interval, handing each finished tick to
    /// `on_tick`, until the tick count is reached or a shutdown is broadcast.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `on_tick`.
    pub async fn run<F>(&self, shutdown_tx: &ShutdownSender, mut on_tick: F) -> AppResult<RunOutcome>
    where
        F: FnMut(&Tick) -> AppResult<()>,
    {
        let mut shutdown_rx = shutdown_tx.subscribe();
        let mut ticker = interval(self.settings.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut ticks: u64 = 0;
        loop {
            if let Some(count) = self.settings.count
                && ticks >= count.get()
            {
                return Ok(RunOutcome::Completed { ticks });
            }

            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => return Ok(RunOutcome::Interrupted { ticks }),
                _ = ticker.tick() => {}
            }

            let tick = tokio::select! {
                biased;
                _ = shutdown_rx.recv() => return Ok(RunOutcome::Interrupted { ticks }),
                tick = self.tick(ticks) => tick,
            };

            on_tick(&tick)?;
            ticks = ticks.saturating_add(1);
        }
    }
}
