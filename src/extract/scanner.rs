use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::{CaptureMatches, Regex};
use tracing::{debug, error};
use url::Url;

use super::attrs::Attributes;
use crate::metrics::ResourceKind;

/// Comments and script bodies are consumed whole so markup-looking text
/// inside them is never reported. Tag bodies skip over quoted values, which
/// may contain `>`.
const TAG_SOURCE: &str = concat!(
    r"(?is)<!--.*?(?:-->|\z)",
    r#"|<script\b(?P<script>(?:"[^"]*"|'[^']*'|[^'">])*)>.*?(?:</script\s*>|\z)"#,
    r#"|<(?P<tag>img|link|base)\b(?P<attrs>(?:"[^"]*"|'[^']*'|[^'">])*)>"#,
);

static TAG_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| compile(TAG_SOURCE));

pub(super) fn compile(source: &str) -> Option<Regex> {
    match Regex::new(source) {
        Ok(regex) => Some(regex),
        Err(err) => {
            error!("Invalid HTML scan pattern: {}", err);
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub url: Url,
}

/// Lazy iterator over the distinct sub-resources of one HTML document, in
/// document order. Built from a single response body; it cannot be reused
/// for another tick.
pub struct ResourceScanner<'html> {
    tags: Option<CaptureMatches<'static, 'html>>,
    base: Url,
    base_overridden: bool,
    page_host: Option<String>,
    foreign_only: bool,
    seen: HashSet<Url>,
}

/// Scans `html` for `<img src>`, `<script src>` and
/// `<link rel="stylesheet" href>` references, resolved against `page_url`
/// (or the document's first `<base href>`).
#[must_use]
pub fn scan_resources<'html>(
    html: &'html str,
    page_url: &Url,
    foreign_only: bool,
) -> ResourceScanner<'html> {
    ResourceScanner {
        tags: Lazy::force(&TAG_PATTERN)
            .as_ref()
            .map(|pattern| pattern.captures_iter(html)),
        base: page_url.clone(),
        base_overridden: false,
        page_host: page_url.host_str().map(str::to_ascii_lowercase),
        foreign_only,
        seen: HashSet::new(),
    }
}

impl ResourceScanner<'_> {
    fn resolve(&self, raw: &str) -> Option<Url> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let mut url = match self.base.join(raw) {
            Ok(url) => url,
            Err(err) => {
                debug!("Skipping unparseable reference '{}': {}", raw, err);
                return None;
            }
        };
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }
        url.set_fragment(None);
        Some(url)
    }

    fn is_same_host(&self, url: &Url) -> bool {
        match (self.page_host.as_deref(), url.host_str()) {
            (Some(page), Some(host)) => page.eq_ignore_ascii_case(host),
            (None, _) | (_, None) => false,
        }
    }

    fn apply_base(&mut self, attrs: &Attributes) {
        if self.base_overridden {
            return;
        }
        if let Some(href) = attrs.get("href")
            && let Ok(base) = self.base.join(href.trim())
        {
            debug!("Document base set to {}", base);
            self.base = base;
            self.base_overridden = true;
        }
    }
}

impl Iterator for ResourceScanner<'_> {
    type Item = ResourceRef;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let caps = self.tags.as_mut()?.next()?;

            let (kind, target) = if let Some(script) = caps.name("script") {
                let attrs = Attributes::parse(script.as_str());
                match attrs.get("src") {
                    Some(src) => (ResourceKind::Script, src.to_owned()),
                    None => continue,
                }
            } else if let Some(tag) = caps.name("tag") {
                let attrs = Attributes::parse(caps.name("attrs").map_or("", |m| m.as_str()));
                let tag = tag.as_str().to_ascii_lowercase();
                match tag.as_str() {
                    "img" => match attrs.get("src") {
                        Some(src) => (ResourceKind::Image, src.to_owned()),
                        None => continue,
                    },
                    "link" if attrs.rel_contains("stylesheet") => match attrs.get("href") {
                        Some(href) => (ResourceKind::Stylesheet, href.to_owned()),
                        None => continue,
                    },
                    "base" => {
                        self.apply_base(&attrs);
                        continue;
                    }
                    _ => continue,
                }
            } else {
                // comment
                continue;
            };

            let Some(url) = self.resolve(&target) else {
                continue;
            };
            if self.foreign_only && self.is_same_host(&url) {
                continue;
            }
            if !self.seen.insert(url.clone()) {
                continue;
            }
            return Some(ResourceRef { kind, url });
        }
    }
}
