use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use super::scanner::compile;

const ATTR_SOURCE: &str =
    r#"(?s)([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#;

static ATTR_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| compile(ATTR_SOURCE));

/// Attributes of one start tag, names lowercased, values entity-decoded.
#[derive(Debug, Default)]
pub(super) struct Attributes {
    pairs: Vec<(String, String)>,
}

impl Attributes {
    pub(super) fn parse(raw: &str) -> Self {
        let Some(pattern) = Lazy::force(&ATTR_PATTERN).as_ref() else {
            return Self::default();
        };
        let pairs = pattern
            .captures_iter(raw)
            .filter_map(|caps| {
                let name = caps.get(1)?.as_str().to_ascii_lowercase();
                let value = caps
                    .get(2)
                    .or_else(|| caps.get(3))
                    .or_else(|| caps.get(4))
                    .map_or("", |value| value.as_str());
                Some((name, decode_entities(value).into_owned()))
            })
            .collect();
        Self { pairs }
    }

    /// First value for `name`; later duplicates are ignored like browsers do.
    pub(super) fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub(super) fn rel_contains(&self, token: &str) -> bool {
        self.get("rel").is_some_and(|rel| {
            rel.split_ascii_whitespace()
                .any(|part| part.eq_ignore_ascii_case(token))
        })
    }
}

pub(super) fn decode_entities(value: &str) -> Cow<'_, str> {
    if !value.contains('&') {
        return Cow::Borrowed(value);
    }
    Cow::Owned(
        value
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&#x27;", "'")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&amp;", "&"),
    )
}
