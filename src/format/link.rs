use std::sync::LazyLock;

use regex::Regex;

use super::Formatter;
use crate::fragment::{Fragment, FragmentType};

// `[label](scheme://url)` or a bare `scheme://url`. The url class stops at
// whitespace and at `)`, so a markdown link's closing paren is never eaten.
static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\[([\w\s]+)\]\(((?:https?|quaver)://[\w:#@%/;$~?+\-=\\.&]+)\)|((?:https?|quaver)://[\w:#@%/;$~?+\-=\\.&]+)",
    )
    .expect("link pattern is valid")
});

/// Recognizes markdown-style links and bare URIs.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinkFormatter;

impl Formatter for LinkFormatter {
    fn fragment_type(&self) -> FragmentType {
        FragmentType::Link
    }

    fn format(&self, raw: &str) -> Option<Vec<Fragment>> {
        let mut fragments = Vec::new();
        let mut current = 0;

        for captures in LINK_PATTERN.captures_iter(raw) {
            let Some(whole) = captures.get(0) else {
                continue;
            };

            if whole.start() > current {
                fragments.push(Fragment::unparsed(&raw[current..whole.start()]));
            }

            let (label, url) = match (captures.get(1), captures.get(2), captures.get(3)) {
                (Some(label), Some(url), _) => (label.as_str(), url.as_str()),
                (_, _, Some(bare)) => (bare.as_str(), bare.as_str()),
                _ => continue,
            };

            // The label stays unparsed so other formatters still get a look at it.
            fragments.push(Fragment::link(url, vec![Fragment::unparsed(label)]));
            current = whole.end();
        }

        if fragments.is_empty() {
            return None;
        }

        if current < raw.len() {
            fragments.push(Fragment::unparsed(&raw[current..]));
        }

        Some(fragments)
    }
}
