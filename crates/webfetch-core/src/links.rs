//! Hyperlink enumeration, resolution, and categorization.
//!
//! Every anchor element with an `href` is resolved against the document's
//! base URL per RFC 3986 reference resolution, then classified:
//!
//! - `anchor`: resolves to the same document with only a fragment
//!   difference;
//! - `internal`: same host as the base URL;
//! - `external`: any other host.
//!
//! Duplicate `(href, category)` pairs are preserved in document order since
//! anchor text may differ per occurrence and is part of the signal.

use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::extract::normalize_whitespace;
use crate::types::{LinkCategory, LinkRecord};
use crate::{Error, Result};

/// Filtering options for link extraction.
///
/// `filter_internal` and `filter_external` are mutually exclusive; requesting
/// both is rejected as a usage error since their intersection is empty by
/// construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkOptions {
    /// Keep only same-host links (anchors count as internal).
    pub filter_internal: bool,
    /// Keep only cross-host links.
    pub filter_external: bool,
    /// Keep fragment-only links. Off by default.
    pub include_anchors: bool,
}

impl LinkOptions {
    fn validate(self) -> Result<()> {
        if self.filter_internal && self.filter_external {
            return Err(Error::InvalidBatchParameters(
                "filter_internal and filter_external are mutually exclusive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Enumerate hyperlinks in `body`, resolved against `base_url`, in document
/// order.
///
/// Non-HTTP(S) references (`mailto:`, `javascript:`, `tel:`) and hrefs that
/// fail to resolve are skipped.
pub fn extract_links(body: &str, base_url: &Url, options: LinkOptions) -> Result<Vec<LinkRecord>> {
    options.validate()?;

    let document = Html::parse_document(body);
    let selector = Selector::parse("a[href]")
        .map_err(|e| Error::Parse(format!("link selector: {e}")))?;

    let mut links = Vec::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Ok(resolved) = base_url.join(href) else {
            debug!(%href, "skipping unresolvable href");
            continue;
        };
        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }

        let category = categorize(base_url, &resolved);
        let is_anchor = category == LinkCategory::Anchor;

        if is_anchor && !options.include_anchors {
            continue;
        }
        if options.filter_internal && category == LinkCategory::External {
            continue;
        }
        if options.filter_external && category != LinkCategory::External {
            continue;
        }

        links.push(LinkRecord {
            href: resolved.into(),
            text: normalize_whitespace(&element.text().collect::<String>()),
            title: element.value().attr("title").map(std::string::ToString::to_string),
            category,
            is_anchor,
        });
    }

    Ok(links)
}

fn categorize(base: &Url, resolved: &Url) -> LinkCategory {
    let same_document = resolved.scheme() == base.scheme()
        && resolved.host_str() == base.host_str()
        && resolved.port_or_known_default() == base.port_or_known_default()
        && resolved.path() == base.path()
        && resolved.query() == base.query();

    if same_document && resolved.fragment().is_some() {
        LinkCategory::Anchor
    } else if resolved.host_str() == base.host_str() {
        LinkCategory::Internal
    } else {
        LinkCategory::External
    }
}
