//! Content and metadata extraction from fetched documents.
//!
//! Extraction is a two-stage strategy with an explicit outcome tag rather
//! than exception-driven control flow:
//!
//! 1. **Structured pass**: locate the main content region (semantic
//!    containers like `<article>`/`<main>`, then common content ids/classes,
//!    then paragraph aggregation), scoring candidates by visible text length
//!    with navigation and boilerplate regions excluded.
//! 2. **Fallback pass**: if the structured pass yields less than
//!    [`MIN_STRUCTURED_LEN`] characters, concatenate every visible text node
//!    in the document.
//!
//! Parsing is best-effort: malformed markup never raises, it just degrades
//! the result. All extracted text is whitespace-normalized.

use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{Html, Selector};
use tracing::debug;

use crate::config::MIN_STRUCTURED_LEN;
use crate::types::{ExtractedContent, ExtractionMethod, PageMetadata};

/// Elements whose text is never visible to a reader.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that typically hold navigation or boilerplate rather than
/// primary content. Excluded from the structured pass only.
const BOILERPLATE_ELEMENTS: &[&str] = &["nav", "header", "footer", "aside", "form"];

/// Containers tried in order when locating the main content region.
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role=\"main\"]",
    "#content",
    "#main-content",
    ".post-content",
    ".entry-content",
    ".article-body",
    ".content",
];

/// Derive the primary readable text of a document.
///
/// Never fails: documents that are not HTML (per `content_type`) or that
/// defeat the structured heuristics come back whitespace-normalized with
/// method [`ExtractionMethod::FallbackFullText`]. The result text may be
/// empty.
#[must_use]
pub fn extract(body: &str, content_type: Option<&str>) -> ExtractedContent {
    if let Some(ct) = content_type {
        if !ct.contains("html") && !ct.contains("xml") {
            // Plain text, JSON, etc. have nothing to parse, just normalize.
            return fallback_content(normalize_whitespace(body));
        }
    }

    let document = Html::parse_document(body);

    if let Some(text) = structured_text(&document) {
        let length = text.chars().count();
        return ExtractedContent {
            text,
            extraction_method: ExtractionMethod::Structured,
            length,
        };
    }

    debug!("structured extraction below threshold, using full-text fallback");
    fallback_content(visible_text(&document, HIDDEN_ELEMENTS))
}

fn fallback_content(text: String) -> ExtractedContent {
    let length = text.chars().count();
    ExtractedContent {
        text,
        extraction_method: ExtractionMethod::FallbackFullText,
        length,
    }
}

/// Structured main-content identification. Returns `None` when the best
/// candidate falls below the acceptance threshold.
fn structured_text(document: &Html) -> Option<String> {
    let mut best: Option<String> = None;

    for selector_str in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        for element in document.select(&selector) {
            let mut parts = Vec::new();
            collect_visible_text(*element, &mut parts, true);
            let text = parts.join(" ");
            if best.as_ref().is_none_or(|b| text.chars().count() > b.chars().count()) {
                best = Some(text);
            }
        }
    }

    // No recognizable container: aggregate paragraphs outside boilerplate
    // regions, which covers plain `<div><p>...` layouts.
    if best.as_ref().is_none_or(|b| b.chars().count() < MIN_STRUCTURED_LEN) {
        if let Some(text) = paragraph_text(document) {
            if best.as_ref().is_none_or(|b| text.chars().count() > b.chars().count()) {
                best = Some(text);
            }
        }
    }

    best.filter(|text| text.chars().count() >= MIN_STRUCTURED_LEN)
}

fn paragraph_text(document: &Html) -> Option<String> {
    let selector = Selector::parse("p").ok()?;
    let mut parts = Vec::new();
    for element in document.select(&selector) {
        let inside_boilerplate = element.ancestors().any(|node| {
            node.value()
                .as_element()
                .is_some_and(|el| BOILERPLATE_ELEMENTS.contains(&el.name()))
        });
        if inside_boilerplate {
            continue;
        }
        let text = normalize_whitespace(&element.text().collect::<String>());
        if !text.is_empty() {
            parts.push(text);
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Concatenated visible text of the whole document.
fn visible_text(document: &Html, skip: &[&str]) -> String {
    let mut parts = Vec::new();
    collect_node_text(document.tree.root(), skip, &mut parts, false);
    parts.join(" ")
}

fn collect_visible_text(node: NodeRef<'_, Node>, parts: &mut Vec<String>, skip_boilerplate: bool) {
    collect_node_text(node, HIDDEN_ELEMENTS, parts, skip_boilerplate);
}

fn collect_node_text(
    node: NodeRef<'_, Node>,
    skip: &[&str],
    parts: &mut Vec<String>,
    skip_boilerplate: bool,
) {
    match node.value() {
        Node::Text(text) => {
            let normalized = normalize_whitespace(text);
            if !normalized.is_empty() {
                parts.push(normalized);
            }
        },
        Node::Element(element) => {
            let name = element.name();
            if skip.contains(&name) {
                return;
            }
            if skip_boilerplate && BOILERPLATE_ELEMENTS.contains(&name) {
                return;
            }
            for child in node.children() {
                collect_node_text(child, skip, parts, skip_boilerplate);
            }
        },
        Node::Comment(_) | Node::Doctype(_) | Node::ProcessingInstruction(_) => {},
        _ => {
            for child in node.children() {
                collect_node_text(child, skip, parts, skip_boilerplate);
            }
        },
    }
}

pub(crate) fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pull structured metadata from a document's head.
///
/// Runs independently of content extraction and never fails on missing tags;
/// absence simply omits the field. `og:*` and `twitter:*` properties are kept
/// verbatim, last occurrence winning on duplicate keys.
#[must_use]
pub fn extract_metadata(body: &str) -> PageMetadata {
    let document = Html::parse_document(body);
    let mut metadata = PageMetadata::default();

    if let Ok(selector) = Selector::parse("title") {
        metadata.title = document
            .select(&selector)
            .next()
            .map(|el| normalize_whitespace(&el.text().collect::<String>()))
            .filter(|t| !t.is_empty());
    }

    if let Ok(selector) = Selector::parse("meta") {
        for element in document.select(&selector) {
            let Some(content) = element.value().attr("content") else {
                continue;
            };
            let name = element.value().attr("name").unwrap_or("").to_lowercase();
            let property = element
                .value()
                .attr("property")
                .unwrap_or("")
                .to_lowercase();

            match name.as_str() {
                "description" => metadata.description = Some(content.to_string()),
                "keywords" => metadata.keywords = Some(content.to_string()),
                "author" => metadata.author = Some(content.to_string()),
                _ => {},
            }

            if property.starts_with("og:") {
                metadata
                    .open_graph
                    .insert(property.clone(), content.to_string());
            }
            // Twitter Card tags appear under either attribute in the wild.
            for key in [&name, &property] {
                if key.starts_with("twitter:") {
                    metadata
                        .twitter_card
                        .insert(key.to_string(), content.to_string());
                }
            }
        }
    }

    if let Ok(selector) = Selector::parse("link[rel=\"canonical\"]") {
        metadata.canonical_url = document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("href"))
            .map(std::string::ToString::to_string);
    }

    if let Ok(selector) = Selector::parse("html") {
        metadata.language = document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("lang"))
            .filter(|lang| !lang.is_empty())
            .map(std::string::ToString::to_string);
    }

    metadata
}
