use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, FailureRecord, Result};

/// Transport-level outcome of fetching one document.
///
/// `body` is owned by the fetch invocation and consumed once by the
/// extractors; it is never serialized and never shared between concurrent
/// batch items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchOutcome {
    /// The URL as requested by the caller; stable for reconciling batch
    /// results against the input list.
    pub url: String,
    /// The URL that actually served the response, after redirects.
    pub final_url: String,
    /// Final status code after redirects. Absent on transport failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub content_length: usize,
    #[serde(skip, default)]
    pub body: String,
    pub fetched_at: DateTime<Utc>,
}

impl FetchOutcome {
    /// Whether the response carried a 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status_code.is_some_and(|s| (200..300).contains(&s))
    }

    /// Strict interpretation of the status code: errors on non-2xx.
    ///
    /// The fetcher itself treats a 404 page as valid content; this is the
    /// opt-in for callers that do not.
    pub fn error_for_status(&self) -> Result<&Self> {
        match self.status_code {
            Some(status) if !(200..300).contains(&status) => Err(Error::HttpStatus {
                url: self.url.clone(),
                status,
            }),
            _ => Ok(self),
        }
    }
}

/// Structured metadata pulled from a document's head.
///
/// Absent fields are omitted, never null-filled. Open Graph and Twitter Card
/// properties keep their verbatim property names (`og:title`,
/// `twitter:card`); on duplicate keys the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub open_graph: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub twitter_card: BTreeMap<String, String>,
}

/// How the primary text of a document was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionMethod {
    /// Main-content identification succeeded.
    #[serde(rename = "structured")]
    Structured,
    /// Structured pass yielded too little; all visible text was concatenated.
    #[serde(rename = "fallback-full-text")]
    FallbackFullText,
}

/// Primary readable content of a document, whitespace-normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub text: String,
    pub extraction_method: ExtractionMethod,
    pub length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkCategory {
    Internal,
    External,
    Anchor,
}

/// One hyperlink found in a document, resolved against its base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Resolved absolute URL.
    pub href: String,
    /// Visible anchor text, may be empty.
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub category: LinkCategory,
    pub is_anchor: bool,
}

/// One term occurrence with its surrounding context window.
///
/// `position` is a character offset into the scanned text. `context`
/// preserves original casing even for case-insensitive searches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub term: String,
    pub position: usize,
    pub context: String,
    pub case_sensitive: bool,
}

/// Result of `fetch_webpage`: the fetch outcome fields plus whichever
/// artifacts the caller requested.
///
/// `raw_html` carries the unprocessed body when content extraction was
/// skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageCapture {
    /// The requested URL; matches the input list in batch results.
    pub url: String,
    /// The URL that served the response, after redirects.
    pub final_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub content_length: usize,
    pub fetched_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ExtractedContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PageMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_html: Option<String>,
}

/// Per-URL result slot in a batch: success or a captured failure, tagged by
/// URL so callers can reconcile against the input list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchItemResult {
    Ok(PageCapture),
    Failed(FailureRecord),
}

impl BatchItemResult {
    /// URL this slot belongs to.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Ok(capture) => &capture.url,
            Self::Failed(record) => &record.url,
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }
}

/// Result of `fetch_multiple_pages`: one slot per input URL in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub total_urls: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<BatchItemResult>,
}

/// Result of `search_webpage_content`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub search_terms: Vec<String>,
    pub total_matches: usize,
    pub matches: Vec<SearchMatch>,
    /// Length of the text the search ran over, in characters.
    pub content_length: usize,
}

/// Result of `extract_links`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkReport {
    pub source_url: String,
    pub total_links: usize,
    pub internal_count: usize,
    pub external_count: usize,
    pub links: Vec<LinkRecord>,
}

/// Result of `get_page_metadata`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataReport {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub content_length: usize,
    pub metadata: PageMetadata,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn outcome(status: Option<u16>) -> FetchOutcome {
        FetchOutcome {
            url: "https://example.com".to_string(),
            final_url: "https://example.com".to_string(),
            status_code: status,
            content_type: Some("text/html".to_string()),
            content_length: 0,
            body: String::new(),
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_error_for_status() {
        assert!(outcome(Some(200)).error_for_status().is_ok());
        assert!(outcome(Some(204)).error_for_status().is_ok());
        // Transport failure without a status is not an HTTP error
        assert!(outcome(None).error_for_status().is_ok());

        match outcome(Some(404)).error_for_status() {
            Err(Error::HttpStatus { status, .. }) => assert_eq!(status, 404),
            other => panic!("expected HttpStatus error, got {other:?}"),
        }
    }

    #[test]
    fn test_body_not_serialized() {
        let mut out = outcome(Some(200));
        out.body = "<html>secret</html>".to_string();
        let json = serde_json::to_string(&out).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("\"body\""));
    }

    #[test]
    fn test_extraction_method_names() {
        assert_eq!(
            serde_json::to_value(ExtractionMethod::Structured).unwrap(),
            "structured"
        );
        assert_eq!(
            serde_json::to_value(ExtractionMethod::FallbackFullText).unwrap(),
            "fallback-full-text"
        );
    }

    #[test]
    fn test_page_metadata_omits_absent_fields() {
        let meta = PageMetadata {
            title: Some("Home".to_string()),
            ..PageMetadata::default()
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["title"], "Home");
        assert!(json.get("description").is_none());
        assert!(json.get("open_graph").is_none());
    }

    #[test]
    fn test_batch_item_result_tagging() {
        let failed = BatchItemResult::Failed(FailureRecord {
            url: "https://bad.example".to_string(),
            kind: crate::ErrorKind::ConnectionError,
            message: "connection refused".to_string(),
        });
        assert!(!failed.is_ok());
        assert_eq!(failed.url(), "https://bad.example");

        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "failed");
    }
}
