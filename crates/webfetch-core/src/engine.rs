//! The five web-content operations exposed to the transport layer.
//!
//! Each method is a pure request-to-result mapping: the engine consumes an
//! operation's parameters and returns either its typed result or an [`Error`]
//! the transport maps to a [`crate::FailureRecord`]. The engine knows nothing
//! about how it was invoked: tool-call envelopes, routes, and argument
//! parsing live entirely in the caller.
//!
//! Request-parameter validation (invalid standalone URL, empty search terms,
//! bad concurrency bound, contradictory link filters) happens before any
//! network activity. Per-URL failures inside a batch are captured as data in
//! that item's slot and never abort siblings.

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::error::FailureRecord;
use crate::fetcher::{Fetcher, validate_url};
use crate::links::LinkOptions;
use crate::types::{
    BatchItemResult, BatchReport, FetchOutcome, LinkCategory, LinkReport, MetadataReport,
    PageCapture, SearchReport,
};
use crate::{Error, Result, batch, extract, links, search};

/// Options shared by the single-page and batch fetch operations.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Run main-content extraction on the fetched document. When disabled the
    /// raw body is returned instead.
    pub extract_content: bool,
    /// Extract page metadata alongside the content.
    pub include_metadata: bool,
    /// Per-request timeout. `None` uses the configured default.
    pub timeout: Option<Duration>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            extract_content: true,
            include_metadata: true,
            timeout: None,
        }
    }
}

/// Web-content acquisition and extraction engine.
///
/// Owns the shared HTTP client; construct one per process and share it across
/// calls so connections are pooled rather than recreated.
pub struct WebFetchEngine {
    fetcher: Fetcher,
}

impl WebFetchEngine {
    /// Create an engine with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(&FetchConfig::default())
    }

    /// Create an engine from explicit configuration.
    pub fn with_config(config: &FetchConfig) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::with_config(config)?,
        })
    }

    /// Fetch one page and derive the requested artifacts from it.
    pub async fn fetch_webpage(&self, url: &str, options: &FetchOptions) -> Result<PageCapture> {
        let outcome = self.fetcher.fetch(url, options.timeout).await?;
        Ok(build_capture(outcome, options))
    }

    /// Fetch several pages concurrently, at most `max_concurrent` in flight.
    ///
    /// Returns one slot per input URL in input order; a failing URL is
    /// captured into its own slot and does not disturb siblings. Fails only
    /// on invalid input (empty list, `max_concurrent < 1`), before any
    /// network activity.
    pub async fn fetch_multiple_pages(
        &self,
        urls: Vec<String>,
        options: &FetchOptions,
        max_concurrent: usize,
    ) -> Result<BatchReport> {
        let results = batch::run_batch(urls, max_concurrent, |url| async move {
            match self.fetch_webpage(&url, options).await {
                Ok(capture) => BatchItemResult::Ok(capture),
                Err(err) => {
                    warn!(%url, error = %err, "batch item failed");
                    BatchItemResult::Failed(FailureRecord::from_error(url, &err))
                },
            }
        })
        .await?;

        let successful = results.iter().filter(|r| r.is_ok()).count();
        Ok(BatchReport {
            total_urls: results.len(),
            successful,
            failed: results.len() - successful,
            results,
        })
    }

    /// Fetch a page, extract its primary content, and search it for `terms`.
    ///
    /// Term validation happens before the fetch: an empty term list or an
    /// empty-string term fails the call without any network activity.
    pub async fn search_webpage_content(
        &self,
        url: &str,
        terms: &[String],
        case_sensitive: bool,
        context_chars: usize,
        timeout: Option<Duration>,
    ) -> Result<SearchReport> {
        if terms.is_empty() {
            return Err(Error::InvalidSearchTerm(
                "search_terms must not be empty".to_string(),
            ));
        }
        if terms.iter().any(String::is_empty) {
            return Err(Error::InvalidSearchTerm(
                "empty search term would match at every position".to_string(),
            ));
        }

        let outcome = self.fetcher.fetch(url, timeout).await?;
        let content = extract::extract(&outcome.body, outcome.content_type.as_deref());
        let matches = search::search(&content.text, terms, case_sensitive, context_chars)?;

        debug!(%url, matches = matches.len(), "content search complete");

        Ok(SearchReport {
            url: outcome.url,
            status_code: outcome.status_code,
            search_terms: terms.to_vec(),
            total_matches: matches.len(),
            matches,
            content_length: content.length,
        })
    }

    /// Fetch a page and enumerate its hyperlinks, resolved and categorized.
    ///
    /// Contradictory filters are rejected before the fetch.
    pub async fn extract_links(
        &self,
        url: &str,
        options: LinkOptions,
        timeout: Option<Duration>,
    ) -> Result<LinkReport> {
        // Validate before any network call: the URL itself, then the filters
        // (links::extract_links re-checks, but only after a wasted fetch).
        validate_url(url)?;
        if options.filter_internal && options.filter_external {
            return Err(Error::InvalidBatchParameters(
                "filter_internal and filter_external are mutually exclusive".to_string(),
            ));
        }

        let outcome = self.fetcher.fetch(url, timeout).await?;
        // Resolve against the final URL so redirects do not skew classification.
        let base = validate_url(&outcome.final_url)?;
        let links = links::extract_links(&outcome.body, &base, options)?;

        let internal_count = links
            .iter()
            .filter(|l| l.category == LinkCategory::Internal)
            .count();
        let external_count = links
            .iter()
            .filter(|l| l.category == LinkCategory::External)
            .count();

        Ok(LinkReport {
            source_url: outcome.url,
            total_links: links.len(),
            internal_count,
            external_count,
            links,
        })
    }

    /// Fetch a page and extract only its metadata.
    pub async fn get_page_metadata(
        &self,
        url: &str,
        timeout: Option<Duration>,
    ) -> Result<MetadataReport> {
        let outcome = self.fetcher.fetch(url, timeout).await?;
        let metadata = extract::extract_metadata(&outcome.body);

        Ok(MetadataReport {
            url: outcome.url,
            status_code: outcome.status_code,
            content_type: outcome.content_type,
            content_length: outcome.content_length,
            metadata,
        })
    }
}

fn build_capture(outcome: FetchOutcome, options: &FetchOptions) -> PageCapture {
    let FetchOutcome {
        url,
        final_url,
        status_code,
        content_type,
        content_length,
        body,
        fetched_at,
    } = outcome;

    let metadata = options
        .include_metadata
        .then(|| extract::extract_metadata(&body));

    // The body is consumed exactly once: either by the extractor or returned raw.
    let (content, raw_html) = if options.extract_content {
        (Some(extract::extract(&body, content_type.as_deref())), None)
    } else {
        (None, Some(body))
    };

    PageCapture {
        url,
        final_url,
        status_code,
        content_type,
        content_length,
        fetched_at,
        content,
        metadata,
        raw_html,
    }
}
