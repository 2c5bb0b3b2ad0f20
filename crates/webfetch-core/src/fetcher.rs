//! HTTP fetching over a shared, pooled client.
//!
//! One [`Fetcher`] is constructed at startup and shared across all concurrent
//! operations; connections are pooled and reused rather than created per
//! call, which bounds socket use under batch load. Suspension happens only at
//! the network boundary in here; everything downstream of a
//! [`FetchOutcome`] is a pure, synchronous transformation.

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info};
use url::Url;

use crate::config::FetchConfig;
use crate::types::FetchOutcome;
use crate::{Error, Result};

/// HTTP client for retrieving documents with a per-request timeout.
pub struct Fetcher {
    client: Client,
    default_timeout: Duration,
}

impl Fetcher {
    /// Creates a new fetcher with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(&FetchConfig::default())
    }

    /// Creates a new fetcher from explicit configuration.
    pub fn with_config(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self {
            client,
            default_timeout: config.timeout(),
        })
    }

    /// Fetches one document, following redirects, capturing the final status
    /// code, content type, and body.
    ///
    /// The URL is validated before any network call; syntactically invalid or
    /// non-HTTP(S) URLs fail with [`Error::InvalidUrl`] immediately. Non-2xx
    /// statuses still produce an outcome: a 404 page is valid content for
    /// extraction purposes. Only connection-level failures (DNS, refused,
    /// reset, timeout) prevent an outcome from being produced.
    pub async fn fetch(&self, url: &str, timeout: Option<Duration>) -> Result<FetchOutcome> {
        let parsed = validate_url(url)?;
        let timeout = timeout.unwrap_or(self.default_timeout);

        debug!(%url, ?timeout, "fetching document");

        let response = self
            .client
            .get(parsed)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_request_error(url, e))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(std::string::ToString::to_string);
        // URL that actually served the response; the redirect chain itself
        // is not exposed. The outcome stays tagged with the requested URL so
        // callers can reconcile it against their input.
        let final_url = response.url().to_string();

        let body = response
            .text()
            .await
            .map_err(|e| classify_request_error(url, e))?;

        info!(%url, status = status.as_u16(), bytes = body.len(), "fetched document");

        Ok(FetchOutcome {
            url: url.to_string(),
            final_url,
            status_code: Some(status.as_u16()),
            content_type,
            content_length: body.len(),
            body,
            fetched_at: Utc::now(),
        })
    }
}

/// Validate that `url` is an absolute HTTP/HTTPS URL with a host.
pub(crate) fn validate_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| Error::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    if parsed.host_str().is_none() {
        return Err(Error::InvalidUrl {
            url: url.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(parsed)
}

fn classify_request_error(url: &str, error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::Timeout(url.to_string())
    } else if error.is_connect() {
        Error::Connection {
            url: url.to_string(),
            reason: error.to_string(),
        }
    } else {
        Error::Network(error)
    }
}
