//! Configuration for the fetch engine.
//!
//! Settings are deliberately small: one struct covering the shared HTTP
//! client plus compile-time defaults for the per-operation knobs. The
//! transport layer decides where configuration comes from (file, flags,
//! environment); this module only parses and validates it.
//!
//! ## Example
//!
//! ```rust
//! use webfetch_core::FetchConfig;
//!
//! let config = FetchConfig::from_toml_str(
//!     r#"
//!     timeout_secs = 10
//!     pool_max_idle_per_host = 4
//!     "#,
//! )?;
//! assert_eq!(config.timeout_secs, 10);
//! # Ok::<(), webfetch_core::Error>(())
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default ceiling on simultaneously in-flight batch items.
pub const DEFAULT_MAX_CONCURRENT: usize = 5;
/// Default half-width of a search context window, in characters.
pub const DEFAULT_CONTEXT_CHARS: usize = 200;
/// Minimum text length (characters) for the structured extraction pass to be
/// accepted before falling back to full-text concatenation.
pub const MIN_STRUCTURED_LEN: usize = 80;

/// Settings for the shared HTTP client.
///
/// Constructed once at startup and handed to [`crate::Fetcher::with_config`];
/// the pooled client it produces is shared across all concurrent fetches for
/// the life of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// User-Agent header sent with every request.
    pub user_agent: String,

    /// Default request timeout in seconds, used when an operation does not
    /// supply its own.
    pub timeout_secs: u64,

    /// Maximum idle pooled connections kept per host.
    pub pool_max_idle_per_host: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("webfetch/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            pool_max_idle_per_host: 10,
        }
    }
}

impl FetchConfig {
    /// Parse configuration from a TOML string, filling omitted fields with
    /// defaults.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(input).map_err(|e| Error::Parse(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Default timeout as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::Parse("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}
