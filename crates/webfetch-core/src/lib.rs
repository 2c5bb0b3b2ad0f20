//! # webfetch-core
//!
//! Core engine for concurrent web-content acquisition and extraction: given
//! one or more URLs it retrieves the raw documents, derives structured
//! artifacts from them (primary readable text, page metadata, categorized
//! hyperlinks, term-search matches with context), and returns typed results,
//! tolerating per-URL failure without aborting a batch.
//!
//! ## Architecture
//!
//! The crate is organized around several key components:
//!
//! - **Fetcher**: one document over HTTP through a shared, pooled client
//! - **Extraction**: two-stage content extraction plus head metadata
//! - **Links**: hyperlink resolution and internal/external/anchor
//!   categorization
//! - **Search**: term scanning with bounded context windows
//! - **Batch**: semaphore-bounded fan-out that preserves input order
//! - **Engine**: the five operations a transport layer calls into
//!
//! Suspension happens only at the network boundary inside the fetcher;
//! extraction, link resolution, and search are synchronous, pure
//! transformations over already-retrieved bytes. Everything downstream of a
//! fetch is testable with a synthetic document fixture and no network.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use webfetch_core::{FetchOptions, Result, WebFetchEngine};
//!
//! # async fn run() -> Result<()> {
//! let engine = WebFetchEngine::new()?;
//! let capture = engine
//!     .fetch_webpage("https://example.com", &FetchOptions::default())
//!     .await?;
//!
//! if let Some(content) = capture.content {
//!     println!("{} chars via {:?}", content.length, content.extraction_method);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`]. Request-parameter failures
//! abort a call before any network activity; per-URL failures inside a batch
//! are folded into that item's [`BatchItemResult`] so siblings keep going.
//! Non-2xx statuses are content, not errors; see
//! [`FetchOutcome::error_for_status`] for the strict view.

/// Bounded concurrent fan-out over URL lists
pub mod batch;
/// Engine configuration and defaults
pub mod config;
/// The five transport-facing operations
pub mod engine;
/// Error types and result aliases
pub mod error;
/// Content and metadata extraction from fetched documents
pub mod extract;
/// HTTP fetching over a shared pooled client
pub mod fetcher;
/// Hyperlink enumeration, resolution, and categorization
pub mod links;
/// Term search with context windows
pub mod search;
/// Core data types and structures
pub mod types;

// Re-export commonly used types
pub use config::{
    DEFAULT_CONTEXT_CHARS, DEFAULT_MAX_CONCURRENT, DEFAULT_TIMEOUT_SECS, FetchConfig,
};
pub use engine::{FetchOptions, WebFetchEngine};
pub use error::{Error, ErrorKind, FailureRecord, Result};
pub use fetcher::Fetcher;
pub use links::LinkOptions;
pub use types::*;
