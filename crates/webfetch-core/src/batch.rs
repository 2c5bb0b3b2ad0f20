//! Bounded fan-out/fan-in over a list of URLs.
//!
//! The orchestrator enforces a hard ceiling on simultaneously in-flight item
//! operations via a semaphore-gated buffered stream, and fans results back in
//! preserving *input* order: each future is tagged with its input index and
//! written into a result-slot vector, so completion order never leaks into
//! the output.
//!
//! The per-item operation is infallible from the orchestrator's point of
//! view: item failures are folded into the item's own result by the caller
//! (see [`crate::WebFetchEngine::fetch_multiple_pages`]), so one slow or
//! broken URL can never abort its siblings. The orchestrator itself fails
//! only on invalid input, before any work starts.

use std::future::Future;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::sync::Semaphore;
use tracing::debug;

use crate::{Error, Result};

/// Run `op` against every URL with at most `max_concurrent` in flight.
///
/// Returns one result per input URL, in input order. Rejects an empty URL
/// list or `max_concurrent < 1` with [`Error::InvalidBatchParameters`].
pub async fn run_batch<T, F, Fut>(
    urls: Vec<String>,
    max_concurrent: usize,
    op: F,
) -> Result<Vec<T>>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = T>,
{
    if urls.is_empty() {
        return Err(Error::InvalidBatchParameters(
            "urls list is empty".to_string(),
        ));
    }
    if max_concurrent < 1 {
        return Err(Error::InvalidBatchParameters(format!(
            "max_concurrent must be at least 1, got {max_concurrent}"
        )));
    }

    let total = urls.len();
    debug!(total, max_concurrent, "starting batch");

    let semaphore = Arc::new(Semaphore::new(max_concurrent));
    let op = &op;

    let completed: Vec<(usize, T)> = stream::iter(urls.into_iter().enumerate())
        .map(|(index, url)| {
            let semaphore = Arc::clone(&semaphore);
            async move {
                let _permit = semaphore.acquire().await;
                (index, op(url).await)
            }
        })
        .buffer_unordered(max_concurrent)
        .collect()
        .await;

    // Fan back in: place completed items by their input index.
    let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(total).collect();
    for (index, value) in completed {
        slots[index] = Some(value);
    }
    debug_assert!(slots.iter().all(Option::is_some));

    Ok(slots.into_iter().flatten().collect())
}
