pub mod types;

use std::sync::mpsc;

use anyhow::{bail, Context, Result};

use self::types::{FetchOutcome, ListingResponse, RawEntry};

/// Default endpoint of a local IPFS node's MFS listing API.
/// The API expects POST even though the request carries no body.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5001/api/v0/files/ls?long=true";

/// How a parsed listing payload becomes layout entries. Only one alternate
/// behavior exists, so a plain function pointer is the whole strategy seam.
pub type ListingTransform = fn(ListingResponse) -> Vec<RawEntry>;

/// Default transform: take the payload's entries as-is.
pub fn default_transform(listing: ListingResponse) -> Vec<RawEntry> {
    listing.into_entries()
}

/// Fetch and parse the listing synchronously.
pub fn fetch_listing(endpoint: &str) -> Result<Vec<RawEntry>> {
    fetch_listing_with(endpoint, default_transform)
}

/// Fetch the listing and turn it into entries with a custom transform.
pub fn fetch_listing_with(endpoint: &str, transform: ListingTransform) -> Result<Vec<RawEntry>> {
    let client = reqwest::blocking::Client::new();
    let response = client
        .post(endpoint)
        .send()
        .with_context(|| format!("failed to reach node at {endpoint}"))?;

    if !response.status().is_success() {
        bail!(
            "listing request to {} failed with status {}",
            endpoint,
            response.status()
        );
    }

    let listing: ListingResponse = response
        .json()
        .with_context(|| format!("malformed listing payload from {endpoint}"))?;
    Ok(transform(listing))
}

/// Run the one-shot fetch on a background thread.
///
/// The returned receiver yields exactly one `FetchOutcome`. Dropping the
/// receiver (teardown) makes the worker's send fail silently, which is how
/// a response arriving after teardown gets discarded.
pub fn spawn_fetch(endpoint: String) -> mpsc::Receiver<FetchOutcome> {
    spawn_fetch_with(endpoint, default_transform)
}

/// Like [`spawn_fetch`], with a custom listing transform.
pub fn spawn_fetch_with(
    endpoint: String,
    transform: ListingTransform,
) -> mpsc::Receiver<FetchOutcome> {
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        let outcome = match fetch_listing_with(&endpoint, transform) {
            Ok(entries) => {
                tracing::info!("Fetched {} entries from {}", entries.len(), endpoint);
                FetchOutcome::Completed { entries }
            }
            Err(e) => {
                tracing::error!("Listing fetch failed: {:#}", e);
                FetchOutcome::Failed {
                    message: e.to_string(),
                }
            }
        };
        let _ = tx.send(outcome);
    });

    rx
}
