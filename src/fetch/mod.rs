mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use bytes::Bytes;

/// Fetches one feed's raw bytes over HTTP.
///
/// The response body is returned opaque; decoding is the caller's concern.
/// Non-success statuses and timeouts surface as errors rather than empty
/// buffers.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Bytes> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client
        .execute(req)
        .await
        .with_context(|| format!("feed fetch failed: {url}"))?
        .error_for_status()?;
    Ok(resp.bytes().await?)
}
