use bytes::Bytes;
use std::time::Duration;

/// Builds the shared HTTP client used to fetch remote images. The timeout
/// bounds the whole fetch; there is no retry and no cancellation once a
/// fetch has started.
pub fn build_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_default()
}

/// Downloads the bytes behind `url`. Any transport error or non-success
/// status is reported as `None`; the caller decides the response status.
pub async fn fetch_bytes(client: &reqwest::Client, url: &str) -> Option<Bytes> {
    let response = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("Image fetch failed for {}: {}", url, e);
            return None;
        }
    };

    if !response.status().is_success() {
        tracing::warn!("Image fetch for {} returned {}", url, response.status());
        return None;
    }

    response.bytes().await.ok()
}
