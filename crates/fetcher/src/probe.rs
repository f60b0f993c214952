//! Reachability probe: a header-only check before committing to a download.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use crate::PROBE_TIMEOUT;

/// Checks whether `url` looks like a downloadable file.
///
/// Issues a HEAD request (redirects followed) with a 10 s timeout. Returns
/// `true` only for a 2xx response whose `Content-Type` does not contain
/// `text/html` — an HTML page here is almost always an error or login page,
/// not the file itself. Every failure mode (network error, timeout, non-2xx)
/// collapses to `false`; callers treat that as "unreachable".
pub async fn probe(client: &reqwest::Client, url: &str) -> bool {
    probe_with_timeout(client, url, PROBE_TIMEOUT).await
}

/// [`probe`] with an explicit timeout.
pub async fn probe_with_timeout(client: &reqwest::Client, url: &str, timeout: Duration) -> bool {
    let response = match client.head(url).timeout(timeout).send().await {
        Ok(response) => response,
        Err(err) => {
            tracing::debug!(url, error = %err, "probe request failed");
            return false;
        }
    };

    if !response.status().is_success() {
        tracing::debug!(url, status = %response.status(), "probe rejected by status");
        return false;
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    !content_type.contains("text/html")
}
