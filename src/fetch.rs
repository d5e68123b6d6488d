//! HTTP fetch for the watched page.
//!
//! Not a browser — one plain GET per call, no retry. A transport failure or
//! non-success status degrades to an empty document; the caller treats that
//! as "no data this run", never as a fatal error.

use std::time::Duration;
use tracing::warn;

/// Default request timeout.
const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// HTTP client for document fetches.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a new HTTP client with a desktop user-agent.
    pub fn new() -> Self {
        let ua = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                  AppleWebKit/537.36 (KHTML, like Gecko) \
                  Chrome/131.0.0.0 Safari/537.36";

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(DEFAULT_TIMEOUT_MS))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(ua)
            .build()
            .unwrap_or_default();

        Self { client }
    }

    /// Fetch the document at `url`.
    ///
    /// Returns the body text, or the empty string on any transport error or
    /// non-success status (logged).
    pub async fn fetch_document(&self, url: &str) -> String {
        match self.client.get(url).send().await {
            Ok(resp) => {
                let status = resp.status();
                if !status.is_success() {
                    warn!("fetch of {url} returned status {status}");
                    return String::new();
                }
                resp.text().await.unwrap_or_default()
            }
            Err(e) => {
                warn!("fetch of {url} failed: {e}");
                String::new()
            }
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
