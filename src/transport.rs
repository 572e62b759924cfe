//! HTTP transport capability
//!
//! The engine performs every upstream call through [`HttpFetcher`], which
//! returns decoded JSON or a [`TrailPlannerError::TransientIo`]. Retries and
//! backoff are the transport's concern; the engine never retries.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

use crate::config::ProvidersConfig;
use crate::{Result, TrailPlannerError};

/// Request headers, name → value
pub type Headers = BTreeMap<String, String>;

/// Performs a GET and decodes the JSON body
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn get_json(&self, url: &str, headers: &Headers) -> Result<Value>;
}

/// [`HttpFetcher`] backed by `reqwest`
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    /// Create a new client
    pub fn new(config: &ProvidersConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("TrailPlanner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TrailPlannerError::config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    #[instrument(name = "http_get", level = "debug", skip(self, headers))]
    async fn get_json(&self, url: &str, headers: &Headers) -> Result<Value> {
        let start_time = Instant::now();

        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| TrailPlannerError::transient(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Upstream returned {} for {}", status, redact(url));
            return Err(TrailPlannerError::http_status(
                status.as_u16(),
                format!("upstream returned {status}: {}", truncate(&error_text, 200)),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TrailPlannerError::transient(format!("failed to read response body: {e}")))?;

        let elapsed = start_time.elapsed();
        debug!("GET {} completed in {:.3}s", redact(url), elapsed.as_secs_f64());
        if elapsed.as_secs() > 5 {
            warn!("Slow upstream response: {:.3}s", elapsed.as_secs_f64());
        }

        Ok(body)
    }
}

/// Strip the query string so API keys passed as parameters never reach logs
fn redact(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
