//! Test utilities for the HTTP transport.
//!
//! [`StubFetcher`] is a deterministic [`HttpFetcher`] that serves canned JSON
//! by URL substring, records every requested URL and tracks how many requests
//! were in flight at once.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::transport::{Headers, HttpFetcher};
use crate::{Result, TrailPlannerError};

#[derive(Debug, Clone)]
enum StubResponse {
    Json(Value),
    Status(u16),
}

#[derive(Debug, Clone)]
struct Route {
    pattern: String,
    response: StubResponse,
    delay: Option<Duration>,
}

/// Stub `HttpFetcher` for testing.
///
/// Routes are matched in registration order; the first route whose pattern
/// occurs in the URL answers. Unmatched URLs fail with a 404.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use trailplanner::test_support::StubFetcher;
///
/// let fetcher = StubFetcher::new()
///     .with_json("/parks?parkCode=yose", json!({"data": []}))
///     .with_status("/alerts", 503);
/// assert_eq!(fetcher.call_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct StubFetcher {
    routes: Vec<Route>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl StubFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer URLs containing `pattern` with `body`
    #[must_use]
    pub fn with_json(mut self, pattern: &str, body: Value) -> Self {
        self.routes.push(Route {
            pattern: pattern.to_string(),
            response: StubResponse::Json(body),
            delay: None,
        });
        self
    }

    /// Answer URLs containing `pattern` with `body` after `delay`
    #[must_use]
    pub fn with_delayed_json(mut self, pattern: &str, body: Value, delay: Duration) -> Self {
        self.routes.push(Route {
            pattern: pattern.to_string(),
            response: StubResponse::Json(body),
            delay: Some(delay),
        });
        self
    }

    /// Fail URLs containing `pattern` with an HTTP status
    #[must_use]
    pub fn with_status(mut self, pattern: &str, status: u16) -> Self {
        self.routes.push(Route {
            pattern: pattern.to_string(),
            response: StubResponse::Status(status),
            delay: None,
        });
        self
    }

    /// Every URL requested so far, in request order
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    /// Number of requested URLs containing `pattern`
    #[must_use]
    pub fn calls_matching(&self, pattern: &str) -> usize {
        self.calls().iter().filter(|url| url.contains(pattern)).count()
    }

    /// Highest number of requests observed in flight at the same time
    #[must_use]
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn route(&self, url: &str) -> Option<&Route> {
        self.routes.iter().find(|r| url.contains(&r.pattern))
    }
}

/// Decrements the in-flight counter when a request finishes or is dropped
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl HttpFetcher for StubFetcher {
    async fn get_json(&self, url: &str, _headers: &Headers) -> Result<Value> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(url.to_string());
        }
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        let Some(route) = self.route(url) else {
            return Err(TrailPlannerError::http_status(
                404,
                format!("no stub route for {url}"),
            ));
        };
        // yield so concurrent requests overlap even without an explicit delay
        tokio::time::sleep(route.delay.unwrap_or(Duration::from_millis(1))).await;

        match &route.response {
            StubResponse::Json(body) => Ok(body.clone()),
            StubResponse::Status(status) => Err(TrailPlannerError::http_status(
                *status,
                format!("stubbed status {status}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_routes_match_in_order() {
        let fetcher = StubFetcher::new()
            .with_status("/facilities/2", 500)
            .with_json("/facilities/", json!({"ok": true}));

        let headers = Headers::new();
        assert!(fetcher.get_json("http://x/facilities/1", &headers).await.is_ok());
        let err = fetcher
            .get_json("http://x/facilities/2", &headers)
            .await
            .unwrap_err();
        assert!(err.is_transient());
        assert!(fetcher.get_json("http://x/other", &headers).await.is_err());

        assert_eq!(fetcher.call_count(), 3);
        assert_eq!(fetcher.calls_matching("/facilities/"), 2);
        assert_eq!(fetcher.peak_in_flight(), 1);
    }
}
