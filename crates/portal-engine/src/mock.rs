use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use portal_core::{FetchError, Fetcher};

/// Pre-programmed response for one URL.
#[derive(Clone, Debug)]
pub enum MockResponse {
    Body(String),
    Error(FetchError),
    /// Wait a duration, then yield the inner response.
    Delay(Duration, Box<MockResponse>),
}

impl MockResponse {
    pub fn body(body: impl Into<String>) -> Self {
        Self::Body(body.into())
    }

    pub fn delayed(delay: Duration, inner: MockResponse) -> Self {
        Self::Delay(delay, Box::new(inner))
    }
}

/// Deterministic [`Fetcher`] keyed by exact URL. Unknown URLs answer 404.
#[derive(Default)]
pub struct MockFetcher {
    routes: Mutex<HashMap<String, MockResponse>>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, url: impl Into<String>, response: MockResponse) -> Self {
        self.set(url, response);
        self
    }

    /// Add or replace the response for `url`.
    pub fn set(&self, url: impl Into<String>, response: MockResponse) {
        self.routes.lock().insert(url.into(), response);
    }

    /// URLs requested so far, in call order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.requests.lock().push(url.to_string());
        let mut response = self.routes.lock().get(url).cloned().unwrap_or_else(|| {
            MockResponse::Error(FetchError::Status {
                status: 404,
                url: url.to_string(),
            })
        });
        loop {
            match response {
                MockResponse::Body(body) => return Ok(body),
                MockResponse::Error(err) => return Err(err),
                MockResponse::Delay(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    response = *inner;
                }
            }
        }
    }
}
