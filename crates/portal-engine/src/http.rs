use std::time::Duration;

use async_trait::async_trait;
use portal_core::{FetchError, Fetcher};
use reqwest::Client;
use tracing::instrument;

use crate::error::EngineError;

/// [`Fetcher`] over HTTP.
pub struct HttpFetcher {
    client: Client,
    timeout: Option<Duration>,
}

impl HttpFetcher {
    /// `timeout: None` lets a request wait as long as the server does.
    pub fn new(timeout: Option<Duration>) -> Result<Self, EngineError> {
        let mut builder =
            Client::builder().user_agent(concat!("portal/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| EngineError::Client(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    fn classify(&self, error: reqwest::Error) -> FetchError {
        match self.timeout {
            Some(timeout) if error.is_timeout() => FetchError::Timeout(timeout),
            _ => FetchError::Network(error.to_string()),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    #[instrument(skip(self), level = "debug")]
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|e| match self.classify(e) {
            FetchError::Network(msg) => FetchError::Body(msg),
            other => other,
        })
    }
}
