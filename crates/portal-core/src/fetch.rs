use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::errors::FetchError;

/// Read-only access to remote resources (templates and backend JSON).
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET `url` and return the body of a successful response.
    /// Non-success statuses are errors.
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

/// GET `url` and decode the body as JSON.
pub async fn fetch_json<T: DeserializeOwned>(
    fetcher: &dyn Fetcher,
    url: &str,
) -> Result<T, FetchError> {
    let body = fetcher.fetch_text(url).await?;
    serde_json::from_str(&body).map_err(|e| FetchError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    #[async_trait]
    impl Fetcher for Fixed {
        async fn fetch_text(&self, _url: &str) -> Result<String, FetchError> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn decodes_json_body() {
        let value: serde_json::Value = fetch_json(&Fixed(r#"{"a":1}"#), "u").await.unwrap();
        assert_eq!(value["a"], 1);
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let err = fetch_json::<serde_json::Value>(&Fixed("<html>"), "http://x/y")
            .await
            .unwrap_err();
        match err {
            FetchError::Decode { url, .. } => assert_eq!(url, "http://x/y"),
            other => panic!("expected decode error, got {other:?}"),
        }
    }
}
