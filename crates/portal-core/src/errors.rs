use std::time::Duration;

use crate::nav::NavId;
use crate::profile::Endpoint;

/// Failure of a single resource fetch, independent of what the resource is for.
#[derive(Clone, Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
    #[error("failed to read response body: {0}")]
    Body(String),
    #[error("invalid JSON from {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("timeout after {0:?}")]
    Timeout(Duration),
}

impl FetchError {
    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => "invalid_url",
            Self::Network(_) => "network",
            Self::Status { .. } => "status",
            Self::Body(_) => "body",
            Self::Decode { .. } => "decode",
            Self::Timeout(_) => "timeout",
        }
    }
}

/// Errors that send a content load down the error branch.
///
/// Template rendering is total over any input, so there is no render variant.
#[derive(Clone, Debug, thiserror::Error)]
pub enum LoadError {
    #[error("template for \"{item}\" could not be loaded: {source}")]
    TemplateFetch {
        item: NavId,
        #[source]
        source: FetchError,
    },
    #[error("{endpoint} data could not be loaded: {source}")]
    DataFetch {
        endpoint: Endpoint,
        #[source]
        source: FetchError,
    },
}

impl LoadError {
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::TemplateFetch { .. } => "template_fetch",
            Self::DataFetch { .. } => "data_fetch",
        }
    }

    pub fn fetch_error(&self) -> &FetchError {
        match self {
            Self::TemplateFetch { source, .. } | Self::DataFetch { source, .. } => source,
        }
    }
}

/// Problems with a navigation catalog supplied through settings.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("navigation catalog is empty")]
    Empty,
    #[error("duplicate navigation item: {0}")]
    Duplicate(NavId),
    #[error("default navigation item {0} is not in the catalog")]
    MissingDefault(NavId),
}
