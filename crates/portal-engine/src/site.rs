use portal_core::{Endpoint, FetchError, NavigationItem};
use url::Url;

use crate::error::EngineError;

/// Port the backend API listens on, on the same host as the page.
pub const BACKEND_PORT: u16 = 5000;

/// Where templates and backend data live.
#[derive(Clone, Debug)]
pub struct SiteUrls {
    page_origin: Url,
    backend_base: String,
}

impl SiteUrls {
    /// Derive the backend base from the page origin: same scheme and host,
    /// fixed [`BACKEND_PORT`].
    pub fn from_origin(page_origin: Url) -> Result<Self, EngineError> {
        let host = page_origin
            .host_str()
            .ok_or_else(|| EngineError::InvalidOrigin(page_origin.to_string()))?;
        let backend_base = format!("{}://{}:{}", page_origin.scheme(), host, BACKEND_PORT);
        Ok(Self {
            page_origin,
            backend_base,
        })
    }

    /// Explicit backend base, for fixtures that cannot bind the fixed port.
    pub fn with_backend(page_origin: Url, backend_base: impl Into<String>) -> Self {
        Self {
            page_origin,
            backend_base: backend_base.into(),
        }
    }

    pub fn backend_base(&self) -> &str {
        &self.backend_base
    }

    pub fn page_origin(&self) -> &Url {
        &self.page_origin
    }

    /// Template resolved relative to the page, like a relative fetch in the browser.
    pub fn template_url(&self, item: &NavigationItem) -> Result<String, FetchError> {
        self.page_origin
            .join(&item.template_path())
            .map(String::from)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {e}", item.template_path())))
    }

    pub fn data_url(&self, endpoint: Endpoint, subject_id: u32) -> String {
        endpoint.url(&self.backend_base, subject_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(origin: &str) -> SiteUrls {
        SiteUrls::from_origin(Url::parse(origin).unwrap()).unwrap()
    }

    #[test]
    fn backend_uses_page_host_and_fixed_port() {
        assert_eq!(urls("http://intranet.local:8080").backend_base(), "http://intranet.local:5000");
        assert_eq!(
            urls("https://portal.example.com/").backend_base(),
            "https://portal.example.com:5000"
        );
    }

    #[test]
    fn ipv6_host_keeps_brackets() {
        assert_eq!(urls("http://[::1]:8080").backend_base(), "http://[::1]:5000");
    }

    #[test]
    fn template_resolves_against_origin() {
        let item = NavigationItem::new("my-page", "Me", true);
        assert_eq!(
            urls("http://localhost:8080").template_url(&item).unwrap(),
            "http://localhost:8080/subpages/my-page.html"
        );
        assert_eq!(
            urls("http://localhost:8080/portal/").template_url(&item).unwrap(),
            "http://localhost:8080/portal/subpages/my-page.html"
        );
    }

    #[test]
    fn data_urls() {
        assert_eq!(
            urls("http://localhost:8080").data_url(Endpoint::Details, 4),
            "http://localhost:5000/users/get/4/details"
        );
    }

    #[test]
    fn explicit_backend() {
        let base = "http://127.0.0.1:1234";
        let u = SiteUrls::with_backend(Url::parse(base).unwrap(), base);
        assert_eq!(u.data_url(Endpoint::Photo, 4), "http://127.0.0.1:1234/users/get/4/photo");
    }
}
