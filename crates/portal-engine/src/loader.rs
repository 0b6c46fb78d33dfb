use std::sync::Arc;

use portal_core::fetch::fetch_json;
use portal_core::profile::{DetailsInfo, JobInfo, PersonalInfo, PhotoInfo, SUBJECT_ID};
use portal_core::{
    AggregateProfile, Endpoint, Fetcher, LoadError, Locale, NavigationItem, TemplateRenderer,
};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::content::{Content, ContentArea, Generation};
use crate::site::SiteUrls;

/// Turns a navigation item into content: a placeholder for static items,
/// a rendered profile page (or an error message) for dynamic ones.
pub struct ContentLoader {
    fetcher: Arc<dyn Fetcher>,
    urls: SiteUrls,
    renderer: TemplateRenderer,
    locale: Locale,
    subject_id: u32,
}

impl ContentLoader {
    pub fn new(fetcher: Arc<dyn Fetcher>, urls: SiteUrls) -> Self {
        Self {
            fetcher,
            urls,
            renderer: TemplateRenderer::default(),
            locale: Locale::default(),
            subject_id: SUBJECT_ID,
        }
    }

    pub fn with_renderer(mut self, renderer: TemplateRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Produce content for `item` and commit it under `generation`.
    /// A newer selection made meanwhile wins; this result is then dropped.
    #[instrument(skip(self, item, area), fields(item = %item.id, generation = generation.get()))]
    pub async fn load(
        &self,
        item: &NavigationItem,
        area: &ContentArea,
        generation: Generation,
    ) -> Content {
        let content = self.produce(item).await;
        if area.commit(generation, content.clone()) {
            debug!("content committed");
        }
        content
    }

    /// Content for `item` without touching the content area.
    pub async fn produce(&self, item: &NavigationItem) -> Content {
        if !item.dynamic {
            return Content::Placeholder(self.locale.placeholder(&item.title));
        }
        match self.build_page(item).await {
            Ok(html) => Content::Rendered(html),
            Err(e) => {
                warn!(
                    error = %e,
                    kind = e.error_kind(),
                    fetch_kind = e.fetch_error().error_kind(),
                    "content load failed"
                );
                Content::Error(self.locale.error(&self.describe(&e)))
            }
        }
    }

    /// User-facing description: a fixed localized text for template
    /// failures, the underlying cause for data failures.
    fn describe(&self, error: &LoadError) -> String {
        match error {
            LoadError::TemplateFetch { .. } => self.locale.template_failure().to_string(),
            LoadError::DataFetch { .. } => error.to_string(),
        }
    }

    /// Template first, then the four data sources together. Any failure
    /// aborts the whole page; nothing partial is rendered.
    pub async fn build_page(&self, item: &NavigationItem) -> Result<String, LoadError> {
        let template = self.fetch_template(item).await?;
        let profile = self.fetch_profile().await?;
        info!(item = %item.id, fields = profile.len(), "profile assembled");
        Ok(self.renderer.render(&template, &profile).into_owned())
    }

    async fn fetch_template(&self, item: &NavigationItem) -> Result<String, LoadError> {
        let to_error = |source| LoadError::TemplateFetch {
            item: item.id.clone(),
            source,
        };
        let url = self.urls.template_url(item).map_err(to_error)?;
        self.fetcher.fetch_text(&url).await.map_err(to_error)
    }

    /// Fetch personal, photo, job_info and details concurrently and merge them.
    /// The first failure cancels the rest.
    pub async fn fetch_profile(&self) -> Result<AggregateProfile, LoadError> {
        let (personal, photo, job_info, details) = futures::try_join!(
            self.fetch_record::<PersonalInfo>(Endpoint::Personal),
            self.fetch_record::<PhotoInfo>(Endpoint::Photo),
            self.fetch_record::<JobInfo>(Endpoint::JobInfo),
            self.fetch_record::<DetailsInfo>(Endpoint::Details),
        )?;
        Ok(AggregateProfile::assemble(personal, photo, job_info, details))
    }

    async fn fetch_record<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, LoadError> {
        let url = self.urls.data_url(endpoint, self.subject_id);
        fetch_json(self.fetcher.as_ref(), &url)
            .await
            .map_err(|source| LoadError::DataFetch { endpoint, source })
    }
}
