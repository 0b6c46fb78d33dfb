//! Settings type definitions.
//!
//! All types use camelCase JSON and `#[serde(default)]`, so a settings file
//! only needs the fields it changes.

use std::path::PathBuf;

use portal_core::nav::{default_catalog, validate_catalog, DEFAULT_ITEM};
use portal_core::{FalsyPolicy, Locale, NavId, NavigationItem};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::{Result, SettingsError};

/// Root settings type.
///
/// ```json
/// {
///   "pageOrigin": "https://portal.example.com",
///   "locale": "en",
///   "logging": { "json": true }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortalSettings {
    /// Origin the page is served from. Templates resolve against it and the
    /// backend base is derived from it.
    pub page_origin: String,
    /// Language of placeholder and error messages.
    pub locale: Locale,
    /// Selection database. `None` means `~/.portal/database/portal.db`.
    pub db_path: Option<String>,
    /// Per-request timeout. `None` means requests may wait indefinitely.
    pub request_timeout_secs: Option<u64>,
    /// Rendering of `0` and `false` profile values.
    pub falsy_policy: FalsyPolicy,
    pub logging: LoggingSettings,
    pub navigation: NavigationSettings,
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            page_origin: "http://localhost:8080".to_string(),
            locale: Locale::default(),
            db_path: None,
            request_timeout_secs: None,
            falsy_policy: FalsyPolicy::default(),
            logging: LoggingSettings::default(),
            navigation: NavigationSettings::default(),
        }
    }
}

impl PortalSettings {
    /// Parsed page origin; must be an absolute http(s) URL with a host.
    pub fn page_origin_url(&self) -> Result<Url> {
        let invalid = |reason: String| SettingsError::InvalidOrigin {
            origin: self.page_origin.clone(),
            reason,
        };
        let url = Url::parse(&self.page_origin).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host".to_string()));
        }
        Ok(url)
    }

    /// Resolved path of the selection database.
    pub fn db_path(&self) -> PathBuf {
        match &self.db_path {
            Some(path) => PathBuf::from(path),
            None => crate::loader::portal_dir().join("database").join("portal.db"),
        }
    }

    /// Check everything that would otherwise fail later at runtime.
    pub fn validate(&self) -> Result<()> {
        self.page_origin_url()?;
        validate_catalog(&self.navigation.items, &self.navigation.default_item)?;
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default level; `RUST_LOG` takes precedence.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationSettings {
    /// Item selected when nothing valid was persisted.
    pub default_item: NavId,
    /// Replaces the built-in catalog entirely when set in a file.
    pub items: Vec<NavigationItem>,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            default_item: NavId::from_raw(DEFAULT_ITEM),
            items: default_catalog(),
        }
    }
}
