use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CatalogError;

/// Item selected when nothing usable was persisted.
pub const DEFAULT_ITEM: &str = "my-page";

/// Identifier of a navigation item.
#[derive(Clone, Debug, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NavId(String);

impl NavId {
    pub fn from_raw(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NavId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NavId {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_owned()))
    }
}

impl AsRef<str> for NavId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A selectable section of the page shell. Immutable once the catalog is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationItem {
    pub id: NavId,
    pub title: String,
    pub icon_default: String,
    pub icon_selected: String,
    /// Whether the section is rendered from a template and backend data.
    #[serde(default)]
    pub dynamic: bool,
}

impl NavigationItem {
    /// Build an item whose icons follow the `imgs/icons/{id}[-selected].svg` layout.
    pub fn new(id: &str, title: &str, dynamic: bool) -> Self {
        Self {
            id: NavId::from_raw(id),
            title: title.to_string(),
            icon_default: format!("imgs/icons/{id}.svg"),
            icon_selected: format!("imgs/icons/{id}-selected.svg"),
            dynamic,
        }
    }

    /// Template path relative to the page origin.
    pub fn template_path(&self) -> String {
        format!("subpages/{}.html", self.id)
    }
}

/// The built-in navigation catalog.
pub fn default_catalog() -> Vec<NavigationItem> {
    vec![
        NavigationItem::new(DEFAULT_ITEM, "Моя страница", true),
        NavigationItem::new("news", "Новости", false),
        NavigationItem::new("colleagues", "Коллеги", false),
        NavigationItem::new("store", "Магазин", false),
        NavigationItem::new("rating", "Рейтинг", false),
    ]
}

/// Reject catalogs that cannot hold the "exactly one selected" invariant.
pub fn validate_catalog(items: &[NavigationItem], default_id: &NavId) -> Result<(), CatalogError> {
    if items.is_empty() {
        return Err(CatalogError::Empty);
    }
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(&item.id) {
            return Err(CatalogError::Duplicate(item.id.clone()));
        }
    }
    if !seen.contains(default_id) {
        return Err(CatalogError::MissingDefault(default_id.clone()));
    }
    Ok(())
}
