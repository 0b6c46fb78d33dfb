use std::sync::Arc;

use portal_core::nav::validate_catalog;
use portal_core::{NavId, NavigationItem};
use portal_store::KvStore;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::content::{Content, ContentArea};
use crate::error::EngineError;
use crate::loader::ContentLoader;

/// Storage key holding the last selected item id.
pub const SELECTION_KEY: &str = "selectedNav";

/// Completion of a content load started by a selection. Awaiting it is
/// optional; the load runs to completion either way.
pub type LoadHandle = JoinHandle<Content>;

/// How one navigation entry should be drawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavItemView {
    pub id: NavId,
    pub title: String,
    pub icon: String,
    pub active: bool,
}

/// Owner of the selection state. `initialize` and `select` are the only
/// ways it changes, and every change is persisted.
pub struct NavigationController {
    items: Vec<NavigationItem>,
    default_id: NavId,
    active: Option<usize>,
    store: Arc<dyn KvStore>,
    loader: Arc<ContentLoader>,
    area: Arc<ContentArea>,
}

impl NavigationController {
    pub fn new(
        items: Vec<NavigationItem>,
        default_id: NavId,
        store: Arc<dyn KvStore>,
        loader: Arc<ContentLoader>,
        area: Arc<ContentArea>,
    ) -> Result<Self, EngineError> {
        validate_catalog(&items, &default_id)?;
        Ok(Self {
            items,
            default_id,
            active: None,
            store,
            loader,
            area,
        })
    }

    /// The item startup would select: the persisted one if it is still in
    /// the catalog, the default otherwise.
    pub fn restored_id(&self) -> NavId {
        let persisted = match self.store.get(SELECTION_KEY) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "failed to read persisted selection");
                None
            }
        };
        match persisted.map(NavId::from_raw) {
            Some(id) if self.position(&id).is_some() => id,
            Some(id) => {
                info!(
                    persisted = %id,
                    default = %self.default_id,
                    "persisted selection unknown, using default"
                );
                self.default_id.clone()
            }
            None => self.default_id.clone(),
        }
    }

    /// Select the restored item. Always ends with an item selected.
    pub fn initialize(&mut self) -> LoadHandle {
        let id = self.restored_id();
        let idx = self.position(&id).unwrap_or(0);
        self.activate(idx)
    }

    /// Make `id` the active item and start loading its content.
    /// Unknown ids change nothing and return `None`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn select(&mut self, id: &NavId) -> Option<LoadHandle> {
        match self.position(id) {
            Some(idx) => Some(self.activate(idx)),
            None => {
                warn!(item = %id, "ignoring selection of unknown item");
                None
            }
        }
    }

    fn activate(&mut self, idx: usize) -> LoadHandle {
        self.active = Some(idx);
        let item = self.items[idx].clone();

        if let Err(e) = self.store.set(SELECTION_KEY, item.id.as_str()) {
            warn!(item = %item.id, error = %e, "failed to persist selection");
        }

        let generation = self.area.begin();
        info!(item = %item.id, generation = generation.get(), "item selected");

        let loader = Arc::clone(&self.loader);
        let area = Arc::clone(&self.area);
        tokio::spawn(async move { loader.load(&item, &area, generation).await })
    }

    fn position(&self, id: &NavId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    pub fn active(&self) -> Option<&NavigationItem> {
        self.active.map(|idx| &self.items[idx])
    }

    pub fn items(&self) -> &[NavigationItem] {
        &self.items
    }

    pub fn content_area(&self) -> &Arc<ContentArea> {
        &self.area
    }

    /// Active styling and icon per item: the selected icon for the active
    /// item, the default icon for every other one.
    pub fn views(&self) -> Vec<NavItemView> {
        self.views_with(self.active)
    }

    /// Views as `initialize` would leave them, without selecting anything,
    /// persisting or loading.
    pub fn restored_views(&self) -> Vec<NavItemView> {
        self.views_with(self.position(&self.restored_id()))
    }

    fn views_with(&self, active: Option<usize>) -> Vec<NavItemView> {
        self.items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let active = active == Some(idx);
                NavItemView {
                    id: item.id.clone(),
                    title: item.title.clone(),
                    icon: if active {
                        item.icon_selected.clone()
                    } else {
                        item.icon_default.clone()
                    },
                    active,
                }
            })
            .collect()
    }
}
