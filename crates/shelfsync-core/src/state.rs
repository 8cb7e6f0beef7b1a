use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::catalog::{CatalogAction, CatalogViewState};

/// The single owner of catalog state
///
/// Cloning gives another handle to the same state. Each `dispatch` runs
/// one reducer step under the channel's lock, so concurrent completions
/// interleave between steps but never inside one. Subscribers are woken
/// after every committed step.
#[derive(Clone)]
pub struct CatalogStore {
    tx: Arc<watch::Sender<CatalogViewState>>,
}

impl CatalogStore {
    pub fn new(page_size: usize) -> Self {
        let (tx, _rx) = watch::channel(CatalogViewState::new(page_size));
        Self { tx: Arc::new(tx) }
    }

    pub fn dispatch(&self, action: CatalogAction) {
        debug!("dispatch {:?}", ActionName(&action));
        self.tx.send_modify(|state| state.reduce(action));
    }

    /// Read derived state without cloning it
    pub fn read<R>(&self, f: impl FnOnce(&CatalogViewState) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn snapshot(&self) -> CatalogViewState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CatalogViewState> {
        self.tx.subscribe()
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        self.dispatch(CatalogAction::SetSearchQuery(query.into()));
    }

    pub fn set_selected_category(&self, category: Option<String>) {
        self.dispatch(CatalogAction::SetSelectedCategory(category));
    }

    pub fn load_more_products(&self) {
        self.dispatch(CatalogAction::LoadMore);
    }

    pub fn clear_error(&self) {
        self.dispatch(CatalogAction::ClearError);
    }
}

/// Logs the action variant without dumping whole product lists
struct ActionName<'a>(&'a CatalogAction);

impl std::fmt::Debug for ActionName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            CatalogAction::CachedProductsLoaded(items) => {
                write!(f, "CachedProductsLoaded({} items)", items.len())
            }
            CatalogAction::ProductsFetched(outcome) => {
                let count = outcome.as_ref().map(|items| items.len());
                write!(f, "ProductsFetched({:?})", count)
            }
            other => write!(f, "{:?}", other),
        }
    }
}
