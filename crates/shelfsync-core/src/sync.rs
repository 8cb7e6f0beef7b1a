// Cache-first catalog loading with network refresh and offline fallback
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{
    catalog::CatalogAction,
    favorites::FavoritesRegister,
    models::{FetchOutcome, Product},
    source::CatalogSource,
    state::CatalogStore,
    storage::LocalStore,
    Error, Result,
};

/// Keeps the in-memory catalog in step with the network and the local store
///
/// Reads go cache first so something shows up immediately, then the
/// network replaces it. A successful fetch is written through to the
/// store; a failed one falls back to the last snapshot when there is one.
pub struct Synchronizer {
    source: Arc<dyn CatalogSource>,
    storage: Arc<LocalStore>,
    state: CatalogStore,
    favorites: FavoritesRegister,
    connected: AtomicBool,
    /// Set once an online transition has fetched; cleared by going offline
    fetch_latch: AtomicBool,
}

impl Synchronizer {
    pub fn new(source: Arc<dyn CatalogSource>, storage: Arc<LocalStore>, page_size: usize) -> Self {
        Self {
            source,
            favorites: FavoritesRegister::new(storage.clone()),
            storage,
            state: CatalogStore::new(page_size),
            connected: AtomicBool::new(true),
            fetch_latch: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> &CatalogStore {
        &self.state
    }

    pub fn favorites(&self) -> &FavoritesRegister {
        &self.favorites
    }

    pub fn storage(&self) -> &LocalStore {
        &self.storage
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Record the connectivity state without reacting to it
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Startup: show whatever is cached, then refresh from the network if we can
    pub async fn start(&self) {
        self.load_cached();
        self.favorites.load();

        if self.is_connected() {
            self.fetch_latch.store(true, Ordering::SeqCst);
            self.fetch_all().await;
        } else {
            info!("Starting offline, showing cached catalog");
            self.state.dispatch(CatalogAction::SetOffline(true));
        }
    }

    /// Load cached products and categories into empty in-memory state
    pub fn load_cached(&self) {
        self.load_cached_products();
        self.load_cached_categories();
    }

    pub fn load_cached_products(&self) -> usize {
        self.state.dispatch(CatalogAction::CacheLoadStarted);
        let products = self
            .storage
            .load_catalog()
            .map(|snapshot| snapshot.products)
            .unwrap_or_default();
        let count = products.len();
        debug!("Loaded {} cached products", count);
        self.state
            .dispatch(CatalogAction::CachedProductsLoaded(products));
        count
    }

    pub fn load_cached_categories(&self) -> usize {
        let categories = self.storage.load_categories().unwrap_or_default();
        let count = categories.len();
        self.state
            .dispatch(CatalogAction::CachedCategoriesLoaded(categories));
        count
    }

    /// Fetch the product list, falling back to the cached snapshot
    ///
    /// Only returns an error when the network failed and nothing was cached;
    /// that error is also what the view shows.
    pub async fn fetch_products(&self) -> Result<FetchOutcome<usize>> {
        self.state.dispatch(CatalogAction::ProductsFetchStarted);

        match self.source.fetch_products().await {
            Ok(products) => {
                info!("Fetched {} products", products.len());
                self.storage.save_catalog(&products);
                let count = products.len();
                self.state
                    .dispatch(CatalogAction::ProductsFetched(FetchOutcome::Fetched(products)));
                Ok(FetchOutcome::Fetched(count))
            }
            Err(err) => match self.storage.load_catalog() {
                Some(snapshot) => {
                    warn!(
                        "Product fetch failed ({}), falling back to {} cached products",
                        err,
                        snapshot.products.len()
                    );
                    let count = snapshot.products.len();
                    self.state.dispatch(CatalogAction::ProductsFetched(
                        FetchOutcome::FallbackToCache(snapshot.products),
                    ));
                    Ok(FetchOutcome::FallbackToCache(count))
                }
                None => {
                    warn!("Product fetch failed with nothing cached: {}", err);
                    self.state
                        .dispatch(CatalogAction::ProductsFetchFailed(err.to_string()));
                    Err(err)
                }
            },
        }
    }

    /// Fetch categories; failures are logged and never surface
    pub async fn fetch_categories(&self) -> Option<FetchOutcome<usize>> {
        let outcome = match self.source.fetch_categories().await {
            Ok(categories) => {
                debug!("Fetched {} categories", categories.len());
                self.storage.save_categories(&categories);
                FetchOutcome::Fetched(categories)
            }
            Err(err) => match self.storage.load_categories() {
                Some(cached) => {
                    warn!("Categories fetch failed ({}), using cache", err);
                    FetchOutcome::FallbackToCache(cached)
                }
                None => {
                    warn!("Categories fetch failed: {}", err);
                    return None;
                }
            },
        };

        let count = outcome.as_ref().map(|categories| categories.len());
        self.state.dispatch(CatalogAction::CategoriesFetched(outcome));
        Some(count)
    }

    /// Products and categories in parallel; a categories failure never
    /// affects the products result
    pub async fn fetch_all(&self) {
        let (products, categories) =
            futures::join!(self.fetch_products(), self.fetch_categories());

        match products {
            Ok(outcome) => debug!("Products: {:?}, categories: {:?}", outcome, categories),
            Err(e) => debug!("Products unavailable: {}", e),
        }
    }

    /// Pull-to-refresh. Returns false when skipped because we're offline.
    pub async fn refresh(&self) -> bool {
        self.state.dispatch(CatalogAction::SetRefreshing(true));

        if !self.is_connected() {
            info!("Offline, skipping refresh");
            self.state.dispatch(CatalogAction::SetRefreshing(false));
            return false;
        }

        self.fetch_all().await;
        self.state.dispatch(CatalogAction::SetRefreshing(false));
        true
    }

    /// Dismiss the current error and try both fetches again
    pub async fn retry(&self) {
        self.state.clear_error();
        self.fetch_all().await;
    }

    /// React to a connectivity transition. Returns whether a fetch ran.
    ///
    /// Each offline -> online transition fetches at most once; repeated
    /// "online" reports in between are ignored.
    pub async fn on_connectivity_change(&self, connected: bool) -> bool {
        self.set_connected(connected);
        self.state.dispatch(CatalogAction::SetOffline(!connected));

        if !connected {
            self.fetch_latch.store(false, Ordering::SeqCst);
            return false;
        }

        if self.fetch_latch.swap(true, Ordering::SeqCst) {
            debug!("Already fetched for this connection, ignoring");
            return false;
        }

        info!("Back online, fetching catalog");
        self.fetch_all().await;
        true
    }

    /// Follow connectivity transitions for as long as the sender lives
    ///
    /// The monitor's current value is adopted before this returns, so a
    /// `start()` issued afterwards already knows whether to go to the network.
    pub fn watch_connectivity(self: Arc<Self>, mut rx: watch::Receiver<bool>) -> JoinHandle<()> {
        let connected = *rx.borrow_and_update();
        self.set_connected(connected);

        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let connected = *rx.borrow_and_update();
                self.on_connectivity_change(connected).await;
            }
            debug!("Connectivity monitor dropped, listener exiting");
        })
    }

    /// One product, fresh if possible, otherwise whatever copy we already have
    pub async fn product_details(&self, id: u64) -> Result<Product> {
        if !self.is_connected() {
            return self
                .local_product(id)
                .ok_or_else(|| Error::NotFound(format!("product {} is not cached", id)));
        }

        match self.source.fetch_product(id).await {
            Ok(product) => Ok(product),
            Err(err) => match self.local_product(id) {
                Some(product) => {
                    warn!("Product {} fetch failed ({}), using local copy", id, err);
                    Ok(product)
                }
                None => Err(err),
            },
        }
    }

    /// Look in the in-memory catalog first, then the cached snapshot
    fn local_product(&self, id: u64) -> Option<Product> {
        self.state
            .read(|s| s.items().iter().find(|p| p.id == id).cloned())
            .or_else(|| {
                self.storage
                    .load_catalog()
                    .and_then(|snapshot| snapshot.products.into_iter().find(|p| p.id == id))
            })
    }
}
