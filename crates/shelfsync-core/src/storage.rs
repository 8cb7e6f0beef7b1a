// Durable store for the catalog snapshot, categories and favorites
use std::path::Path;

use serde::Serialize;
use shelfsync_cache::CacheManager;
use tracing::{debug, warn};

use crate::models::{CatalogSnapshot, Product};

pub const PRODUCTS_CACHE_KEY: &str = "products_cache";
pub const CATEGORIES_CACHE_KEY: &str = "categories_cache";
pub const FAVORITES_KEY: &str = "favorites";

/// Borrowed form of `CatalogSnapshot` so saving doesn't clone the catalog
#[derive(Serialize)]
struct SnapshotRecord<'a> {
    products: &'a [Product],
    timestamp: i64,
}

/// Typed access to the three records the app keeps on disk
///
/// Storage problems never reach the caller. Failed writes are logged and
/// dropped; unreadable or corrupt records read back as "never cached".
pub struct LocalStore {
    cache: CacheManager,
}

impl LocalStore {
    pub fn open(db_path: impl AsRef<Path>) -> crate::Result<Self> {
        Ok(Self {
            cache: CacheManager::new(db_path)?,
        })
    }

    pub fn in_memory() -> crate::Result<Self> {
        Ok(Self {
            cache: CacheManager::in_memory()?,
        })
    }

    pub fn from_cache(cache: CacheManager) -> Self {
        Self { cache }
    }

    pub fn save_catalog(&self, products: &[Product]) {
        let record = SnapshotRecord {
            products,
            timestamp: chrono::Utc::now().timestamp_millis(),
        };
        match self.cache.set(PRODUCTS_CACHE_KEY, &record) {
            Ok(()) => debug!("Cached {} products", products.len()),
            Err(e) => warn!("Error caching products: {}", e),
        }
    }

    pub fn load_catalog(&self) -> Option<CatalogSnapshot> {
        self.read(PRODUCTS_CACHE_KEY)
    }

    pub fn save_categories(&self, categories: &[String]) {
        if let Err(e) = self.cache.set(CATEGORIES_CACHE_KEY, &categories) {
            warn!("Error caching categories: {}", e);
        }
    }

    pub fn load_categories(&self) -> Option<Vec<String>> {
        self.read(CATEGORIES_CACHE_KEY)
    }

    pub fn save_favorites(&self, favorites: &[Product]) {
        if let Err(e) = self.cache.set(FAVORITES_KEY, &favorites) {
            warn!("Error saving favorites: {}", e);
        }
    }

    /// Never absent: no favorites yet is just an empty list
    pub fn load_favorites(&self) -> Vec<Product> {
        self.try_load_favorites().unwrap_or_else(|e| {
            warn!("Ignoring unreadable {} record: {}", FAVORITES_KEY, e);
            Vec::new()
        })
    }

    /// Like `load_favorites`, but a failed read is an error instead of an empty list
    pub fn try_load_favorites(&self) -> crate::Result<Vec<Product>> {
        Ok(self.cache.get(FAVORITES_KEY)?.unwrap_or_default())
    }

    fn read<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.cache.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Ignoring unreadable {} record: {}", key, e);
                None
            }
        }
    }
}
