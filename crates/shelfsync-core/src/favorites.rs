use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::models::Product;
use crate::storage::LocalStore;

/// The user's favorite products, unique by id, in the order they were added
///
/// Every mutation reads the persisted list, applies the change, writes it
/// back and then publishes the result, all inside one step on the watch
/// channel. Mutations from different handles are therefore serialized and
/// can't lose each other's writes.
#[derive(Clone)]
pub struct FavoritesRegister {
    storage: Arc<LocalStore>,
    items: Arc<watch::Sender<Vec<Product>>>,
}

impl FavoritesRegister {
    pub fn new(storage: Arc<LocalStore>) -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            storage,
            items: Arc::new(tx),
        }
    }

    /// Pull the persisted favorites into memory
    pub fn load(&self) -> usize {
        let favorites = self.storage.load_favorites();
        let count = favorites.len();
        self.items.send_replace(favorites);
        debug!("Loaded {} favorites", count);
        count
    }

    pub fn list(&self) -> Vec<Product> {
        self.items.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn is_favorite(&self, id: u64) -> bool {
        self.items.borrow().iter().any(|fav| fav.id == id)
    }

    /// Add `product` unless its id is already there. Returns whether it was added.
    pub fn add(&self, product: Product) -> bool {
        let mut added = false;
        self.items.send_if_modified(|items| {
            let mut current = self.persisted_or(items);
            if !current.iter().any(|fav| fav.id == product.id) {
                info!("Adding favorite {}", product.id);
                current.push(product);
                self.storage.save_favorites(&current);
                added = true;
            }
            Self::publish(items, current)
        });
        added
    }

    /// Drop the product with `id`; a no-op for ids that aren't favorites
    pub fn remove(&self, id: u64) -> bool {
        let mut removed = false;
        self.items.send_if_modified(|items| {
            let mut current = self.persisted_or(items);
            let before = current.len();
            current.retain(|fav| fav.id != id);
            if current.len() != before {
                info!("Removing favorite {}", id);
                self.storage.save_favorites(&current);
                removed = true;
            }
            Self::publish(items, current)
        });
        removed
    }

    /// Flip the favorite flag for `product`; returns whether it is now a favorite
    pub fn toggle(&self, product: Product) -> bool {
        if self.is_favorite(product.id) {
            self.remove(product.id);
            false
        } else {
            self.add(product)
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Product>> {
        self.items.subscribe()
    }

    /// The persisted list, or `items` when the store can't be read right now
    fn persisted_or(&self, items: &[Product]) -> Vec<Product> {
        match self.storage.try_load_favorites() {
            Ok(persisted) => persisted,
            Err(e) => {
                warn!("Favorites unreadable ({}), using the in-memory list", e);
                items.to_vec()
            }
        }
    }

    fn publish(items: &mut Vec<Product>, current: Vec<Product>) -> bool {
        let changed = *items != current;
        *items = current;
        changed
    }
}
