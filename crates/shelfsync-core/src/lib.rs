// Catalog state engine - cache-first loading, filtering, paging and favorites
pub mod catalog;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod favorites;
pub mod models;
pub mod providers;
pub mod source;
pub mod state;
pub mod storage;
pub mod sync;

pub use catalog::{CatalogAction, CatalogViewState, DEFAULT_PAGE_SIZE};
pub use config::Config;
pub use connectivity::ConnectivityMonitor;
pub use error::Error;
pub use favorites::FavoritesRegister;
pub use models::{CatalogSnapshot, FetchOutcome, Product, Rating, SyncPhase};
pub use source::CatalogSource;
pub use state::CatalogStore;
pub use storage::LocalStore;
pub use sync::Synchronizer;

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
