use async_trait::async_trait;

use crate::{models::Product, Result};

/// Where the catalog comes from
///
/// The synchronizer only talks to this trait, so tests can hand it a mock
/// and the app can hand it the real HTTP client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_products(&self) -> Result<Vec<Product>>;
    async fn fetch_categories(&self) -> Result<Vec<String>>;
    async fn fetch_product(&self, id: u64) -> Result<Product>;
}
