// HTTP provider - bridges the API client with the CatalogSource trait
use std::time::Duration;

use async_trait::async_trait;
use shelfsync_api::CatalogClient;

use crate::{config::ApiConfig, models::Product, source::CatalogSource, Result};

/// Wrapper around CatalogClient that implements CatalogSource
pub struct RemoteCatalog {
    client: CatalogClient,
}

impl RemoteCatalog {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: CatalogClient::with_base_url(base_url, timeout)?,
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(&config.base_url, config.timeout())
    }

    pub fn client(&self) -> &CatalogClient {
        &self.client
    }
}

#[async_trait]
impl CatalogSource for RemoteCatalog {
    async fn fetch_products(&self) -> Result<Vec<Product>> {
        Ok(self.client.fetch_products().await?)
    }

    async fn fetch_categories(&self) -> Result<Vec<String>> {
        Ok(self.client.fetch_categories().await?)
    }

    async fn fetch_product(&self, id: u64) -> Result<Product> {
        Ok(self.client.fetch_product_by_id(id).await?)
    }
}
