use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::Product;

pub const DEFAULT_BASE_URL: &str = "https://fakestoreapi.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const PRODUCTS_ENDPOINT: &str = "/products";
const CATEGORIES_ENDPOINT: &str = "/products/categories";

/// Everything a catalog request can fail with
///
/// All of these are transient from the user's point of view: a manual
/// retry may well succeed. Retrying is left to the caller.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(#[source] reqwest::Error),

    #[error("Request timeout. Please try again.")]
    TimeoutError,

    #[error("HTTP error! status: {status}")]
    HttpError { status: u16 },

    #[error("Failed to decode response: {0}")]
    DecodeError(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::TimeoutError
        } else if err.is_decode() {
            ApiError::DecodeError(err.to_string())
        } else {
            ApiError::NetworkError(err)
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::DecodeError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Client for the product catalog API
///
/// One GET per call, no retries. Each request (including reading the body)
/// races against the configured timeout and is dropped when it loses.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl CatalogClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Point the client at another catalog host (mirrors, local test servers)
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("shelfsync/0.1.0"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET /products - the full catalog, no server-side paging
    pub async fn fetch_products(&self) -> Result<Vec<Product>> {
        self.get_json(PRODUCTS_ENDPOINT).await
    }

    /// GET /products/categories
    pub async fn fetch_categories(&self) -> Result<Vec<String>> {
        self.get_json(CATEGORIES_ENDPOINT).await
    }

    /// GET /products/{id}
    pub async fn fetch_product_by_id(&self, id: u64) -> Result<Product> {
        self.get_json(&format!("{}/{}", PRODUCTS_ENDPOINT, id)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        match tokio::time::timeout(self.timeout, self.send(&url)).await {
            Ok(result) => {
                if let Err(ref e) = result {
                    warn!("GET {} failed: {}", url, e);
                }
                result
            }
            Err(_) => {
                warn!("GET {} timed out after {:?}", url, self.timeout);
                Err(ApiError::TimeoutError)
            }
        }
    }

    async fn send<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpError {
                status: status.as_u16(),
            });
        }

        // Read the raw body first so a malformed payload is reported as a
        // decode failure rather than a transport one
        let body = response.bytes().await?;
        let payload = serde_json::from_slice(&body)?;
        Ok(payload)
    }
}
