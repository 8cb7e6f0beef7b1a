// HTTP client for the remote product catalog
pub mod client;
pub mod models;

// Re-export common types
pub use client::{ApiError, CatalogClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use models::{Product, Rating};
